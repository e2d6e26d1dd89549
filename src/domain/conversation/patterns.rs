//! Data-driven text classification tables.
//!
//! Greeting detection and hand-off keywords live here, outside the
//! routing logic, so they can be tuned and tested on their own.

use once_cell::sync::Lazy;
use regex::Regex;

// Greetings may appear alone or inside a sentence; `\s*` also accepts the
// fused spellings ("bomdia", "boanoite") customers actually type.
static GREETINGS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\boi\b",
        r"(?i)\bol[aá]\b",
        r"(?i)\bbom\s*dia\b",
        r"(?i)\bboa\s*tarde\b",
        r"(?i)\bboa\s*noite\b",
        r"(?i)\bfala\b",
        r"(?i)\be\s*a[ií]\b",
        r"(?i)\beai\b",
        r"(?i)\bsalve\b",
        r"(?i)\biniciar\b",
        r"(?i)\bmenu\b",
        r"(?i)\bstart\b",
        r"(?i)\btudo\s*bem\b",
        r"(?i)\btd\s*bem\b",
        r"(?i)\bcomo\s*vai\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("greeting pattern"))
    .collect()
});

/// Typed texts that always route the customer straight to a human,
/// matched as substrings of the lowercased message.
const HANDOFF_KEYWORDS: [&str; 5] = [
    "financiamento",
    "troca",
    "trocar",
    "valor da parcela",
    "entrada",
];

/// True when the text reads as a greeting or an explicit menu request.
pub fn is_greeting(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }
    GREETINGS.iter().any(|re| re.is_match(trimmed))
}

/// True when the text mentions a subject only a seller can handle.
pub fn wants_handoff(text: &str) -> bool {
    let token = text.trim().to_lowercase();
    HANDOFF_KEYWORDS.iter().any(|k| token.contains(k))
}
