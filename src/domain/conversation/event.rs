//! Canonical inbound event.

use crate::domain::foundation::PhoneNumber;

/// One inbound message, normalized from whatever shape the provider
/// delivered it in. Transient: consumed by a single dispatch and never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub identity: PhoneNumber,
    /// Trimmed message text; the selection id for interactive taps.
    pub text: String,
    /// Voice note or push-to-talk message.
    pub is_audio: bool,
    /// Originated from a list/button tap rather than typed text.
    pub is_interactive: bool,
}

impl InboundEvent {
    pub fn new(
        identity: PhoneNumber,
        text: impl Into<String>,
        is_audio: bool,
        is_interactive: bool,
    ) -> Self {
        Self {
            identity,
            text: text.into().trim().to_string(),
            is_audio,
            is_interactive,
        }
    }

    /// Lowercased trimmed text, the form all routing tokens use.
    pub fn token(&self) -> String {
        self.text.trim().to_lowercase()
    }

    /// A message with nothing in it at all; treated as a first contact.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && !self.is_audio
    }
}
