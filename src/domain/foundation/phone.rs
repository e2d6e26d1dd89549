//! Customer identity value object.

use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Minimum digits for a plausible phone number (country + area + local).
const MIN_DIGITS: usize = 10;

/// Normalized customer phone identifier.
///
/// Always a digits-only string of at least ten digits. Routing-address
/// decoration (`5511999999999@s.whatsapp.net`) and punctuation are
/// stripped during parsing, so two spellings of the same number compare
/// equal. Short chat ids such as `raf896f47773c63` do not parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses a raw candidate into a normalized phone number.
    ///
    /// Everything after an `@` is discarded, then every non-digit
    /// character; the remaining digit string must have at least ten
    /// digits.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` when the candidate is empty after
    /// stripping or has fewer than ten digits.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let local = raw.split('@').next().unwrap_or_default();
        let digits: String = local.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(ValidationError::empty_field("phone"));
        }
        if digits.len() < MIN_DIGITS {
            return Err(ValidationError::invalid_format(
                "phone",
                format!("expected at least {} digits, got {}", MIN_DIGITS, digits.len()),
            ));
        }
        Ok(Self(digits))
    }

    /// Returns the digits-only representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PhoneNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
