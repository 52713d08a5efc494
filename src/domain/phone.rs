//! Phone value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Minimum length including the leading `+`.
const MIN_LEN: usize = 8;

/// Maximum length including the leading `+`.
const MAX_LEN: usize = 16;

/// A type-safe wrapper for phone numbers in international format.
///
/// A `Phone` always holds a trimmed value that starts with `+` and is
/// followed by 7 to 15 ASCII digits. Invalid input never produces a value.
///
/// # Example
///
/// ```
/// use birthday_greeter::domain::Phone;
///
/// let phone = Phone::new(" +34600111222 ").unwrap();
/// assert_eq!(phone.as_str(), "+34600111222");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Phone(String);

impl Phone {
    /// Create a new Phone, validating the format.
    ///
    /// # Validation Rules
    ///
    /// - Surrounding whitespace is ignored
    /// - Must start with '+'
    /// - Must be 8 to 16 characters long, '+' included
    /// - Everything after '+' must be an ASCII digit
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingPhone` for empty input and
    /// `ValidationError::InvalidPhone` when the format is wrong.
    pub fn new(phone: impl AsRef<str>) -> Result<Self, ValidationError> {
        let phone = phone.as_ref().trim();

        if phone.is_empty() {
            return Err(ValidationError::MissingPhone);
        }

        if !Self::is_valid(phone) {
            return Err(ValidationError::InvalidPhone(phone.to_string()));
        }

        Ok(Self(phone.to_string()))
    }

    fn is_valid(phone: &str) -> bool {
        let Some(digits) = phone.strip_prefix('+') else {
            return false;
        };

        if phone.len() < MIN_LEN || phone.len() > MAX_LEN {
            return false;
        }

        digits.chars().all(|c| c.is_ascii_digit())
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Serde support - serialize as string
impl Serialize for Phone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

// Serde support - deserialize from string with validation
impl<'de> Deserialize<'de> for Phone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Phone::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
