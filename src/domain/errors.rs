//! Domain validation errors.

use std::fmt;

/// Errors that can occur while building domain values from raw event data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The contact name is empty after trimming.
    MissingName,

    /// No phone number was provided.
    MissingPhone,

    /// The provided phone number is not in international format.
    InvalidPhone(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "missing contact name"),
            Self::MissingPhone => write!(f, "missing phone number"),
            Self::InvalidPhone(phone) => write!(f, "invalid phone number: {}", phone),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(ValidationError::MissingName.to_string(), "missing contact name");
        assert_eq!(ValidationError::MissingPhone.to_string(), "missing phone number");
        assert_eq!(
            ValidationError::InvalidPhone("123".to_string()).to_string(),
            "invalid phone number: 123"
        );
    }
}
