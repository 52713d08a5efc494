//! Contact entity.

use super::errors::ValidationError;
use super::phone::Phone;

/// A birthday contact extracted from a calendar event.
///
/// The name is never empty and the phone is always valid; `new` is the only
/// way to build one and there are no mutators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    name: String,
    phone: Phone,
    context: String,
}

impl Contact {
    /// Create a new Contact.
    ///
    /// Name and context are trimmed. An empty context means "no context".
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingName` if the trimmed name is empty.
    pub fn new(
        name: impl AsRef<str>,
        phone: Phone,
        context: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        Ok(Self {
            name: name.to_string(),
            phone,
            context: context.as_ref().trim().to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Whether any personal context was attached.
    pub fn has_context(&self) -> bool {
        !self.context.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> Phone {
        Phone::new("+34600111222").unwrap()
    }

    #[test]
    fn test_contact_trims_fields() {
        let contact = Contact::new("  Ann ", phone(), "\n likes tea \n").unwrap();
        assert_eq!(contact.name(), "Ann");
        assert_eq!(contact.context(), "likes tea");
        assert_eq!(contact.phone().as_str(), "+34600111222");
        assert!(contact.has_context());
    }

    #[test]
    fn test_contact_rejects_blank_name() {
        assert_eq!(
            Contact::new(" \t ", phone(), ""),
            Err(ValidationError::MissingName)
        );
    }

    #[test]
    fn test_contact_empty_context() {
        let contact = Contact::new("Ann", phone(), "   ").unwrap();
        assert_eq!(contact.context(), "");
        assert!(!contact.has_context());
    }
}
