//! GreetingMessage value object.

use std::fmt;

/// The text of a generated greeting, trimmed on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GreetingMessage(String);

impl GreetingMessage {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GreetingMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
