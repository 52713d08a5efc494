//! Fixed-template greeting generator.

use super::{MessageGenerator, MessageInput};
use crate::domain::GreetingMessage;
use crate::error::GenerateResult;
use async_trait::async_trait;

/// Emoji used when none is configured.
pub const DEFAULT_EMOJI: &str = "🎉";

/// Writes `¡Feliz cumpleaños, {name}! {emoji}` followed by the context on its
/// own line when there is one.
#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    emoji: String,
}

impl TemplateGenerator {
    pub fn new(emoji: impl Into<String>) -> Self {
        Self {
            emoji: emoji.into(),
        }
    }

    fn emoji(&self) -> &str {
        let emoji = self.emoji.trim();
        if emoji.is_empty() {
            DEFAULT_EMOJI
        } else {
            emoji
        }
    }

    fn render(&self, input: &MessageInput) -> String {
        let context = input.context.trim();
        if context.is_empty() {
            format!("¡Feliz cumpleaños, {}! {}", input.name, self.emoji())
        } else {
            format!(
                "¡Feliz cumpleaños, {}! {}\n{}",
                input.name,
                self.emoji(),
                context
            )
        }
    }
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_EMOJI)
    }
}

#[async_trait]
impl MessageGenerator for TemplateGenerator {
    async fn generate(&self, input: MessageInput) -> GenerateResult<GreetingMessage> {
        Ok(GreetingMessage::new(self.render(&input)))
    }
}
