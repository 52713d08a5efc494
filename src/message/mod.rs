//! Greeting text generation.

pub mod template;

use crate::domain::GreetingMessage;
use crate::error::GenerateResult;
use async_trait::async_trait;
use chrono::NaiveDate;

pub use template::TemplateGenerator;

/// Everything a generator needs to write one greeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInput {
    pub name: String,

    /// Personal context; empty when the event had none
    pub context: String,

    /// The day being celebrated
    pub date: NaiveDate,
}

/// Produces the greeting text for a contact.
#[async_trait]
pub trait MessageGenerator: Send + Sync {
    async fn generate(&self, input: MessageInput) -> GenerateResult<GreetingMessage>;
}
