//! Message dispatch.

pub mod console;

use crate::domain::Phone;
use crate::error::SendResult;
use async_trait::async_trait;

pub use console::ConsoleSender;

/// Delivers a text message to a phone number.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, to: &Phone, text: &str) -> SendResult<()>;
}
