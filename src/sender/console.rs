//! Sender that prints messages instead of delivering them.
//!
//! Used as the WhatsApp stand-in: every message is written as a framed block
//! to the configured writer (stdout by default).

use super::MessageSender;
use crate::domain::Phone;
use crate::error::{SendError, SendResult};
use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Shared writer handle.
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
pub struct ConsoleSender {
    out: SharedWriter,
}

impl ConsoleSender {
    pub fn new(out: SharedWriter) -> Self {
        Self { out }
    }

    /// Sender writing to the process stdout.
    pub fn stdout() -> Self {
        Self::new(Arc::new(Mutex::new(Box::new(std::io::stdout()))))
    }
}

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send_text(&self, to: &Phone, text: &str) -> SendResult<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| SendError::Unavailable("output writer poisoned".to_string()))?;

        write!(
            out,
            "---- GOBIRTH (DRY WHATSAPP) ----\nTO: {}\nMSG:\n{}\n-------------------------------\n\n",
            to, text
        )?;
        out.flush()?;

        tracing::debug!(to = %to, "Message written to console");
        Ok(())
    }
}

impl std::fmt::Debug for ConsoleSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSender").finish_non_exhaustive()
    }
}
