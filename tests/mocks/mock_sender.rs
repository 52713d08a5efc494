use async_trait::async_trait;
use birthday_greeter::domain::Phone;
use birthday_greeter::error::{SendError, SendResult};
use birthday_greeter::sender::MessageSender;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// A message the mock sender accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub text: String,
}

/// Mock sender for testing.
///
/// Records every delivered message and can reject specific phone numbers.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockSender {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    attempts: Arc<Mutex<usize>>,
    reject: Arc<Mutex<HashSet<String>>>,
}

#[allow(dead_code)]
impl MockSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every send to `phone`.
    pub fn reject(&self, phone: &str) {
        self.reject.lock().unwrap().insert(phone.to_string());
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl MessageSender for MockSender {
    async fn send_text(&self, to: &Phone, text: &str) -> SendResult<()> {
        *self.attempts.lock().unwrap() += 1;

        if self.reject.lock().unwrap().contains(to.as_str()) {
            return Err(SendError::Unavailable(format!("{} unreachable", to)));
        }

        self.sent.lock().unwrap().push(SentMessage {
            to: to.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}
