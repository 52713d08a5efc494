use birthday_greeter::calendar::CalendarEvent;
use birthday_greeter::domain::{Contact, ValidationError};
use birthday_greeter::services::{ContactExtractor, EventParser};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock contact extractor for testing.
///
/// Records the id of every event it sees, rejects configured ids with
/// `ValidationError::InvalidPhone` and delegates the rest to [`EventParser`].
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockExtractor {
    reject: Arc<Mutex<HashSet<String>>>,
    seen: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail extraction for the event with `event_id`.
    pub fn reject(&self, event_id: &str) {
        self.reject.lock().unwrap().insert(event_id.to_string());
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl ContactExtractor for MockExtractor {
    fn extract(&self, event: &CalendarEvent) -> Result<Contact, ValidationError> {
        self.seen.lock().unwrap().push(event.id.clone());

        if self.reject.lock().unwrap().contains(&event.id) {
            return Err(ValidationError::InvalidPhone(format!("blocked {}", event.id)));
        }

        EventParser::new().extract(event)
    }
}
