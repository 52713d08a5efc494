use async_trait::async_trait;
use birthday_greeter::calendar::{CalendarEvent, CalendarProvider};
use birthday_greeter::error::{CalendarError, CalendarResult};
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

/// Mock calendar for testing.
///
/// Returns a fixed list of events (or a configured failure) and records the
/// date and tag of every request.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockCalendar {
    events: Arc<Mutex<Vec<CalendarEvent>>>,
    fail_with: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<(NaiveDate, String)>>>,
}

#[allow(dead_code)]
impl MockCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calendar returning `events` in the given order.
    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        let calendar = Self::new();
        *calendar.events.lock().unwrap() = events;
        calendar
    }

    /// Make every fetch fail with `CalendarError::Http(message)`.
    pub fn failing(message: &str) -> Self {
        let calendar = Self::new();
        *calendar.fail_with.lock().unwrap() = Some(message.to_string());
        calendar
    }

    pub fn requests(&self) -> Vec<(NaiveDate, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CalendarProvider for MockCalendar {
    async fn events_for_date(
        &self,
        date: NaiveDate,
        tag: &str,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        self.requests.lock().unwrap().push((date, tag.to_string()));

        if let Some(message) = self.fail_with.lock().unwrap().clone() {
            return Err(CalendarError::Http(message));
        }

        Ok(self.events.lock().unwrap().clone())
    }
}
