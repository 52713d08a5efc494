//! Calendar sources.
//!
//! A [`CalendarProvider`] returns the birthday events for a single day. Two
//! implementations ship with the crate: a JSON file reader and a Google
//! Calendar client.

pub mod file;
pub mod google;

use crate::error::CalendarResult;
use async_trait::async_trait;
use chrono::NaiveDate;

pub use file::FileCalendarProvider;
pub use google::GoogleCalendarProvider;

/// A raw event as returned by a calendar source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalendarEvent {
    /// Source-specific identifier
    pub id: String,

    /// Event title, used as the contact name
    pub title: String,

    /// Free-text body holding `phone:`/`tel:` and `context:` markers
    pub description: String,

    /// Day the event starts on, if the source reported one
    pub start_date: Option<NaiveDate>,
}

impl CalendarEvent {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        start_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            start_date,
        }
    }
}

/// Source of birthday events.
///
/// Implementations must return events already filtered to `date` and `tag`.
/// The order of the returned list is preserved by the caller.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Retrieve the events that fall on `date` and carry `tag`.
    async fn events_for_date(&self, date: NaiveDate, tag: &str)
        -> CalendarResult<Vec<CalendarEvent>>;
}
