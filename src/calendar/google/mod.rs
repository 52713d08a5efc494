//! Google Calendar source.
//!
//! Events are read from a calendar selected by name. The name is resolved to
//! a calendar id once and cached for the lifetime of the provider.

pub mod auth;
mod client;

pub use auth::{AuthConfig, Token};
pub use client::{GoogleCalendarClient, DEFAULT_API_URL};

use super::{CalendarEvent, CalendarProvider};
use crate::error::{CalendarError, CalendarResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use client::EventItem;
use std::sync::{Arc, Mutex};

/// Calendar source backed by the Google Calendar API.
pub struct GoogleCalendarProvider {
    client: Arc<GoogleCalendarClient>,
    calendar_name: String,
    tz: Tz,
    calendar_id: Mutex<Option<String>>,
}

impl GoogleCalendarProvider {
    /// Create a provider reading from the calendar called `calendar_name`.
    ///
    /// Day windows and event start dates are computed in `tz`.
    pub fn new(client: GoogleCalendarClient, calendar_name: impl Into<String>, tz: Tz) -> Self {
        Self {
            client: Arc::new(client),
            calendar_name: calendar_name.into(),
            tz,
            calendar_id: Mutex::new(None),
        }
    }

    fn cached_calendar_id(&self) -> Option<String> {
        self.calendar_id.lock().ok().and_then(|slot| slot.clone())
    }

    /// Resolve the configured calendar name to an id, hitting the API only
    /// on the first call.
    async fn resolve_calendar_id(&self) -> CalendarResult<String> {
        if let Some(id) = self.cached_calendar_id() {
            return Ok(id);
        }

        let name = self.calendar_name.trim().to_string();
        if name.is_empty() {
            return Err(CalendarError::CalendarNotFound(name));
        }

        let client = self.client.clone();
        let lookup_name = name.clone();
        let found = tokio::task::spawn_blocking(move || client.find_calendar_id(&lookup_name))
            .await
            .map_err(|e| CalendarError::Http(format!("Task join error: {}", e)))??;

        let id = found.ok_or(CalendarError::CalendarNotFound(name))?;

        if let Ok(mut slot) = self.calendar_id.lock() {
            *slot = Some(id.clone());
        }
        tracing::debug!(calendar_id = %id, "Resolved Google calendar");

        Ok(id)
    }

    /// Local midnight of `date` in `tz`. Falls back to UTC midnight when a
    /// DST gap swallows local midnight.
    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        self.tz
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    }

    fn event_start(&self, item: &EventItem) -> Option<NaiveDate> {
        let start = item.start.as_ref()?;

        if let Some(date) = start.date.as_deref() {
            if let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                return Some(date);
            }
        }

        start
            .date_time
            .as_deref()
            .and_then(|dt| DateTime::parse_from_rfc3339(dt).ok())
            .map(|dt| dt.with_timezone(&self.tz).date_naive())
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    async fn events_for_date(
        &self,
        date: NaiveDate,
        tag: &str,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        let calendar_id = self.resolve_calendar_id().await?;

        let time_min = self.start_of_day(date);
        let time_max = time_min + Duration::hours(24);

        let client = self.client.clone();
        let query = tag.to_string();
        let items = tokio::task::spawn_blocking(move || {
            client.list_events(&calendar_id, time_min, time_max, &query)
        })
        .await
        .map_err(|e| CalendarError::Http(format!("Task join error: {}", e)))??;

        tracing::debug!(%date, count = items.len(), "Fetched Google calendar events");

        Ok(items
            .into_iter()
            .map(|item| {
                let start_date = self.event_start(&item);
                CalendarEvent {
                    id: item.id,
                    title: item.summary,
                    description: item.description,
                    start_date,
                }
            })
            .collect())
    }
}

impl std::fmt::Debug for GoogleCalendarProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarProvider")
            .field("calendar_name", &self.calendar_name)
            .field("tz", &self.tz)
            .finish_non_exhaustive()
    }
}
