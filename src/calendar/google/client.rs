//! HTTP client for the Google Calendar v3 API.
//!
//! This is a synchronous client built on `ureq`. [`super::GoogleCalendarProvider`]
//! calls it through `tokio::task::spawn_blocking` so the runtime is never blocked.

use crate::error::{CalendarError, CalendarResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// Default API root.
pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/calendar/v3";

/// One page of the user's calendar list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListPage {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// A calendar the user has access to.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarListEntry {
    pub id: String,

    #[serde(default)]
    pub summary: String,
}

/// One page of events.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    #[serde(default)]
    pub items: Vec<EventItem>,

    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// An event as returned by `events.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventItem {
    pub id: String,
    pub summary: String,
    pub description: String,
    pub start: Option<EventStart>,
}

/// Start of an event: `date` for all-day events, `dateTime` otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventStart {
    pub date: Option<String>,
    pub date_time: Option<String>,
}

/// Synchronous Google Calendar client.
#[derive(Clone)]
pub struct GoogleCalendarClient {
    /// API root, without trailing slash
    base_url: String,

    /// OAuth bearer token
    access_token: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,
}

impl GoogleCalendarClient {
    /// Create a client against `base_url` with the given bearer token.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            agent: Arc::new(agent),
        }
    }

    /// Create a client with a 10 second timeout (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, access_token: String) -> Self {
        Self::new(base_url, access_token, Duration::from_secs(10))
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute an authenticated GET and decode the JSON body.
    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> CalendarResult<T> {
        let url = self.build_url(path);
        tracing::debug!("GET {}", url);

        let response = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .set("Accept", "application/json")
            .call()
            .map_err(Self::map_error)?;

        let body = response
            .into_string()
            .map_err(|e| CalendarError::Http(e.to_string()))?;

        Ok(serde_json::from_str(&body)?)
    }

    /// Map a ureq error to a CalendarError.
    fn map_error(error: ureq::Error) -> CalendarError {
        match error {
            ureq::Error::Status(code, response) => {
                let message = response
                    .into_string()
                    .unwrap_or_else(|_| "Unknown error".to_string());

                match code {
                    401 | 403 => CalendarError::Unauthorized,
                    404 => CalendarError::NotFound(message),
                    _ => CalendarError::Api {
                        status: code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => {
                if transport.kind() == ureq::ErrorKind::ConnectionFailed {
                    CalendarError::Http("Connection failed".to_string())
                } else {
                    CalendarError::Http(transport.to_string())
                }
            }
        }
    }

    /// Fetch one page of the calendar list.
    pub fn list_calendars(&self, page_token: Option<&str>) -> CalendarResult<CalendarListPage> {
        let path = match page_token {
            Some(token) => format!(
                "/users/me/calendarList?pageToken={}",
                urlencoding::encode(token)
            ),
            None => "/users/me/calendarList".to_string(),
        };

        self.get_json(&path)
    }

    /// Find the id of the calendar whose summary matches `name`, paging
    /// through the whole list.
    ///
    /// Matching trims the summary and ignores case.
    pub fn find_calendar_id(&self, name: &str) -> CalendarResult<Option<String>> {
        let name = name.trim();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.list_calendars(page_token.as_deref())?;

            if let Some(entry) = page
                .items
                .into_iter()
                .find(|entry| entry.summary.trim().eq_ignore_ascii_case(name))
            {
                return Ok(Some(entry.id));
            }

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(None),
            }
        }
    }

    /// List the single (expanded) events in `[time_min, time_max)`, ordered
    /// by start time.
    ///
    /// A non-empty `query` is passed as the free-text `q` filter.
    pub fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        query: &str,
    ) -> CalendarResult<Vec<EventItem>> {
        let mut base_path = format!(
            "/calendars/{}/events?timeMin={}&timeMax={}&singleEvents=true&orderBy=startTime",
            urlencoding::encode(calendar_id),
            urlencoding::encode(&time_min.to_rfc3339()),
            urlencoding::encode(&time_max.to_rfc3339()),
        );
        if !query.trim().is_empty() {
            base_path.push_str(&format!("&q={}", urlencoding::encode(query.trim())));
        }

        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let path = match &page_token {
                Some(token) => format!("{}&pageToken={}", base_path, urlencoding::encode(token)),
                None => base_path.clone(),
            };

            let page: EventsPage = self.get_json(&path)?;
            items.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(items)
    }
}

impl std::fmt::Debug for GoogleCalendarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleCalendarClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
