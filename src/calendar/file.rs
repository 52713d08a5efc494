//! JSON file calendar source.
//!
//! The file holds an array of events:
//!
//! ```json
//! [
//!   {"id": "1", "title": "Ann", "description": "phone: +34600111222",
//!    "start_date": "2026-01-16", "tags": ["birthday"]}
//! ]
//! ```

use super::{CalendarEvent, CalendarProvider};
use crate::error::{CalendarError, CalendarResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// On-disk shape of one event.
#[derive(Debug, Deserialize)]
struct EventRecord {
    #[serde(default)]
    id: String,

    #[serde(default)]
    title: String,

    #[serde(default)]
    description: String,

    start_date: String,

    /// Optional labels; untagged events match every tag
    #[serde(default)]
    tags: Option<Vec<String>>,
}

impl EventRecord {
    fn matches_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() {
            return true;
        }

        match &self.tags {
            Some(tags) => tags.iter().any(|t| t.trim().eq_ignore_ascii_case(tag)),
            None => true,
        }
    }
}

/// Calendar source backed by a JSON file.
///
/// The file is read again on every call.
#[derive(Debug, Clone)]
pub struct FileCalendarProvider {
    path: PathBuf,
}

impl FileCalendarProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> CalendarResult<Vec<EventRecord>> {
        let file = File::open(&self.path).map_err(|source| CalendarError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        let records: Vec<EventRecord> = serde_json::from_reader(BufReader::new(file))?;
        Ok(records)
    }

    /// Pick the events that fall on `date` and carry `tag`, keeping file order.
    fn select(
        records: Vec<EventRecord>,
        date: NaiveDate,
        tag: &str,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        let mut events = Vec::with_capacity(records.len());

        for record in records {
            let start = NaiveDate::parse_from_str(record.start_date.trim(), "%Y-%m-%d").map_err(
                |_| CalendarError::InvalidDate {
                    id: record.id.clone(),
                    value: record.start_date.clone(),
                },
            )?;

            if start != date || !record.matches_tag(tag) {
                continue;
            }

            events.push(CalendarEvent {
                id: record.id,
                title: record.title,
                description: record.description,
                start_date: Some(start),
            });
        }

        Ok(events)
    }
}

#[async_trait]
impl CalendarProvider for FileCalendarProvider {
    async fn events_for_date(
        &self,
        date: NaiveDate,
        tag: &str,
    ) -> CalendarResult<Vec<CalendarEvent>> {
        let records = self.load()?;
        let total = records.len();
        let events = Self::select(records, date, tag)?;

        tracing::debug!(
            path = %self.path.display(),
            %date,
            total,
            matched = events.len(),
            "Loaded file calendar"
        );

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn calendar_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_filters_by_date() {
        let file = calendar_file(
            r#"[
  {"id":"1","title":"Pepe","description":"phone: +34600111222","start_date":"2026-01-16"},
  {"id":"2","title":"Ana","description":"phone: +34600333444","start_date":"2026-01-17"}
]"#,
        );

        let provider = FileCalendarProvider::new(file.path());
        let events = provider.events_for_date(day(2026, 1, 16), "").await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Pepe");
        assert_eq!(events[0].start_date, Some(day(2026, 1, 16)));
    }

    #[tokio::test]
    async fn test_keeps_file_order() {
        let file = calendar_file(
            r#"[
  {"id":"b","title":"B","start_date":"2026-03-01"},
  {"id":"a","title":"A","start_date":"2026-03-01"},
  {"id":"c","title":"C","start_date":"2026-03-01"}
]"#,
        );

        let provider = FileCalendarProvider::new(file.path());
        let ids: Vec<String> = provider
            .events_for_date(day(2026, 3, 1), "")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_filters_by_tag() {
        let file = calendar_file(
            r#"[
  {"id":"1","title":"Tagged","start_date":"2026-01-16","tags":["Birthday"]},
  {"id":"2","title":"Other","start_date":"2026-01-16","tags":["work"]},
  {"id":"3","title":"Untagged","start_date":"2026-01-16"}
]"#,
        );

        let provider = FileCalendarProvider::new(file.path());
        let titles: Vec<String> = provider
            .events_for_date(day(2026, 1, 16), " birthday ")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();

        assert_eq!(titles, vec!["Tagged", "Untagged"]);
    }

    #[tokio::test]
    async fn test_invalid_start_date_fails_fetch() {
        let file = calendar_file(r#"[{"id":"x","title":"X","start_date":"16/01/2026"}]"#);

        let provider = FileCalendarProvider::new(file.path());
        let err = provider
            .events_for_date(day(2026, 1, 16), "")
            .await
            .unwrap_err();

        match err {
            CalendarError::InvalidDate { id, value } => {
                assert_eq!(id, "x");
                assert_eq!(value, "16/01/2026");
            }
            other => panic!("Expected InvalidDate, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_fails_fetch() {
        let file = calendar_file("{not json");

        let provider = FileCalendarProvider::new(file.path());
        let err = provider
            .events_for_date(day(2026, 1, 16), "")
            .await
            .unwrap_err();
        assert!(matches!(err, CalendarError::Decode(_)));
    }

    #[tokio::test]
    async fn test_missing_file_fails_fetch() {
        let provider = FileCalendarProvider::new("/definitely/not/here.json");
        let err = provider
            .events_for_date(day(2026, 1, 16), "")
            .await
            .unwrap_err();

        assert!(matches!(err, CalendarError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
