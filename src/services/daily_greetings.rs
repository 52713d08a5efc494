//! The daily greeting run.
//!
//! One run fetches the day's birthday events and, for each one, extracts the
//! contact, generates a greeting and dispatches it. Only a failed calendar
//! fetch stops the run; every per-event failure is recorded and the run moves
//! on to the next event.

use super::event_parser::{ContactExtractor, EventParser};
use crate::calendar::{CalendarEvent, CalendarProvider};
use crate::clock::Clock;
use crate::error::GreetingError;
use crate::message::{MessageGenerator, MessageInput};
use crate::sender::MessageSender;
use chrono::NaiveDate;
use std::sync::Arc;

/// Outcome counters of a single run.
///
/// After a successful fetch `sent + skipped + failed == total`. A failed
/// fetch reports `total == 0`, `failed == 1` and the fetch error.
#[derive(Debug, Default)]
pub struct RunResult {
    pub total: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
    pub errors: Vec<GreetingError>,
}

impl RunResult {
    fn with_total(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    /// Result of a run whose calendar fetch failed.
    fn fetch_failed(err: GreetingError) -> Self {
        Self {
            failed: 1,
            errors: vec![err],
            ..Default::default()
        }
    }

    pub fn record_sent(&mut self) {
        self.sent += 1;
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn record_failure(&mut self, err: GreetingError) {
        self.failed += 1;
        self.errors.push(err);
    }

    /// Count events left out by the per-run cap.
    pub fn skip_remaining(&mut self, count: usize) {
        self.skipped += count;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// `total=.. sent=.. skipped=.. failed=..`
    pub fn summary_line(&self) -> String {
        format!(
            "total={} sent={} skipped={} failed={}",
            self.total, self.sent, self.skipped, self.failed
        )
    }
}

/// Run settings that are not collaborators.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Label the calendar filters on
    pub tag: String,

    /// Events processed per run; `None` or `Some(0)` means no cap
    pub max_per_run: Option<usize>,

    /// Generate messages but never dispatch them
    pub dry_run: bool,
}

impl RunOptions {
    /// Number of events to process out of `available`.
    pub fn effective_limit(&self, available: usize) -> usize {
        match self.max_per_run {
            Some(max) if max > 0 && max < available => max,
            _ => available,
        }
    }
}

enum Outcome {
    Sent,
    Skipped,
}

/// The daily greeting use case.
pub struct RunDailyGreetings {
    calendar: Arc<dyn CalendarProvider>,
    extractor: Arc<dyn ContactExtractor>,
    generator: Arc<dyn MessageGenerator>,
    sender: Arc<dyn MessageSender>,
    clock: Arc<dyn Clock>,
    options: RunOptions,
}

impl RunDailyGreetings {
    /// Create a run with the default [`EventParser`] as extractor.
    pub fn new(
        calendar: Arc<dyn CalendarProvider>,
        generator: Arc<dyn MessageGenerator>,
        sender: Arc<dyn MessageSender>,
        clock: Arc<dyn Clock>,
        options: RunOptions,
    ) -> Self {
        Self {
            calendar,
            extractor: Arc::new(EventParser),
            generator,
            sender,
            clock,
            options,
        }
    }

    /// Replace the contact extractor.
    pub fn with_extractor(mut self, extractor: Arc<dyn ContactExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Execute the run and report what happened.
    pub async fn run(&self) -> RunResult {
        let date = self.clock.now().date_naive();
        let tag = self.options.tag.as_str();

        tracing::info!(
            %date,
            tag,
            max_per_run = ?self.options.max_per_run,
            dry_run = self.options.dry_run,
            "Starting daily greeting run"
        );

        let events = match self.calendar.events_for_date(date, tag).await {
            Ok(events) => events,
            Err(e) => {
                tracing::error!(error = %e, "Calendar fetch failed, aborting run");
                return RunResult::fetch_failed(e.into());
            }
        };

        let mut result = RunResult::with_total(events.len());
        let limit = self.options.effective_limit(events.len());

        for event in &events[..limit] {
            match self.process(event, date).await {
                Ok(Outcome::Sent) => result.record_sent(),
                Ok(Outcome::Skipped) => result.record_skipped(),
                Err(e) => {
                    tracing::warn!(event_id = %event.id, error = %e, "Greeting failed");
                    result.record_failure(e);
                }
            }
        }

        if events.len() > limit {
            tracing::info!(
                skipped = events.len() - limit,
                limit,
                "Per-run cap reached, leaving remaining events"
            );
            result.skip_remaining(events.len() - limit);
        }

        tracing::info!(summary = %result.summary_line(), "Daily greeting run finished");
        result
    }

    async fn process(&self, event: &CalendarEvent, date: NaiveDate) -> Result<Outcome, GreetingError> {
        let contact = self
            .extractor
            .extract(event)
            .map_err(|source| GreetingError::Extraction {
                event_id: event.id.clone(),
                source,
            })?;

        let message = self
            .generator
            .generate(MessageInput {
                name: contact.name().to_string(),
                context: contact.context().to_string(),
                date,
            })
            .await
            .map_err(|source| GreetingError::Generation {
                event_id: event.id.clone(),
                source,
            })?;

        if self.options.dry_run {
            tracing::debug!(event_id = %event.id, name = contact.name(), "Dry run, not sending");
            return Ok(Outcome::Skipped);
        }

        self.sender
            .send_text(contact.phone(), message.text())
            .await
            .map_err(|source| GreetingError::Dispatch {
                event_id: event.id.clone(),
                source,
            })?;

        tracing::info!(event_id = %event.id, name = contact.name(), "Greeting sent");
        Ok(Outcome::Sent)
    }
}
