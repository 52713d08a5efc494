//! Time sources.
//!
//! The greeting run only needs "now" in the configured timezone; everything
//! else is derived from the calendar day of that instant.

use crate::error::{ConfigError, ConfigResult};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// Hour of day used for resolved run instants.
const RUN_HOUR: u32 = 9;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;
}

/// Wall clock in a fixed timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Tz>);

impl FixedClock {
    pub fn new(at: DateTime<Tz>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}

/// Resolve the instant a run is anchored to: 09:00 local time on `date`
/// (`YYYY-MM-DD`) or, when no date is given, on today's date in `tz`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an unparseable date.
pub fn resolve_run_date(
    date: Option<&str>,
    tz: Tz,
    now: DateTime<Utc>,
) -> ConfigResult<DateTime<Tz>> {
    let day = match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ConfigError::InvalidValue {
                var: "--date".to_string(),
                reason: format!("invalid date {:?}, expected YYYY-MM-DD", raw),
            }
        })?,
        None => now.with_timezone(&tz).date_naive(),
    };

    Ok(at_run_hour(day, tz))
}

/// Clock for a run: frozen at 09:00 local on `date` when one is given,
/// otherwise the wall clock in `tz`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for an unparseable date.
pub fn run_clock(date: Option<&str>, tz: Tz) -> ConfigResult<Arc<dyn Clock>> {
    match date {
        Some(date) => {
            let run_at = resolve_run_date(Some(date), tz, Utc::now())?;
            Ok(Arc::new(FixedClock::new(run_at)))
        }
        None => Ok(Arc::new(SystemClock::new(tz))),
    }
}

fn at_run_hour(day: NaiveDate, tz: Tz) -> DateTime<Tz> {
    let local = day.and_time(NaiveTime::from_hms_opt(RUN_HOUR, 0, 0).unwrap_or(NaiveTime::MIN));
    tz.from_local_datetime(&local)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&local))
}
