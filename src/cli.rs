//! Command-line surface.
//!
//! Every flag is optional; unset flags leave the environment configuration
//! untouched (see [`crate::config::Config::apply_cli`]).

use crate::config::CalendarSource;
use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;

/// Send today's birthday greetings.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gobirth", version, about, long_about = None)]
pub struct Cli {
    /// Calendar provider: file|google.
    #[arg(long, value_name = "PROVIDER", value_parser = parse_source)]
    pub calendar_provider: Option<CalendarSource>,

    /// Path to a JSON file with calendar events.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub calendar_file: Option<PathBuf>,

    /// Generate messages without sending them (`--dry-run=false` to send).
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = clap::value_parser!(bool),
        value_name = "BOOL"
    )]
    pub dry_run: Option<bool>,

    /// Maximum number of greetings to process per run (0 or negative for no cap).
    #[arg(long = "max", value_name = "N", allow_negative_numbers = true)]
    pub max_per_run: Option<i64>,

    /// Run for a specific date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<String>,

    /// Emoji to include in template messages.
    #[arg(long)]
    pub emoji: Option<String>,

    /// Only process events carrying this tag.
    #[arg(long)]
    pub tag: Option<String>,

    /// IANA timezone the run day is computed in (e.g. Europe/Madrid).
    #[arg(long, value_name = "TZ")]
    pub timezone: Option<String>,

    /// Google Calendar name to read from.
    #[arg(long, value_name = "NAME")]
    pub google_calendar: Option<String>,

    /// Path to Google OAuth credentials.json.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub google_credentials: Option<PathBuf>,

    /// Path to Google OAuth token.json.
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub google_token: Option<PathBuf>,
}

fn parse_source(raw: &str) -> Result<CalendarSource, String> {
    raw.parse()
}
