//! Application service layer.
//!
//! Services hold the greeting logic and drive the calendar, generator and
//! sender ports. They never talk to files, HTTP or stdout directly.

mod daily_greetings;
mod event_parser;

pub use daily_greetings::{RunDailyGreetings, RunOptions, RunResult};
pub use event_parser::{parse_description, ContactExtractor, DescriptionFields, EventParser};
