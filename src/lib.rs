//! Birthday Greeter - daily birthday greetings from calendar events.
//!
//! Each run reads the birthday events for one day from a calendar, extracts
//! the contact (name, phone, personal context) from every event, generates a
//! greeting and dispatches it. Failures are isolated per event and reported in
//! a single [`RunResult`].
//!
//! # Architecture
//!
//! - **domain**: Validated values (phone, contact, greeting message)
//! - **services**: Contact extraction and the daily greeting run
//! - **calendar**: Calendar sources (JSON file, Google Calendar)
//! - **message**: Greeting text generation
//! - **sender**: Message dispatch
//! - **clock**: Time sources and run date resolution
//! - **config** / **cli**: Environment and command-line configuration
//! - **error**: Custom error types for precise error handling

pub mod calendar;
pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod message;
pub mod sender;
pub mod services;

pub use calendar::{CalendarEvent, CalendarProvider, FileCalendarProvider, GoogleCalendarProvider};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{CalendarSource, Config};
pub use domain::{Contact, GreetingMessage, Phone, ValidationError};
pub use error::{CalendarError, ConfigError, GenerateError, GreetingError, SendError};
pub use message::{MessageGenerator, MessageInput, TemplateGenerator};
pub use sender::{ConsoleSender, MessageSender};
pub use services::{ContactExtractor, EventParser, RunDailyGreetings, RunOptions, RunResult};
