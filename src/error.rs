//! Error types for the birthday greeter.
//!
//! This module defines custom error types using `thiserror`. Domain validation
//! errors live in [`crate::domain::ValidationError`]; everything that crosses an
//! adapter boundary is defined here.

use crate::domain::ValidationError;
use thiserror::Error;

/// Errors that can occur when fetching events from a calendar source.
///
/// Any of these aborts the whole run.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// The calendar file could not be opened or read
    #[error("file calendar: open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The calendar payload is not valid JSON
    #[error("file calendar: decode json: {0}")]
    Decode(#[from] serde_json::Error),

    /// An event carries an unparseable start date
    #[error("file calendar: invalid start_date for id={id}: {value}")]
    InvalidDate { id: String, value: String },

    /// No calendar with the configured name exists
    #[error("google calendar: calendar {0:?} not found (create it in Google Calendar)")]
    CalendarNotFound(String),

    /// HTTP request failed
    #[error("google calendar: HTTP request failed: {0}")]
    Http(String),

    /// API returned an error status code
    #[error("google calendar: API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication failed
    #[error("google calendar: authentication failed")]
    Unauthorized,

    /// Resource not found
    #[error("google calendar: resource not found: {0}")]
    NotFound(String),

    /// Credentials could not be loaded or refreshed
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Errors raised by the Google OAuth helper.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Credentials file missing or unreadable
    #[error("google auth: read credentials: {0}")]
    ReadCredentials(#[source] std::io::Error),

    /// Credentials file has an unexpected shape
    #[error("google auth: parse credentials json: {0}")]
    ParseCredentials(String),

    /// Reading the authorization code from stdin failed
    #[error("google auth: read code: {0}")]
    ReadCode(#[source] std::io::Error),

    /// The token endpoint rejected the exchange or refresh
    #[error("google auth: token request failed: {0}")]
    TokenRequest(String),

    /// The token cache could not be written
    #[error("google auth: save token: {0}")]
    SaveToken(#[source] std::io::Error),
}

/// Errors that can occur while generating a greeting.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The generator produced no text
    #[error("generator produced an empty message")]
    EmptyMessage,

    /// Generic generation failure
    #[error("message generation failed: {0}")]
    Other(String),
}

/// Errors that can occur while dispatching a greeting.
#[derive(Error, Debug)]
pub enum SendError {
    /// Writing to the output channel failed
    #[error("send failed: {0}")]
    Io(#[from] std::io::Error),

    /// The output channel is unavailable
    #[error("sender unavailable: {0}")]
    Unavailable(String),
}

/// An error recorded in a run report.
///
/// Only `Calendar` is fatal to a run; the per-event variants carry the id of
/// the event they belong to.
#[derive(Error, Debug)]
pub enum GreetingError {
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("event {event_id}: {source}")]
    Extraction {
        event_id: String,
        #[source]
        source: ValidationError,
    },

    #[error("event {event_id}: {source}")]
    Generation {
        event_id: String,
        #[source]
        source: GenerateError,
    },

    #[error("event {event_id}: {source}")]
    Dispatch {
        event_id: String,
        #[source]
        source: SendError,
    },
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required setting is missing
    #[error("Missing required setting: {0}")]
    MissingVar(String),

    /// Setting has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with CalendarError
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Convenience type alias for Results with AuthError
pub type AuthResult<T> = Result<T, AuthError>;

/// Convenience type alias for Results with GenerateError
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Convenience type alias for Results with SendError
pub type SendResult<T> = Result<T, SendError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
