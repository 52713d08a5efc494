//! Contact extraction from calendar events.
//!
//! The event title is the contact name. The description is free text in which
//! a few line markers are recognised (case-insensitively):
//!
//! ```text
//! phone: +34600111222
//! context: loves trail running
//! and anything with chocolate
//! ```
//!
//! `phone:` and `tel:` set the phone number (last one wins). `context:` opens
//! a block that collects every following non-marker line.

use crate::calendar::CalendarEvent;
use crate::domain::{Contact, Phone, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;

static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(phone|tel|context):").expect("Failed to compile marker regex")
});

/// Turns a raw calendar event into a validated contact.
pub trait ContactExtractor: Send + Sync {
    fn extract(&self, event: &CalendarEvent) -> Result<Contact, ValidationError>;
}

/// Structured fields pulled out of an event description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionFields {
    /// Raw phone candidate, not yet validated
    pub phone: Option<String>,

    /// Context block lines joined with `\n`, trimmed
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Phone,
    Context,
}

/// Split a trimmed line into its marker and the trimmed text after the colon.
fn marker(line: &str) -> Option<(Marker, &str)> {
    let caps = MARKER_REGEX.captures(line)?;
    let whole = caps.get(0)?;
    let kind = if caps[1].eq_ignore_ascii_case("context") {
        Marker::Context
    } else {
        Marker::Phone
    };
    Some((kind, line[whole.end()..].trim()))
}

/// Scan a description for phone and context markers.
pub fn parse_description(description: &str) -> DescriptionFields {
    let mut phone = None;
    let mut context_lines: Vec<&str> = Vec::new();
    let mut in_context = false;

    for line in description.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match marker(line) {
            Some((Marker::Phone, value)) => {
                in_context = false;
                phone = Some(value.to_string());
            }
            Some((Marker::Context, value)) => {
                in_context = true;
                if !value.is_empty() {
                    context_lines.push(value);
                }
            }
            None if in_context => context_lines.push(line),
            None => {}
        }
    }

    DescriptionFields {
        phone,
        context: context_lines.join("\n").trim().to_string(),
    }
}

/// Default extractor: title as name, description markers for the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }
}

impl ContactExtractor for EventParser {
    fn extract(&self, event: &CalendarEvent) -> Result<Contact, ValidationError> {
        let name = event.title.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let fields = parse_description(&event.description);
        let phone = Phone::new(fields.phone.as_deref().unwrap_or_default())?;

        Contact::new(name, phone, fields.context)
    }
}
