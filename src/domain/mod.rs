//! Domain value objects and types.
//!
//! This module contains the validated types the greeting pipeline works with:
//! phone numbers, contacts and greeting messages. Each one validates at
//! construction time so invalid data can't be represented past the parser.

pub mod contact;
pub mod errors;
pub mod message;
pub mod phone;

pub use contact::Contact;
pub use errors::ValidationError;
pub use message::GreetingMessage;
pub use phone::Phone;
