//! Hand-written collaborators for driving the greeting run in tests.

pub mod mock_calendar;
pub mod mock_extractor;
pub mod mock_generator;
pub mod mock_sender;

#[allow(unused_imports)]
pub use mock_calendar::MockCalendar;
#[allow(unused_imports)]
pub use mock_extractor::MockExtractor;
#[allow(unused_imports)]
pub use mock_generator::MockGenerator;
#[allow(unused_imports)]
pub use mock_sender::{MockSender, SentMessage};
