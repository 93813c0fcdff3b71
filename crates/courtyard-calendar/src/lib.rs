//! Recurrence expansion and civil-date normalization for the community calendar.
//!
//! Everything in this crate is pure: callers pass the window and the
//! community offset explicitly and no clock is consulted.

pub mod error;
pub mod expand;
pub mod offset;
pub mod rule;
pub mod window;

pub use expand::{EventSchedule, Expander};
pub use offset::CommunityOffset;
pub use rule::{Frequency, RecurrenceKind, RecurrenceRule, SeriesEnd, WeekdayRule};
pub use window::Window;
