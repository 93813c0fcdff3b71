//! Agenda, month grid and upcoming views over published events.

mod service;
mod view;

pub use service::CalendarService;
pub use view::{AgendaSpan, CalendarEntry, EventOccurrences, MonthCell, MonthGrid};
