use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ServiceError;

/// Length of the agenda list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgendaSpan {
    #[default]
    Week,
    Fortnight,
}

impl AgendaSpan {
    #[must_use]
    pub const fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Fortnight => 14,
        }
    }
}

impl TryFrom<u32> for AgendaSpan {
    type Error = ServiceError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(Self::Week),
            14 => Ok(Self::Fortnight),
            other => Err(ServiceError::ValidationError(format!(
                "agenda span must be 7 or 14 days, got {other}"
            ))),
        }
    }
}

/// One event placed on one civil date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    pub event_id: Uuid,
    pub title: String,
    #[serde(skip)]
    pub date: NaiveDate,
    /// `YYYY-MM-DD` in community time.
    #[serde(rename = "date")]
    pub date_key: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub all_day: bool,
    pub recurring: bool,
    /// Community wall-clock start; `None` for all-day entries.
    pub local_time: Option<NaiveTime>,
}

impl CalendarEntry {
    /// Date, all-day before timed, local time, title, id.
    #[must_use]
    pub fn display_order(&self, other: &Self) -> std::cmp::Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| other.all_day.cmp(&self.all_day))
            .then_with(|| self.local_time.cmp(&other.local_time))
            .then_with(|| self.title.cmp(&other.title))
            .then_with(|| self.event_id.cmp(&other.event_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCell {
    #[serde(skip)]
    pub date: NaiveDate,
    #[serde(rename = "date")]
    pub date_key: String,
    pub entries: Vec<CalendarEntry>,
}

/// Every day of a month with the occurrences falling on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<MonthCell>,
}

impl MonthGrid {
    #[must_use]
    pub fn cell(&self, date: NaiveDate) -> Option<&MonthCell> {
        self.cells.iter().find(|cell| cell.date == date)
    }

    /// Number of entries across all cells.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.entries.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOccurrences {
    pub event_id: Uuid,
    /// Canonical rule text; `None` for one-off events.
    pub rule: Option<String>,
    pub dates: Vec<NaiveDate>,
}
