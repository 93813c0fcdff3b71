//! Half-open time windows over which occurrences are enumerated.

use chrono::{DateTime, Months, NaiveDate, TimeDelta, Utc};

use crate::error::{RecurError, RecurResult};
use crate::offset::CommunityOffset;

/// `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Window {
    /// ## Summary
    /// Creates a window from explicit bounds.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` if `end` is not after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> RecurResult<Self> {
        if end <= start {
            return Err(RecurError::InvalidWindow(format!(
                "window end {end} is not after start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// ## Summary
    /// `days` whole local days starting at local midnight of `first_day`.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` if `days` is zero or the range
    /// leaves the supported calendar.
    pub fn days(offset: &CommunityOffset, first_day: NaiveDate, days: u32) -> RecurResult<Self> {
        let last = first_day
            .checked_add_days(chrono::Days::new(u64::from(days)))
            .ok_or_else(|| RecurError::InvalidWindow(format!("{days} days after {first_day}")))?;
        Self::new(offset.day_start(first_day)?, offset.day_start(last)?)
    }

    /// ## Summary
    /// The whole local calendar month.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` for a month outside 1..=12 or
    /// one at the edge of the supported calendar.
    pub fn month(offset: &CommunityOffset, year: i32, month: u32) -> RecurResult<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| RecurError::InvalidWindow(format!("no such month {year}-{month}")))?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| RecurError::InvalidWindow(format!("no month after {year}-{month}")))?;
        Self::new(offset.day_start(first)?, offset.day_start(next)?)
    }

    /// ## Summary
    /// From `now` for `days` days, used for the "upcoming" list.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` if `days` is zero or the end is
    /// not representable.
    pub fn starting_at(now: DateTime<Utc>, days: u32) -> RecurResult<Self> {
        let end = now
            .checked_add_signed(TimeDelta::days(i64::from(days)))
            .ok_or_else(|| RecurError::InvalidWindow(format!("{days} days after {now}")))?;
        Self::new(now, end)
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// First civil date touched by the window.
    #[must_use]
    pub fn first_date(&self, offset: &CommunityOffset) -> NaiveDate {
        offset.civil_date(self.start)
    }

    /// Last civil date touched by the window (inclusive).
    #[must_use]
    pub fn last_date(&self, offset: &CommunityOffset) -> NaiveDate {
        offset.civil_date(self.end - TimeDelta::nanoseconds(1))
    }

    /// ## Summary
    /// Narrows the end of the window, returning `None` when nothing remains.
    #[must_use]
    pub fn clamp_end(&self, end: DateTime<Utc>) -> Option<Self> {
        Self::new(self.start, self.end.min(end)).ok()
    }
}
