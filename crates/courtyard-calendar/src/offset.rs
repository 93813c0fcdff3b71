//! Conversion of stored UTC instants to the community's civil calendar.
//!
//! The community observes a single fixed offset. No daylight-saving
//! transitions are modeled, so every conversion is a constant shift.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use std::str::FromStr;

use crate::error::{RecurError, RecurResult};

/// Fixed offset of the community's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommunityOffset(FixedOffset);

impl CommunityOffset {
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self(offset)
    }

    /// UTC itself.
    #[must_use]
    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    #[must_use]
    pub const fn fixed(&self) -> FixedOffset {
        self.0
    }

    /// ## Summary
    /// Wall-clock time of `instant` in the community offset.
    ///
    /// Saturates at the edges of the supported calendar.
    #[must_use]
    pub fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant
            .naive_utc()
            .checked_add_offset(self.0)
            .unwrap_or(if self.0.local_minus_utc() > 0 {
                NaiveDateTime::MAX
            } else {
                NaiveDateTime::MIN
            })
    }

    /// ## Summary
    /// UTC instant of a community wall-clock time.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` if the instant falls outside the
    /// supported calendar.
    pub fn to_utc(&self, local: NaiveDateTime) -> RecurResult<DateTime<Utc>> {
        local
            .checked_sub_offset(self.0)
            .map(|utc| Utc.from_utc_datetime(&utc))
            .ok_or_else(|| {
                RecurError::InvalidWindow(format!("{local} at {} is out of range", self.0))
            })
    }

    /// ## Summary
    /// Civil date of `instant` in the community offset.
    #[must_use]
    pub fn civil_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local_datetime(instant).date()
    }

    /// ## Summary
    /// Zero-padded `YYYY-MM-DD` key for `instant`.
    ///
    /// Keys sort lexicographically in chronological order, so they double as
    /// grouping and comparison keys.
    #[must_use]
    pub fn date_key(&self, instant: DateTime<Utc>) -> String {
        self.civil_date(instant).format("%Y-%m-%d").to_string()
    }

    /// ## Summary
    /// UTC instant of local midnight starting `date`.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` at the edges of the calendar.
    pub fn day_start(&self, date: NaiveDate) -> RecurResult<DateTime<Utc>> {
        self.to_utc(date.and_time(NaiveTime::MIN))
    }
}

impl Default for CommunityOffset {
    fn default() -> Self {
        Self::utc()
    }
}

impl From<FixedOffset> for CommunityOffset {
    fn from(offset: FixedOffset) -> Self {
        Self(offset)
    }
}

impl FromStr for CommunityOffset {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(courtyard_core::config::parse_utc_offset(s)?))
    }
}

impl std::fmt::Display for CommunityOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
