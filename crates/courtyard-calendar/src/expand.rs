//! Occurrence expansion for community events.
//!
//! Recurring series are expanded with the `rrule` crate in the community's
//! wall-clock frame: local date-times are handed to `rrule` as if they were
//! UTC. With a fixed offset this is exact, and it makes `BYDAY` and
//! `BYMONTHDAY` refer to local days.

use chrono::{DateTime, Month, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};
use rrule::{NWeekday, RRule, Tz, Unvalidated};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use courtyard_core::constants::DEFAULT_MAX_OCCURRENCES;

use crate::error::{RecurError, RecurResult};
use crate::offset::CommunityOffset;
use crate::rule::{Frequency, RecurrenceKind, RecurrenceRule, SeriesEnd};
use crate::window::Window;

/// Scheduling fields of an event publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSchedule {
    /// Anchor of the series. Events without one never occur.
    pub start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub recurrence_kind: RecurrenceKind,
    #[serde(default)]
    pub recurrence_rule: Option<String>,
    /// Series bound; occurrences on later civil dates are dropped.
    #[serde(default)]
    pub recurrence_until: Option<DateTime<Utc>>,
}

impl EventSchedule {
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        self.recurrence_kind.is_recurring()
    }

    /// ## Summary
    /// Rule governing the series, `None` for one-off events.
    ///
    /// A recurring kind without rule text falls back to the rule implied by
    /// the kind.
    ///
    /// ## Errors
    /// Returns the parse error of malformed rule text.
    pub fn rule(&self) -> RecurResult<Option<RecurrenceRule>> {
        let Some(frequency) = self.recurrence_kind.frequency() else {
            return Ok(None);
        };

        let text = self
            .recurrence_rule
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());
        let Some(text) = text else {
            tracing::debug!(
                kind = ?self.recurrence_kind,
                "Recurring event has no rule text, using the kind's default rule"
            );
            return Ok(Some(RecurrenceRule::from_frequency(frequency)));
        };

        let rule: RecurrenceRule = text.parse()?;
        if rule.frequency != frequency {
            tracing::trace!(
                kind = ?self.recurrence_kind,
                rule = %rule,
                "Recurrence kind disagrees with rule, rule wins"
            );
        }
        Ok(Some(rule))
    }
}

/// Expands event schedules into civil occurrence dates.
#[derive(Debug, Clone, Copy)]
pub struct Expander {
    offset: CommunityOffset,
    max_occurrences: u16,
}

impl Expander {
    #[must_use]
    pub const fn new(offset: CommunityOffset) -> Self {
        Self {
            offset,
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
        }
    }

    /// Caps the instants generated for one event and window.
    #[must_use]
    pub const fn with_max_occurrences(mut self, max_occurrences: u16) -> Self {
        self.max_occurrences = max_occurrences;
        self
    }

    #[must_use]
    pub const fn offset(&self) -> &CommunityOffset {
        &self.offset
    }

    /// ## Summary
    /// Civil dates on which the event occurs inside `window`, ascending and
    /// deduplicated.
    ///
    /// ## Errors
    /// Returns an error if the recurrence rule cannot be parsed or is
    /// rejected by the expansion engine.
    pub fn try_occurrence_dates(
        &self,
        schedule: &EventSchedule,
        window: &Window,
    ) -> RecurResult<Vec<NaiveDate>> {
        let Some(start_at) = schedule.start_at else {
            tracing::trace!("Event has no start, skipping");
            return Ok(Vec::new());
        };

        match schedule.rule()? {
            None => Ok(self.single_dates(schedule, start_at, window)),
            Some(rule) => self.series_dates(&rule, start_at, schedule.recurrence_until, window),
        }
    }

    /// ## Summary
    /// Like [`Expander::try_occurrence_dates`], but an unusable rule yields no
    /// occurrences so one bad event cannot break an aggregate view.
    #[must_use]
    pub fn occurrence_dates(&self, schedule: &EventSchedule, window: &Window) -> Vec<NaiveDate> {
        self.try_occurrence_dates(schedule, window)
            .unwrap_or_else(|err| {
                tracing::warn!(
                    error = %err,
                    rule = ?schedule.recurrence_rule,
                    "Skipping event with unusable recurrence rule"
                );
                Vec::new()
            })
    }

    /// ## Summary
    /// Earliest occurrence inside `window`.
    #[must_use]
    pub fn first_occurrence(&self, schedule: &EventSchedule, window: &Window) -> Option<NaiveDate> {
        self.occurrence_dates(schedule, window).into_iter().next()
    }

    fn single_dates(
        &self,
        schedule: &EventSchedule,
        start_at: DateTime<Utc>,
        window: &Window,
    ) -> Vec<NaiveDate> {
        let offset = &self.offset;

        if schedule.all_day
            && let Some(end_at) = schedule.end_at.filter(|end_at| *end_at >= start_at)
        {
            let first = offset.civil_date(start_at).max(window.first_date(offset));
            let last = offset.civil_date(end_at).min(window.last_date(offset));
            return first.iter_days().take_while(|day| *day <= last).collect();
        }

        if window.contains(start_at) {
            vec![offset.civil_date(start_at)]
        } else {
            Vec::new()
        }
    }

    fn series_dates(
        &self,
        rule: &RecurrenceRule,
        start_at: DateTime<Utc>,
        until: Option<DateTime<Utc>>,
        window: &Window,
    ) -> RecurResult<Vec<NaiveDate>> {
        let offset = &self.offset;

        let window = match until {
            Some(until) => {
                let bound = offset
                    .civil_date(until)
                    .succ_opt()
                    .and_then(|next| offset.day_start(next).ok())
                    .unwrap_or(window.end());
                let Some(clamped) = window.clamp_end(bound) else {
                    return Ok(Vec::new());
                };
                clamped
            }
            None => *window,
        };

        let anchor = offset.local_datetime(start_at);
        let from = offset.local_datetime(window.start());
        let to = offset.local_datetime(window.end());
        if to <= anchor {
            return Ok(Vec::new());
        }

        let mut rrule = to_rrule(rule);
        match rule.end {
            Some(SeriesEnd::Count(count)) => rrule = rrule.count(count),
            Some(SeriesEnd::Until(bound)) => {
                let limit = bound.local_limit(offset);
                if limit < anchor {
                    return Ok(Vec::new());
                }
                rrule = rrule.until(frame(limit));
            }
            None => {}
        }

        let set = rrule
            .build(frame(anchor))
            .map_err(|err| RecurError::RuleRejected(err.to_string()))?;
        let result = set
            .after(frame(from) - TimeDelta::seconds(1))
            .before(frame(to))
            .all(self.max_occurrences);

        if result.limited {
            tracing::warn!(
                rule = %rule,
                max_occurrences = self.max_occurrences,
                "Recurrence expansion hit the occurrence limit"
            );
        }

        let dates: BTreeSet<NaiveDate> = result
            .dates
            .iter()
            .map(DateTime::naive_utc)
            .filter(|local| from <= *local && *local < to)
            .map(|local| local.date())
            .collect();

        tracing::trace!(rule = %rule, count = dates.len(), "Expanded recurrence");
        Ok(dates.into_iter().collect())
    }
}

/// Community wall-clock time presented to `rrule` as UTC.
fn frame(local: NaiveDateTime) -> DateTime<Tz> {
    Tz::UTC.from_utc_datetime(&local)
}

fn to_rrule(rule: &RecurrenceRule) -> RRule<Unvalidated> {
    let frequency = match rule.frequency {
        Frequency::Daily => rrule::Frequency::Daily,
        Frequency::Weekly => rrule::Frequency::Weekly,
        Frequency::Monthly => rrule::Frequency::Monthly,
        Frequency::Yearly => rrule::Frequency::Yearly,
    };

    let mut rrule = RRule::new(frequency).interval(rule.interval);

    if !rule.by_weekday.is_empty() {
        rrule = rrule.by_weekday(
            rule.by_weekday
                .iter()
                .map(|day| match day.ordinal {
                    Some(nth) => NWeekday::Nth(nth, day.weekday),
                    None => NWeekday::Every(day.weekday),
                })
                .collect(),
        );
    }
    if !rule.by_month_day.is_empty() {
        rrule = rrule.by_month_day(rule.by_month_day.clone());
    }
    if !rule.by_month.is_empty() {
        let months: Vec<Month> = rule
            .by_month
            .iter()
            .filter_map(|month| Month::try_from(*month).ok())
            .collect();
        rrule = rrule.by_month(&months);
    }

    rrule
}
