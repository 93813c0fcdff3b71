use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use courtyard_calendar::{CommunityOffset, EventSchedule, Expander, Window};
use courtyard_core::config::CalendarConfig;
use uuid::Uuid;

use super::view::{AgendaSpan, CalendarEntry, EventOccurrences, MonthCell, MonthGrid};
use crate::catalog::{CatalogStore, Publication};
use crate::error::{ServiceError, ServiceResult};

/// Builds the calendar views from published events.
#[derive(Debug, Clone, Copy)]
pub struct CalendarService {
    expander: Expander,
    upcoming_horizon_days: u32,
    upcoming_limit: usize,
}

impl CalendarService {
    #[must_use]
    pub const fn new(expander: Expander) -> Self {
        Self {
            expander,
            upcoming_horizon_days: 90,
            upcoming_limit: 10,
        }
    }

    /// ## Summary
    /// Builds the service from the `[calendar]` settings.
    ///
    /// ## Errors
    /// Returns an error if the configured offset is malformed.
    pub fn from_settings(config: &CalendarConfig) -> ServiceResult<Self> {
        let offset = CommunityOffset::new(config.offset()?);
        Ok(Self {
            expander: Expander::new(offset).with_max_occurrences(config.max_occurrences),
            upcoming_horizon_days: u32::from(config.upcoming_horizon_days),
            upcoming_limit: usize::from(config.upcoming_limit),
        })
    }

    #[must_use]
    pub const fn offset(&self) -> &CommunityOffset {
        self.expander.offset()
    }

    #[must_use]
    pub const fn upcoming_limit(&self) -> usize {
        self.upcoming_limit
    }

    /// ## Summary
    /// One entry per event at its first occurrence in
    /// `[today, today + span)`.
    ///
    /// A weekly event shows up once even on a fortnight agenda.
    ///
    /// ## Errors
    /// Returns an error if the window cannot be built around `today`.
    pub fn agenda(
        &self,
        events: &[Publication],
        today: NaiveDate,
        span: AgendaSpan,
    ) -> ServiceResult<Vec<CalendarEntry>> {
        let window = Window::days(self.offset(), today, span.days())?;
        let mut entries: Vec<CalendarEntry> = events
            .iter()
            .filter_map(|event| self.first_entry(event, &window))
            .collect();
        entries.sort_by(CalendarEntry::display_order);
        Ok(entries)
    }

    /// ## Summary
    /// Every occurrence of every event in a local calendar month, grouped by
    /// day. Days without events get an empty cell.
    ///
    /// ## Errors
    /// Returns `ServiceError::ValidationError` for an invalid month.
    pub fn month_grid(
        &self,
        events: &[Publication],
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthGrid> {
        let offset = self.offset();
        let window = Window::month(offset, year, month)
            .map_err(|err| ServiceError::ValidationError(err.to_string()))?;

        let mut by_day: BTreeMap<NaiveDate, Vec<CalendarEntry>> = window
            .first_date(offset)
            .iter_days()
            .take_while(|day| *day <= window.last_date(offset))
            .map(|day| (day, Vec::new()))
            .collect();

        for event in events {
            let Some(schedule) = event.event_schedule() else {
                continue;
            };
            for date in self.expander.occurrence_dates(schedule, &window) {
                if let Some(entry) = self.entry(event, schedule, date)
                    && let Some(cell) = by_day.get_mut(&date)
                {
                    cell.push(entry);
                }
            }
        }

        let cells = by_day
            .into_iter()
            .map(|(date, mut entries)| {
                entries.sort_by(CalendarEntry::display_order);
                MonthCell {
                    date,
                    date_key: date.format("%Y-%m-%d").to_string(),
                    entries,
                }
            })
            .collect();

        Ok(MonthGrid { year, month, cells })
    }

    /// ## Summary
    /// First occurrence per event in `[now, now + horizon_days)`, soonest
    /// first, at most `limit` entries.
    ///
    /// ## Errors
    /// Returns an error if `horizon_days` is zero.
    pub fn upcoming(
        &self,
        events: &[Publication],
        now: DateTime<Utc>,
        horizon_days: u32,
        limit: usize,
    ) -> ServiceResult<Vec<CalendarEntry>> {
        let window = Window::starting_at(now, horizon_days)?;
        let mut entries: Vec<CalendarEntry> = events
            .iter()
            .filter_map(|event| self.first_entry(event, &window))
            .collect();
        entries.sort_by(CalendarEntry::display_order);
        entries.truncate(limit);
        Ok(entries)
    }

    /// ## Summary
    /// Every occurrence date of one event inside `window`.
    ///
    /// ## Errors
    /// - `NotFound` if the publication is not an event with a schedule.
    /// - The recurrence error if its rule cannot be expanded.
    pub fn event_occurrences(
        &self,
        event: &Publication,
        window: &Window,
    ) -> ServiceResult<EventOccurrences> {
        let schedule = event
            .event_schedule()
            .ok_or_else(|| ServiceError::NotFound(format!("event {}", event.id)))?;

        let rule = schedule.rule()?.map(|rule| rule.to_string());
        let dates = self.expander.try_occurrence_dates(schedule, window)?;

        Ok(EventOccurrences {
            event_id: event.id,
            rule,
            dates,
        })
    }

    /// ## Summary
    /// Agenda starting on the community's current day.
    ///
    /// ## Errors
    /// Propagates store errors.
    pub async fn fetch_agenda(
        &self,
        store: &dyn CatalogStore,
        now: DateTime<Utc>,
        span: AgendaSpan,
    ) -> ServiceResult<Vec<CalendarEntry>> {
        let events = store.published_events().await?;
        self.agenda(&events, self.offset().civil_date(now), span)
    }

    /// ## Summary
    /// Month grid; without `year`/`month` the community's current month.
    ///
    /// ## Errors
    /// Propagates store errors and invalid months.
    pub async fn fetch_month_grid(
        &self,
        store: &dyn CatalogStore,
        now: DateTime<Utc>,
        year: Option<i32>,
        month: Option<u32>,
    ) -> ServiceResult<MonthGrid> {
        let today = self.offset().civil_date(now);
        let events = store.published_events().await?;
        self.month_grid(
            &events,
            year.unwrap_or_else(|| today.year()),
            month.unwrap_or_else(|| today.month()),
        )
    }

    /// ## Summary
    /// Upcoming list over the configured horizon.
    ///
    /// ## Errors
    /// Propagates store errors.
    pub async fn fetch_upcoming(
        &self,
        store: &dyn CatalogStore,
        now: DateTime<Utc>,
        limit: Option<usize>,
    ) -> ServiceResult<Vec<CalendarEntry>> {
        let events = store.published_events().await?;
        self.upcoming(
            &events,
            now,
            self.upcoming_horizon_days,
            limit.unwrap_or(self.upcoming_limit),
        )
    }

    /// ## Summary
    /// Occurrences of a published event between two local dates, both
    /// inclusive.
    ///
    /// ## Errors
    /// - `ValidationError` if `to` is before `from`.
    /// - `NotFound` if no published event has this id.
    pub async fn fetch_event_occurrences(
        &self,
        store: &dyn CatalogStore,
        event_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ServiceResult<EventOccurrences> {
        let days = u32::try_from((to - from).num_days() + 1)
            .ok()
            .filter(|days| *days > 0)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!("range end {to} is before start {from}"))
            })?;
        let window = Window::days(self.offset(), from, days)
            .map_err(|err| ServiceError::ValidationError(err.to_string()))?;

        let event = store
            .publication(event_id)
            .await?
            .filter(Publication::is_listed_event)
            .ok_or_else(|| ServiceError::NotFound(format!("event {event_id}")))?;

        self.event_occurrences(&event, &window)
    }

    fn first_entry(&self, event: &Publication, window: &Window) -> Option<CalendarEntry> {
        let schedule = event.event_schedule()?;
        let date = self.expander.first_occurrence(schedule, window)?;
        self.entry(event, schedule, date)
    }

    fn entry(
        &self,
        event: &Publication,
        schedule: &EventSchedule,
        date: NaiveDate,
    ) -> Option<CalendarEntry> {
        let offset = self.offset();
        let start_at = schedule.start_at?;
        let duration = schedule
            .end_at
            .filter(|end_at| *end_at >= start_at)
            .map(|end_at| end_at - start_at);

        let (starts_at, ends_at, local_time) = if schedule.all_day {
            let starts_at = offset.day_start(date).ok()?;
            let ends_at = if schedule.is_recurring() {
                let first_day = offset.day_start(offset.civil_date(start_at)).ok()?;
                schedule
                    .end_at
                    .filter(|end_at| *end_at >= first_day)
                    .and_then(|end_at| starts_at.checked_add_signed(end_at - first_day))
            } else {
                schedule.end_at
            };
            (starts_at, ends_at, None)
        } else {
            let local_time = offset.local_datetime(start_at).time();
            let starts_at = if schedule.is_recurring() {
                offset.to_utc(date.and_time(local_time)).ok()?
            } else {
                start_at
            };
            let ends_at = duration.and_then(|d| starts_at.checked_add_signed(d));
            (starts_at, ends_at, Some(local_time))
        };

        Some(CalendarEntry {
            event_id: event.id,
            title: event.title.clone(),
            date,
            date_key: date.format("%Y-%m-%d").to_string(),
            starts_at,
            ends_at,
            all_day: schedule.all_day,
            recurring: schedule.is_recurring(),
            local_time,
        })
    }
}
