use chrono::{DateTime, NaiveDate, Utc};

use crate::expand::{EventSchedule, Expander};
use crate::rule::RecurrenceKind;
use crate::window::Window;

pub enum CaseWindow {
    Month(i32, u32),
    Days(&'static str, u32),
}

pub struct OccurrenceCase {
    pub name: &'static str,
    pub start_at: Option<&'static str>,
    pub end_at: Option<&'static str>,
    pub all_day: bool,
    pub kind: RecurrenceKind,
    pub rule: Option<&'static str>,
    pub until: Option<&'static str>,
    pub window: CaseWindow,
    pub expected: &'static [&'static str],
}

impl Default for OccurrenceCase {
    fn default() -> Self {
        Self {
            name: "",
            start_at: None,
            end_at: None,
            all_day: false,
            kind: RecurrenceKind::None,
            rule: None,
            until: None,
            window: CaseWindow::Month(2024, 6),
            expected: &[],
        }
    }
}

fn instant(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text).unwrap().with_timezone(&Utc)
}

pub fn assert_case(case: &OccurrenceCase) {
    let expander = Expander::new("+03:00".parse().unwrap());
    let window = match case.window {
        CaseWindow::Month(year, month) => Window::month(expander.offset(), year, month),
        CaseWindow::Days(first, days) => Window::days(
            expander.offset(),
            NaiveDate::parse_from_str(first, "%Y-%m-%d").unwrap(),
            days,
        ),
    }
    .unwrap();

    let schedule = EventSchedule {
        start_at: case.start_at.map(instant),
        end_at: case.end_at.map(instant),
        all_day: case.all_day,
        recurrence_kind: case.kind,
        recurrence_rule: case.rule.map(str::to_string),
        recurrence_until: case.until.map(instant),
    };

    let actual: Vec<String> = expander
        .occurrence_dates(&schedule, &window)
        .iter()
        .map(|day| day.format("%Y-%m-%d").to_string())
        .collect();

    assert_eq!(actual, case.expected, "case {}", case.name);
}

#[expect(clippy::too_many_lines)]
pub fn occurrence_cases() -> Vec<OccurrenceCase> {
    vec![
        OccurrenceCase {
            name: "one_off_timed_in_window",
            start_at: Some("2024-06-15T07:00:00Z"),
            expected: &["2024-06-15"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "one_off_outside_window",
            start_at: Some("2024-07-01T10:00:00Z"),
            expected: &[],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "one_off_just_after_local_midnight",
            start_at: Some("2024-05-31T21:30:00Z"),
            expected: &["2024-06-01"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "one_off_just_after_local_midnight_not_in_may",
            start_at: Some("2024-05-31T21:30:00Z"),
            window: CaseWindow::Month(2024, 5),
            expected: &[],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "all_day_clipped_to_march",
            start_at: Some("2024-03-29T21:00:00Z"),
            end_at: Some("2024-04-01T21:00:00Z"),
            all_day: true,
            window: CaseWindow::Month(2024, 3),
            expected: &["2024-03-30", "2024-03-31"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "all_day_clipped_to_april",
            start_at: Some("2024-03-29T21:00:00Z"),
            end_at: Some("2024-04-01T21:00:00Z"),
            all_day: true,
            window: CaseWindow::Month(2024, 4),
            expected: &["2024-04-01", "2024-04-02"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "all_day_end_before_start_is_single_day",
            start_at: Some("2024-03-29T21:00:00Z"),
            end_at: Some("2024-03-20T21:00:00Z"),
            all_day: true,
            window: CaseWindow::Month(2024, 3),
            expected: &["2024-03-30"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "monthly_anchor_fifteenth",
            start_at: Some("2024-01-15T09:00:00Z"),
            kind: RecurrenceKind::Monthly,
            rule: Some("FREQ=MONTHLY"),
            expected: &["2024-06-15"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "weekly_with_series_until",
            start_at: Some("2024-06-04T16:00:00Z"),
            kind: RecurrenceKind::Weekly,
            rule: Some("FREQ=WEEKLY;BYDAY=TU,TH"),
            until: Some("2024-06-14T00:00:00Z"),
            expected: &["2024-06-04", "2024-06-06", "2024-06-11", "2024-06-13"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "byday_uses_local_weekday",
            start_at: Some("2024-06-02T22:30:00Z"),
            kind: RecurrenceKind::Weekly,
            rule: Some("FREQ=WEEKLY;BYDAY=MO"),
            expected: &["2024-06-03", "2024-06-10", "2024-06-17", "2024-06-24"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "count_spills_into_next_month",
            start_at: Some("2024-06-30T10:00:00Z"),
            kind: RecurrenceKind::Daily,
            rule: Some("FREQ=DAILY;COUNT=3"),
            window: CaseWindow::Month(2024, 7),
            expected: &["2024-07-01", "2024-07-02"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "malformed_rule_yields_nothing",
            start_at: Some("2024-06-15T07:00:00Z"),
            kind: RecurrenceKind::Weekly,
            rule: Some("FREQ=WEEKLY;BYSETPOS=2"),
            expected: &[],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "kind_none_ignores_rule",
            start_at: Some("2024-06-15T07:00:00Z"),
            kind: RecurrenceKind::None,
            rule: Some("FREQ=DAILY"),
            expected: &["2024-06-15"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "kind_without_rule_uses_kind",
            start_at: Some("2024-06-06T16:00:00Z"),
            kind: RecurrenceKind::Weekly,
            expected: &["2024-06-06", "2024-06-13", "2024-06-20", "2024-06-27"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "missing_start_is_skipped",
            kind: RecurrenceKind::Daily,
            rule: Some("FREQ=DAILY"),
            expected: &[],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "yearly_leap_day",
            start_at: Some("2024-02-29T09:00:00Z"),
            kind: RecurrenceKind::Yearly,
            rule: Some("FREQ=YEARLY"),
            window: CaseWindow::Month(2028, 2),
            expected: &["2028-02-29"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "yearly_leap_day_skips_common_year",
            start_at: Some("2024-02-29T09:00:00Z"),
            kind: RecurrenceKind::Yearly,
            rule: Some("FREQ=YEARLY"),
            window: CaseWindow::Month(2025, 2),
            expected: &[],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "monthly_last_friday",
            start_at: Some("2024-01-26T15:00:00Z"),
            kind: RecurrenceKind::Monthly,
            rule: Some("FREQ=MONTHLY;BYDAY=-1FR"),
            window: CaseWindow::Month(2024, 11),
            expected: &["2024-11-29"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "rule_until_date_form",
            start_at: Some("2024-06-01T06:00:00Z"),
            kind: RecurrenceKind::Daily,
            rule: Some("FREQ=DAILY;UNTIL=20240603"),
            expected: &["2024-06-01", "2024-06-02", "2024-06-03"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "rule_until_utc_instant",
            start_at: Some("2024-06-01T20:00:00Z"),
            kind: RecurrenceKind::Daily,
            rule: Some("RRULE:FREQ=DAILY;UNTIL=20240603T200000Z"),
            expected: &["2024-06-01", "2024-06-02", "2024-06-03"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "biweekly",
            start_at: Some("2024-06-03T09:00:00Z"),
            kind: RecurrenceKind::Weekly,
            rule: Some("FREQ=WEEKLY;INTERVAL=2"),
            expected: &["2024-06-03", "2024-06-17"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "series_starts_after_window",
            start_at: Some("2024-08-01T09:00:00Z"),
            kind: RecurrenceKind::Daily,
            rule: Some("FREQ=DAILY"),
            expected: &[],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "series_until_before_window",
            start_at: Some("2024-01-01T09:00:00Z"),
            kind: RecurrenceKind::Daily,
            rule: Some("FREQ=DAILY"),
            until: Some("2024-05-10T09:00:00Z"),
            expected: &[],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "agenda_week_window",
            start_at: Some("2024-06-06T16:00:00Z"),
            kind: RecurrenceKind::Weekly,
            rule: Some("FREQ=WEEKLY;BYDAY=MO,TH"),
            window: CaseWindow::Days("2024-06-10", 7),
            expected: &["2024-06-10", "2024-06-13"],
            ..OccurrenceCase::default()
        },
        OccurrenceCase {
            name: "monthly_several_month_days",
            start_at: Some("2024-01-01T09:00:00Z"),
            kind: RecurrenceKind::Monthly,
            rule: Some("FREQ=MONTHLY;BYMONTHDAY=1,15,-1"),
            window: CaseWindow::Month(2024, 2),
            expected: &["2024-02-01", "2024-02-15", "2024-02-29"],
            ..OccurrenceCase::default()
        },
    ]
}
