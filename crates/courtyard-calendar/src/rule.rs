//! Typed recurrence rules (iCalendar RRULE subset).
//!
//! Supported parts: `FREQ`, `INTERVAL`, `BYDAY`, `BYMONTHDAY`, `BYMONTH`,
//! `COUNT` and `UNTIL`. `WKST` is accepted and ignored. Any other part is
//! rejected.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{RecurError, RecurResult};
use crate::offset::CommunityOffset;

/// Recurrence type stored alongside an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceKind {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceKind {
    /// ## Summary
    /// Frequency implied by the stored kind, `None` for one-off events.
    #[must_use]
    pub const fn frequency(self) -> Option<Frequency> {
        match self {
            Self::None => None,
            Self::Daily => Some(Frequency::Daily),
            Self::Weekly => Some(Frequency::Weekly),
            Self::Monthly => Some(Frequency::Monthly),
            Self::Yearly => Some(Frequency::Yearly),
        }
    }

    #[must_use]
    pub const fn is_recurring(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<Frequency> for RecurrenceKind {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Daily => Self::Daily,
            Frequency::Weekly => Self::Weekly,
            Frequency::Monthly => Self::Monthly,
            Frequency::Yearly => Self::Yearly,
        }
    }
}

/// Repeating frequency of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

impl FromStr for Frequency {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "YEARLY" => Ok(Self::Yearly),
            "HOURLY" | "MINUTELY" | "SECONDLY" => {
                Err(RecurError::UnsupportedPart(format!("FREQ={s}")))
            }
            _ => Err(RecurError::ParseError(format!("unknown frequency '{s}'"))),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `BYDAY` entry, e.g. `TU`, `2TU` or `-1FR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayRule {
    /// Nth occurrence within the month or year; negative counts from the end.
    pub ordinal: Option<i16>,
    pub weekday: Weekday,
}

impl WeekdayRule {
    #[must_use]
    pub const fn every(weekday: Weekday) -> Self {
        Self {
            ordinal: None,
            weekday,
        }
    }

    #[must_use]
    pub const fn nth(ordinal: i16, weekday: Weekday) -> Self {
        Self {
            ordinal: Some(ordinal),
            weekday,
        }
    }
}

impl FromStr for WeekdayRule {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || s.len() < 2 {
            return Err(RecurError::ParseError(format!("invalid BYDAY entry '{s}'")));
        }
        let (ordinal, code) = s.split_at(s.len() - 2);
        let weekday = parse_weekday(code)?;

        if ordinal.is_empty() {
            return Ok(Self::every(weekday));
        }

        let ordinal: i16 = ordinal
            .trim_start_matches('+')
            .parse()
            .map_err(|_err| RecurError::ParseError(format!("invalid BYDAY ordinal in '{s}'")))?;
        if ordinal == 0 || ordinal.abs() > 53 {
            return Err(RecurError::ValidationError(format!(
                "BYDAY ordinal out of range in '{s}'"
            )));
        }
        Ok(Self::nth(ordinal, weekday))
    }
}

impl std::fmt::Display for WeekdayRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ordinal) = self.ordinal {
            write!(f, "{ordinal}")?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

/// Bound given by `UNTIL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UntilBound {
    /// `YYYYMMDDTHHMMSSZ`
    Instant(DateTime<Utc>),
    /// `YYYYMMDDTHHMMSS`, community wall-clock time.
    Local(NaiveDateTime),
    /// `YYYYMMDD`, inclusive of the whole local day.
    Date(NaiveDate),
}

impl UntilBound {
    /// ## Summary
    /// Last community wall-clock moment still inside the series.
    #[must_use]
    pub fn local_limit(&self, offset: &CommunityOffset) -> NaiveDateTime {
        match self {
            Self::Instant(instant) => offset.local_datetime(*instant),
            Self::Local(local) => *local,
            Self::Date(date) => {
                date.succ_opt()
                    .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN))
                    - TimeDelta::seconds(1)
            }
        }
    }
}

impl std::fmt::Display for UntilBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instant(instant) => write!(f, "{}", instant.format("%Y%m%dT%H%M%SZ")),
            Self::Local(local) => write!(f, "{}", local.format("%Y%m%dT%H%M%S")),
            Self::Date(date) => write!(f, "{}", date.format("%Y%m%d")),
        }
    }
}

/// How a series ends, if it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesEnd {
    Count(u32),
    Until(UntilBound),
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub interval: u16,
    pub by_weekday: Vec<WeekdayRule>,
    pub by_month_day: Vec<i8>,
    pub by_month: Vec<u8>,
    pub end: Option<SeriesEnd>,
}

impl RecurrenceRule {
    /// ## Summary
    /// Rule implied by a bare frequency: every period, forever.
    #[must_use]
    pub const fn from_frequency(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            by_weekday: Vec::new(),
            by_month_day: Vec::new(),
            by_month: Vec::new(),
            end: None,
        }
    }

    fn validate(&self) -> RecurResult<()> {
        if self.interval == 0 {
            return Err(RecurError::ValidationError("INTERVAL must be positive".into()));
        }
        if matches!(self.end, Some(SeriesEnd::Count(0))) {
            return Err(RecurError::ValidationError("COUNT must be positive".into()));
        }
        if let Some(day) = self
            .by_month_day
            .iter()
            .find(|day| **day == 0 || !(-31..=31).contains(*day))
        {
            return Err(RecurError::ValidationError(format!(
                "BYMONTHDAY value {day} out of range"
            )));
        }
        if let Some(month) = self.by_month.iter().find(|m| !(1..=12).contains(*m)) {
            return Err(RecurError::ValidationError(format!(
                "BYMONTH value {month} out of range"
            )));
        }
        if self.frequency == Frequency::Weekly && !self.by_month_day.is_empty() {
            return Err(RecurError::ValidationError(
                "BYMONTHDAY is not allowed with FREQ=WEEKLY".into(),
            ));
        }
        if matches!(self.frequency, Frequency::Daily | Frequency::Weekly)
            && self.by_weekday.iter().any(|rule| rule.ordinal.is_some())
        {
            return Err(RecurError::ValidationError(format!(
                "ordinal BYDAY is not allowed with FREQ={}",
                self.frequency
            )));
        }
        Ok(())
    }
}

impl FromStr for RecurrenceRule {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = rule_body(s)?;

        let mut frequency = None;
        let mut interval = None;
        let mut count = None;
        let mut until = None;
        let mut by_weekday = None;
        let mut by_month_day = None;
        let mut by_month = None;
        let mut week_start = None;

        for part in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| RecurError::ParseError(format!("malformed rule part '{part}'")))?;
            let key = key.trim().to_ascii_uppercase();
            let value = value.trim();

            let duplicate = match key.as_str() {
                "FREQ" => frequency.replace(value.parse::<Frequency>()?).is_some(),
                "INTERVAL" => interval.replace(parse_number::<u16>(&key, value)?).is_some(),
                "COUNT" => count.replace(parse_number::<u32>(&key, value)?).is_some(),
                "UNTIL" => until.replace(parse_until(value)?).is_some(),
                "BYDAY" => by_weekday
                    .replace(parse_list(value, str::parse::<WeekdayRule>)?)
                    .is_some(),
                "BYMONTHDAY" => by_month_day
                    .replace(parse_list(value, |v| parse_number::<i8>(&key, v))?)
                    .is_some(),
                "BYMONTH" => by_month
                    .replace(parse_list(value, |v| parse_number::<u8>(&key, v))?)
                    .is_some(),
                "WKST" => week_start.replace(parse_weekday(value)?).is_some(),
                other => return Err(RecurError::UnsupportedPart(other.to_string())),
            };
            if duplicate {
                return Err(RecurError::ParseError(format!("duplicate rule part {key}")));
            }
        }

        let frequency =
            frequency.ok_or_else(|| RecurError::ParseError("rule has no FREQ".into()))?;
        let end = match (count, until) {
            (Some(_), Some(_)) => {
                return Err(RecurError::ValidationError(
                    "COUNT and UNTIL are mutually exclusive".into(),
                ));
            }
            (Some(count), None) => Some(SeriesEnd::Count(count)),
            (None, Some(until)) => Some(SeriesEnd::Until(until)),
            (None, None) => None,
        };

        let rule = Self {
            frequency,
            interval: interval.unwrap_or(1),
            by_weekday: by_weekday.unwrap_or_default(),
            by_month_day: by_month_day.unwrap_or_default(),
            by_month: by_month.unwrap_or_default(),
            end,
        };
        rule.validate()?;
        Ok(rule)
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FREQ={}", self.frequency)?;
        if self.interval != 1 {
            write!(f, ";INTERVAL={}", self.interval)?;
        }
        if !self.by_weekday.is_empty() {
            write!(f, ";BYDAY={}", join(&self.by_weekday))?;
        }
        if !self.by_month_day.is_empty() {
            write!(f, ";BYMONTHDAY={}", join(&self.by_month_day))?;
        }
        if !self.by_month.is_empty() {
            write!(f, ";BYMONTH={}", join(&self.by_month))?;
        }
        match &self.end {
            Some(SeriesEnd::Count(count)) => write!(f, ";COUNT={count}"),
            Some(SeriesEnd::Until(until)) => write!(f, ";UNTIL={until}"),
            None => Ok(()),
        }
    }
}

/// Picks the RRULE body out of a bare rule, an `RRULE:` line or a
/// multi-line block carrying `DTSTART`/`EXDATE`/`RDATE` lines.
fn rule_body(text: &str) -> RecurResult<&str> {
    let mut body = None;
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let candidate = if let Some(rest) = strip_prefix_ignore_case(line, "RRULE:") {
            rest
        } else if ["DTSTART", "EXDATE", "RDATE"]
            .iter()
            .any(|name| strip_prefix_ignore_case(line, name).is_some())
        {
            continue;
        } else {
            line
        };

        if body.replace(candidate).is_some() {
            return Err(RecurError::UnsupportedPart("multiple RRULE lines".into()));
        }
    }
    body.ok_or_else(|| RecurError::ParseError("empty recurrence rule".into()))
}

fn strip_prefix_ignore_case<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &line[prefix.len()..])
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> RecurResult<T> {
    value
        .trim()
        .trim_start_matches('+')
        .parse()
        .map_err(|_err| RecurError::ParseError(format!("invalid {key} value '{value}'")))
}

fn parse_list<T>(value: &str, parse: impl Fn(&str) -> RecurResult<T>) -> RecurResult<Vec<T>> {
    value.split(',').map(str::trim).map(parse).collect()
}

fn parse_until(value: &str) -> RecurResult<UntilBound> {
    let invalid = || RecurError::ParseError(format!("invalid UNTIL value '{value}'"));
    if !value.is_ascii() {
        return Err(invalid());
    }
    match value.len() {
        8 => NaiveDate::parse_from_str(value, "%Y%m%d")
            .map(UntilBound::Date)
            .map_err(|_err| invalid()),
        15 => NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
            .map(UntilBound::Local)
            .map_err(|_err| invalid()),
        16 if value.ends_with(['Z', 'z']) => {
            NaiveDateTime::parse_from_str(&value[..15], "%Y%m%dT%H%M%S")
                .map(|naive| UntilBound::Instant(Utc.from_utc_datetime(&naive)))
                .map_err(|_err| invalid())
        }
        _ => Err(invalid()),
    }
}

fn parse_weekday(code: &str) -> RecurResult<Weekday> {
    match code.trim().to_ascii_uppercase().as_str() {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        _ => Err(RecurError::ParseError(format!("invalid weekday '{code}'"))),
    }
}

const fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
