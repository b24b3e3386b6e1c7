//! Calendar primitives: day classification, weekday indexing, date parsing.
//!
//! The calendar itself is produced elsewhere (holiday generation is not our job);
//! we only read the `DayInfo` rows we are handed.

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Calendar classification of a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayKind {
    Working,
    Holiday,
}

/// One row of the externally supplied calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayInfo {
    pub date: NaiveDate,
    /// Sunday = 0 .. Saturday = 6.
    pub day_of_week: u8,
    pub kind: DayKind,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl DayInfo {
    /// Plain working day; weekday derived from the date.
    pub fn working(date: NaiveDate) -> Self {
        Self {
            date,
            day_of_week: weekday_index(date),
            kind: DayKind::Working,
            is_special: false,
            label: None,
        }
    }

    pub fn holiday(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            date,
            day_of_week: weekday_index(date),
            kind: DayKind::Holiday,
            is_special: true,
            label: Some(label.into()),
        }
    }

    pub fn is_working(&self) -> bool {
        self.kind == DayKind::Working
    }
}

/// Sunday-based weekday index (0..=6), the indexing used by weekly patterns.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Mon–Thu.
pub fn is_mix_weekday(weekday: Weekday) -> bool {
    matches!(
        weekday,
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu
    )
}

/// Fri–Sun.
pub fn is_mix_weekend(weekday: Weekday) -> bool {
    !is_mix_weekday(weekday)
}

/// Calendar-day lookup by date.
///
/// Kept as a thin wrapper so resolvers don't each re-scan the slice.
#[derive(Debug, Clone, Copy)]
pub struct CalendarView<'a> {
    days: &'a [DayInfo],
}

impl<'a> CalendarView<'a> {
    pub fn new(days: &'a [DayInfo]) -> Self {
        Self { days }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&'a DayInfo> {
        // Calendars are normally sorted; fall back to a scan when they aren't.
        match self.days.binary_search_by_key(&date, |d| d.date) {
            Ok(i) => Some(&self.days[i]),
            Err(_) => self.days.iter().find(|d| d.date == date),
        }
    }

    /// Last date the calendar knows about.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.days.iter().map(|d| d.date).max()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}': {e}"))
}

/// Monday of the week containing `date`.
pub fn week_start_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The seven consecutive dates starting at `start`.
pub fn week_dates(start: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|i| start + Duration::days(i)).collect()
}

/// Build a calendar covering `[from, to]` where weekends are working days as
/// far as the calendar is concerned (base schedules decide rest days) and the
/// given dates are holidays.
pub fn calendar_range(from: NaiveDate, to: NaiveDate, holidays: &[NaiveDate]) -> Vec<DayInfo> {
    let mut out = Vec::new();
    let mut d = from;
    while d <= to {
        if holidays.contains(&d) {
            out.push(DayInfo::holiday(d, "Feriado"));
        } else {
            out.push(DayInfo::working(d));
        }
        d += Duration::days(1);
    }
    out
}
