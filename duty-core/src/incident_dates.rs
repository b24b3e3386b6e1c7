//! Expands an incident into the concrete dates it affects.
//!
//! - LICENCIA: `duration` consecutive calendar days, holidays and rest days included
//! - VACACIONES: `duration` *working* days, where a working day is WORKING in the
//!   calendar and WORKING in the representative's base schedule
//! - everything else: the start date only
//!
//! The return date is the first qualifying working day after the last affected
//! date. Running out of calendar just yields fewer dates and no return date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarView, DayInfo};
use crate::incident::{Incident, IncidentType};
use crate::representative::Representative;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedIncidentDates {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub dates: Vec<NaiveDate>,
    pub return_date: Option<NaiveDate>,
}

impl ResolvedIncidentDates {
    /// Inclusive `[start, end]` check (rest days inside a vacation count).
    pub fn spans(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn affects(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    pub fn intersects(&self, other: &ResolvedIncidentDates) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A day both the calendar and the representative treat as a working day.
/// Dates missing from the calendar never qualify.
fn is_qualifying(cal: &CalendarView<'_>, rep: &Representative, date: NaiveDate) -> bool {
    cal.get(date)
        .map(|d| d.is_working() && rep.works_on(date))
        .unwrap_or(false)
}

fn next_qualifying_after(
    cal: &CalendarView<'_>,
    rep: &Representative,
    after: NaiveDate,
) -> Option<NaiveDate> {
    let last = cal.last_date()?;
    after
        .succ_opt()?
        .iter_days()
        .take_while(|d| *d <= last)
        .find(|d| is_qualifying(cal, rep, *d))
}

/// Resolve the span of an incident of `incident_type` starting at `start`.
///
/// Split out from [`resolve_incident_dates`] so the conflict checker can
/// resolve candidates that aren't incidents yet.
pub fn resolve_span(
    incident_type: IncidentType,
    start: NaiveDate,
    duration: u32,
    calendar: &[DayInfo],
    rep: &Representative,
) -> ResolvedIncidentDates {
    let cal = CalendarView::new(calendar);

    let dates: Vec<NaiveDate> = match incident_type {
        // Both walks stop at the calendar's last date, whatever the duration.
        IncidentType::Licencia => match cal.last_date() {
            Some(last) => start
                .iter_days()
                .take_while(|d| *d <= last)
                .take(duration.max(1) as usize)
                .collect(),
            None => Vec::new(),
        },
        IncidentType::Vacaciones => match cal.last_date() {
            Some(last) => start
                .iter_days()
                .take_while(|d| *d <= last)
                .filter(|d| is_qualifying(&cal, rep, *d))
                .take(duration as usize)
                .collect(),
            None => Vec::new(),
        },
        _ => vec![start],
    };

    let end = dates.last().copied().unwrap_or(start);
    let return_date = if dates.is_empty() {
        None
    } else {
        next_qualifying_after(&cal, rep, end)
    };

    ResolvedIncidentDates {
        start: dates.first().copied().unwrap_or(start),
        end,
        dates,
        return_date,
    }
}

pub fn resolve_incident_dates(
    incident: &Incident,
    calendar: &[DayInfo],
    rep: &Representative,
) -> ResolvedIncidentDates {
    resolve_span(
        incident.incident_type,
        incident.start_date,
        incident.duration,
        calendar,
        rep,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{calendar_range, parse_date};
    use crate::representative::ShiftType;
    use chrono::{TimeZone, Utc};

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn january_with_holiday(holiday: &str) -> Vec<DayInfo> {
        calendar_range(d("2025-01-01"), d("2025-01-31"), &[d(holiday)])
    }

    fn incident(kind: IncidentType, start: &str, duration: u32) -> Incident {
        Incident::new(
            "i1",
            "r1",
            kind,
            d(start),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .with_duration(duration)
    }

    #[test]
    fn test_license_counts_calendar_days() {
        let rep = Representative::new("r1", "Ana", ShiftType::Day);
        let res = resolve_incident_dates(
            &incident(IncidentType::Licencia, "2025-01-03", 5),
            &january_with_holiday("2025-01-06"),
            &rep,
        );
        assert_eq!(
            res.dates,
            vec![
                d("2025-01-03"),
                d("2025-01-04"),
                d("2025-01-05"),
                d("2025-01-06"),
                d("2025-01-07")
            ]
        );
        assert_eq!(res.return_date, Some(d("2025-01-08")));
    }

    #[test]
    fn test_vacation_counts_working_days_only() {
        let rep = Representative::new("r1", "Ana", ShiftType::Day);
        let res = resolve_incident_dates(
            &incident(IncidentType::Vacaciones, "2025-01-03", 5),
            &january_with_holiday("2025-01-06"),
            &rep,
        );
        assert_eq!(
            res.dates,
            vec![
                d("2025-01-03"),
                d("2025-01-07"),
                d("2025-01-08"),
                d("2025-01-09"),
                d("2025-01-10")
            ]
        );
        assert_eq!(res.end, d("2025-01-10"));
        assert_eq!(res.return_date, Some(d("2025-01-13")));
        assert!(res.spans(d("2025-01-05")));
        assert!(!res.affects(d("2025-01-05")));
    }

    #[test]
    fn test_single_day_types_ignore_duration() {
        let rep = Representative::new("r1", "Ana", ShiftType::Day);
        let res = resolve_incident_dates(
            &incident(IncidentType::Ausencia, "2025-01-08", 9),
            &january_with_holiday("2025-01-06"),
            &rep,
        );
        assert_eq!(res.dates, vec![d("2025-01-08")]);
        assert_eq!(res.return_date, Some(d("2025-01-09")));
    }

    #[test]
    fn test_short_calendar_degrades_to_fewer_dates() {
        let rep = Representative::new("r1", "Ana", ShiftType::Day);
        let cal = calendar_range(d("2025-01-27"), d("2025-01-31"), &[]);
        let res = resolve_incident_dates(&incident(IncidentType::Vacaciones, "2025-01-29", 10), &cal, &rep);
        assert_eq!(res.dates.len(), 3);
        assert_eq!(res.return_date, None);

        let empty = resolve_incident_dates(&incident(IncidentType::Licencia, "2025-01-29", 3), &[], &rep);
        assert!(empty.dates.is_empty());
        assert_eq!(empty.start, d("2025-01-29"));
    }

    #[test]
    fn test_huge_duration_stops_at_calendar_end() {
        let rep = Representative::new("r1", "Ana", ShiftType::Day);
        let cal = january_with_holiday("2025-01-06");

        let lic = resolve_incident_dates(&incident(IncidentType::Licencia, "2025-01-03", u32::MAX), &cal, &rep);
        assert_eq!(lic.dates.len(), 29);
        assert_eq!(lic.end, d("2025-01-31"));
        assert_eq!(lic.return_date, None);

        let vac = resolve_incident_dates(&incident(IncidentType::Vacaciones, "2025-01-03", u32::MAX), &cal, &rep);
        assert_eq!(vac.end, d("2025-01-31"));
        assert_eq!(vac.return_date, None);
    }
}
