//! Write-time conflict detection against existing vacation / license spans.
//!
//! Two kinds:
//! - ACTIVE: the candidate starts inside an existing VACACIONES / LICENCIA span,
//!   whatever the candidate's type
//! - OVERLAP: the candidate is itself VACACIONES / LICENCIA and its span
//!   intersects an existing span of the same type
//!
//! Existing incidents are scanned in (start date, id) order so the reported
//! conflict never depends on storage order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::DayInfo;
use crate::incident::{Incident, IncidentType};
use crate::incident_dates::{ResolvedIncidentDates, resolve_incident_dates, resolve_span};
use crate::representative::Representative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictType {
    Vacation,
    License,
    Overlap,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictCheckResult {
    pub has_conflict: bool,
    pub conflict_type: Option<ConflictType>,
    pub message: Option<String>,
}

impl ConflictCheckResult {
    fn clear() -> Self {
        Self::default()
    }

    fn conflict(kind: ConflictType, message: String) -> Self {
        Self {
            has_conflict: true,
            conflict_type: Some(kind),
            message: Some(message),
        }
    }
}

/// The incident being proposed; not stored anywhere yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateIncident {
    pub incident_type: IncidentType,
    pub start_date: NaiveDate,
    pub duration: u32,
}

impl From<&Incident> for CandidateIncident {
    fn from(i: &Incident) -> Self {
        Self {
            incident_type: i.incident_type,
            start_date: i.start_date,
            duration: i.duration,
        }
    }
}

fn fmt_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

fn active_message(kind: IncidentType, span: &ResolvedIncidentDates) -> String {
    match kind {
        IncidentType::Licencia => format!(
            "Ya tiene una licencia activa del {} al {}",
            fmt_date(span.start),
            fmt_date(span.end)
        ),
        _ => format!(
            "Ya tiene vacaciones activas del {} al {}",
            fmt_date(span.start),
            fmt_date(span.end)
        ),
    }
}

fn overlap_message(kind: IncidentType, span: &ResolvedIncidentDates) -> String {
    let what = match kind {
        IncidentType::Licencia => "una licencia",
        _ => "vacaciones",
    };
    format!(
        "Las fechas se superponen con {} existentes ({} al {})",
        what,
        fmt_date(span.start),
        fmt_date(span.end)
    )
}

/// Check a candidate incident for `rep` against the existing incidents.
pub fn check_incident_conflicts(
    rep: &Representative,
    candidate: CandidateIncident,
    existing: &[Incident],
    calendar: &[DayInfo],
) -> ConflictCheckResult {
    let mut leaves: Vec<&Incident> = existing
        .iter()
        .filter(|i| i.representative_id == rep.id && i.incident_type.is_leave())
        .collect();
    leaves.sort_by(|a, b| a.start_date.cmp(&b.start_date).then_with(|| a.id.cmp(&b.id)));

    let spans: Vec<(&Incident, ResolvedIncidentDates)> = leaves
        .into_iter()
        .map(|i| (i, resolve_incident_dates(i, calendar, rep)))
        .filter(|(_, span)| !span.dates.is_empty())
        .collect();

    for (inc, span) in &spans {
        if span.spans(candidate.start_date) {
            let kind = match inc.incident_type {
                IncidentType::Licencia => ConflictType::License,
                _ => ConflictType::Vacation,
            };
            return ConflictCheckResult::conflict(kind, active_message(inc.incident_type, span));
        }
    }

    if candidate.incident_type.is_leave() {
        let own = resolve_span(
            candidate.incident_type,
            candidate.start_date,
            candidate.duration,
            calendar,
            rep,
        );
        if !own.dates.is_empty() {
            for (inc, span) in &spans {
                if inc.incident_type == candidate.incident_type && own.intersects(span) {
                    return ConflictCheckResult::conflict(
                        ConflictType::Overlap,
                        overlap_message(inc.incident_type, span),
                    );
                }
            }
        }
    }

    ConflictCheckResult::clear()
}
