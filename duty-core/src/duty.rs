//! Duty resolution engine: one authoritative answer per (representative, date, shift).
//!
//! Plan layers, highest first:
//! 1. OVERRIDE incidents (latest `created_at`, then id)
//! 2. SWAP incidents and swap events touching the slot (same ordering)
//! 3. special schedules
//! 4. the base schedule
//!
//! Reality (AUSENCIA, VACACIONES, LICENCIA) is an overlay: it sets `reason`
//! and never changes `role` or `should_work`. Double-booking is a write-time
//! concern (see `guard`), so nothing here rejects anything.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::day::AssignmentSource;
use crate::incident::{Incident, IncidentType};
use crate::incident_dates::resolve_incident_dates;
use crate::representative::{Representative, ShiftType};
use crate::snapshot::DutySnapshot;
use crate::special_schedule::{EffectiveSchedule, resolve_effective_schedule};
use crate::swap::{SlotEffect, SwapEvent, find_slot_coverage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DutyRole {
    Base,
    Covering,
    Double,
    SwappedIn,
    Covered,
    SwappedOut,
    None,
}

impl DutyRole {
    pub fn works(&self) -> bool {
        matches!(
            self,
            DutyRole::Base | DutyRole::Covering | DutyRole::Double | DutyRole::SwappedIn
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveDutyResult {
    pub role: DutyRole,
    pub should_work: bool,
    pub reason: Option<IncidentType>,
    pub source: Option<AssignmentSource>,
    pub details: Option<String>,
    pub note: Option<String>,
}

impl EffectiveDutyResult {
    fn new(role: DutyRole, source: AssignmentSource) -> Self {
        Self {
            role,
            should_work: role.works(),
            reason: None,
            source: Some(source),
            details: None,
            note: None,
        }
    }

    fn unknown() -> Self {
        Self {
            role: DutyRole::None,
            should_work: false,
            reason: None,
            source: None,
            details: None,
            note: None,
        }
    }
}

/// Does `incident` land on `date` for this representative?
pub(crate) fn incident_hits(
    snap: &DutySnapshot<'_>,
    rep: &Representative,
    incident: &Incident,
    date: NaiveDate,
) -> bool {
    if incident.representative_id != rep.id {
        return false;
    }
    match incident.incident_type {
        IncidentType::Vacaciones | IncidentType::Licencia => {
            incident.start_date <= date && resolve_incident_dates(incident, snap.calendar, rep).affects(date)
        }
        _ => incident.start_date == date,
    }
}

fn latest_incident<'a>(
    snap: &DutySnapshot<'a>,
    rep: &Representative,
    date: NaiveDate,
    pred: impl Fn(IncidentType) -> bool,
) -> Option<&'a Incident> {
    snap.incidents
        .iter()
        .filter(|i| pred(i.incident_type) && incident_hits(snap, rep, i, date))
        .max_by(|a, b| a.recency_key().cmp(&b.recency_key()))
}

/// The winning reality incident (AUSENCIA / VACACIONES / LICENCIA) for a day.
pub fn reality_incident<'a>(
    snap: &DutySnapshot<'a>,
    rep: &Representative,
    date: NaiveDate,
) -> Option<&'a Incident> {
    latest_incident(snap, rep, date, |t| t.is_reality())
}

/// Candidate on the swap layer for one slot.
enum SwapCandidate<'a> {
    Incident(&'a Incident, SlotEffect),
    Event(&'a SwapEvent, SlotEffect),
}

impl SwapCandidate<'_> {
    fn key(&self) -> (chrono::DateTime<chrono::Utc>, &str) {
        match self {
            SwapCandidate::Incident(i, _) => i.recency_key(),
            SwapCandidate::Event(e, _) => (e.created_at, e.id.as_str()),
        }
    }
}

fn role_for(effect: SlotEffect) -> DutyRole {
    match effect {
        SlotEffect::Covered => DutyRole::Covered,
        SlotEffect::Covering => DutyRole::Covering,
        SlotEffect::Double => DutyRole::Double,
        SlotEffect::SwappedOut => DutyRole::SwappedOut,
        SlotEffect::SwappedIn => DutyRole::SwappedIn,
    }
}

/// Plan layers only; reality and coverage details are added by the caller.
pub(crate) fn resolve_plan_slot(
    snap: &DutySnapshot<'_>,
    rep: &Representative,
    date: NaiveDate,
    shift: ShiftType,
    effective: &EffectiveSchedule,
) -> EffectiveDutyResult {
    // 1. OVERRIDE
    if let Some(ov) = latest_incident(snap, rep, date, |t| t == IncidentType::Override) {
        let assignment = ov.assignment.unwrap_or(Assignment::None);
        let role = if assignment.covers(shift) {
            DutyRole::Base
        } else {
            DutyRole::None
        };
        let mut res = EffectiveDutyResult::new(role, AssignmentSource::Override);
        res.details = Some("Asignación manual".to_string());
        res.note = ov.note.clone();
        tracing::debug!(representative_id = %rep.id, %date, ?shift, incident_id = %ov.id, "override wins");
        return res;
    }

    // 2. SWAP incidents and swap events
    let base_assignment = effective.assignment();
    let mut candidates: Vec<SwapCandidate<'_>> = Vec::new();
    for inc in snap
        .incidents
        .iter()
        .filter(|i| i.incident_type == IncidentType::Swap && incident_hits(snap, rep, i, date))
    {
        let assignment = inc.assignment.unwrap_or(Assignment::None);
        if assignment.covers(shift) {
            candidates.push(SwapCandidate::Incident(inc, SlotEffect::SwappedIn));
        } else if base_assignment.covers(shift) {
            candidates.push(SwapCandidate::Incident(inc, SlotEffect::SwappedOut));
        }
    }
    for ev in snap.swaps.iter().filter(|e| e.date == date) {
        if let Some(effect) = ev.effect_on(&rep.id, shift) {
            candidates.push(SwapCandidate::Event(ev, effect));
        }
    }

    if let Some(winner) = candidates.into_iter().max_by(|a, b| a.key().cmp(&b.key())) {
        return match winner {
            SwapCandidate::Incident(inc, effect) => {
                let mut res = EffectiveDutyResult::new(role_for(effect), AssignmentSource::Swap);
                res.details = Some("Cambio de turno".to_string());
                res.note = inc.note.clone();
                res
            }
            SwapCandidate::Event(ev, effect) => {
                let mut res = EffectiveDutyResult::new(role_for(effect), AssignmentSource::Swap);
                res.details = Some(ev.describe_for(&rep.id));
                res.note = ev.note.clone();
                res
            }
        };
    }

    // 3 + 4. special schedule, else base
    let source = if effective.source.is_some() {
        AssignmentSource::SpecialSchedule
    } else {
        AssignmentSource::Base
    };
    let role = if base_assignment.covers(shift) {
        DutyRole::Base
    } else {
        DutyRole::None
    };
    EffectiveDutyResult::new(role, source)
}

/// Resolve a slot for a known representative, with a precomputed effective schedule.
pub(crate) fn resolve_for_rep(
    snap: &DutySnapshot<'_>,
    rep: &Representative,
    date: NaiveDate,
    shift: ShiftType,
    effective: &EffectiveSchedule,
    reality: Option<&Incident>,
) -> EffectiveDutyResult {
    let mut res = resolve_plan_slot(snap, rep, date, shift, effective);

    if let Some(inc) = reality {
        res.reason = Some(inc.incident_type);
        if res.note.is_none() {
            res.note = inc.note.clone();
        }
    }

    if let Some(cov) = find_slot_coverage(snap.coverages, date, shift, &rep.id) {
        let badge = if cov.covered_rep_id == rep.id {
            format!("CUBIERTO por {}", cov.covering_rep_id)
        } else {
            format!("CUBRIENDO a {}", cov.covered_rep_id)
        };
        res.details = Some(match res.details.take() {
            Some(d) => format!("{d}; {badge}"),
            None => badge,
        });
    }

    res
}

/// Resolve the effective duty of one representative for one (date, shift).
///
/// Unknown representatives resolve to `NONE` without a source.
pub fn resolve_effective_duty(
    snap: &DutySnapshot<'_>,
    representative_id: &str,
    date: NaiveDate,
    shift: ShiftType,
) -> EffectiveDutyResult {
    let Some(rep) = snap.representative(representative_id) else {
        return EffectiveDutyResult::unknown();
    };
    let effective = resolve_effective_schedule(rep, date, snap.special_schedules);
    let reality = reality_incident(snap, rep, date);
    resolve_for_rep(snap, rep, date, shift, &effective, reality)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{calendar_range, parse_date};
    use crate::snapshot::RosterState;
    use crate::swap::Coverage;
    use chrono::{DateTime, TimeZone, Utc};

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, h, 0, 0).unwrap()
    }

    fn state() -> RosterState {
        RosterState {
            representatives: vec![
                Representative::new("ana", "Ana", ShiftType::Day),
                Representative::new("beto", "Beto", ShiftType::Night),
            ],
            ..Default::default()
        }
    }

    fn calendar() -> Vec<crate::DayInfo> {
        calendar_range(d("2025-01-01"), d("2025-01-31"), &[])
    }

    #[test]
    fn base_schedule_slot() {
        let st = state();
        let cal = calendar();
        let snap = st.snapshot(&cal);
        let day = resolve_effective_duty(&snap, "ana", d("2025-01-08"), ShiftType::Day);
        assert_eq!(day.role, DutyRole::Base);
        assert!(day.should_work);
        assert_eq!(day.source, Some(AssignmentSource::Base));

        let night = resolve_effective_duty(&snap, "ana", d("2025-01-08"), ShiftType::Night);
        assert_eq!(night.role, DutyRole::None);
        assert!(!night.should_work);
    }

    #[test]
    fn unknown_representative_is_none() {
        let st = state();
        let cal = calendar();
        let res = resolve_effective_duty(&st.snapshot(&cal), "ghost", d("2025-01-08"), ShiftType::Day);
        assert_eq!(res.role, DutyRole::None);
        assert!(res.source.is_none());
    }

    #[test]
    fn cover_moves_duty_between_reps() {
        let mut st = state();
        st.swaps.push(SwapEvent::cover("s1", d("2025-01-08"), ShiftType::Day, "ana", "beto", at(9)));
        let cal = calendar();
        let snap = st.snapshot(&cal);

        let ana = resolve_effective_duty(&snap, "ana", d("2025-01-08"), ShiftType::Day);
        assert_eq!(ana.role, DutyRole::Covered);
        assert!(!ana.should_work);

        let beto = resolve_effective_duty(&snap, "beto", d("2025-01-08"), ShiftType::Day);
        assert_eq!(beto.role, DutyRole::Covering);
        assert!(beto.should_work);
        assert_eq!(beto.source, Some(AssignmentSource::Swap));
    }

    #[test]
    fn double_adds_a_shift() {
        let mut st = state();
        st.swaps.push(SwapEvent::double("s1", d("2025-01-08"), ShiftType::Night, "ana", at(9)));
        let cal = calendar();
        let snap = st.snapshot(&cal);
        let night = resolve_effective_duty(&snap, "ana", d("2025-01-08"), ShiftType::Night);
        assert_eq!(night.role, DutyRole::Double);
        assert!(night.should_work);
        // Day shift is untouched.
        let day = resolve_effective_duty(&snap, "ana", d("2025-01-08"), ShiftType::Day);
        assert_eq!(day.role, DutyRole::Base);
    }

    #[test]
    fn swap_exchanges_both_parties() {
        let mut st = state();
        st.swaps.push(SwapEvent::swap(
            "s1",
            d("2025-01-08"),
            ("ana", ShiftType::Day),
            ("beto", ShiftType::Night),
            at(9),
        ));
        let cal = calendar();
        let snap = st.snapshot(&cal);
        let date = d("2025-01-08");
        assert_eq!(resolve_effective_duty(&snap, "ana", date, ShiftType::Day).role, DutyRole::SwappedOut);
        assert_eq!(resolve_effective_duty(&snap, "ana", date, ShiftType::Night).role, DutyRole::SwappedIn);
        assert_eq!(resolve_effective_duty(&snap, "beto", date, ShiftType::Night).role, DutyRole::SwappedOut);
        assert_eq!(resolve_effective_duty(&snap, "beto", date, ShiftType::Day).role, DutyRole::SwappedIn);
    }

    #[test]
    fn override_shadows_swap_and_keeps_absence_reason() {
        let mut st = state();
        let date = d("2025-01-08");
        st.swaps.push(SwapEvent::cover("s1", date, ShiftType::Night, "beto", "ana", at(12)));
        st.incidents.push(
            Incident::new("ov", "ana", IncidentType::Override, date, at(8))
                .with_assignment(Assignment::Single(ShiftType::Day))
                .with_note("cobertura de evento"),
        );
        st.incidents.push(Incident::new("abs", "ana", IncidentType::Ausencia, date, at(10)));
        let cal = calendar();
        let snap = st.snapshot(&cal);

        let night = resolve_effective_duty(&snap, "ana", date, ShiftType::Night);
        assert_eq!(night.role, DutyRole::None);
        assert_eq!(night.source, Some(AssignmentSource::Override));

        let day = resolve_effective_duty(&snap, "ana", date, ShiftType::Day);
        assert_eq!(day.role, DutyRole::Base);
        assert!(day.should_work);
        assert_eq!(day.reason, Some(IncidentType::Ausencia));
        assert_eq!(day.note.as_deref(), Some("cobertura de evento"));
    }

    #[test]
    fn latest_override_wins() {
        let mut st = state();
        let date = d("2025-01-08");
        st.incidents.push(
            Incident::new("old", "ana", IncidentType::Override, date, at(8))
                .with_assignment(Assignment::Single(ShiftType::Night)),
        );
        st.incidents.push(
            Incident::new("new", "ana", IncidentType::Override, date, at(9))
                .with_assignment(Assignment::None),
        );
        let cal = calendar();
        let snap = st.snapshot(&cal);
        let night = resolve_effective_duty(&snap, "ana", date, ShiftType::Night);
        assert_eq!(night.role, DutyRole::None);
    }

    #[test]
    fn swap_incident_competes_with_events_by_recency() {
        let mut st = state();
        let date = d("2025-01-08");
        st.incidents.push(
            Incident::new("sw", "ana", IncidentType::Swap, date, at(11))
                .with_assignment(Assignment::Single(ShiftType::Night)),
        );
        st.swaps.push(SwapEvent::double("dbl", date, ShiftType::Night, "ana", at(10)));
        let cal = calendar();
        let snap = st.snapshot(&cal);

        let night = resolve_effective_duty(&snap, "ana", date, ShiftType::Night);
        assert_eq!(night.role, DutyRole::SwappedIn);
        let day = resolve_effective_duty(&snap, "ana", date, ShiftType::Day);
        assert_eq!(day.role, DutyRole::SwappedOut);
    }

    #[test]
    fn vacation_reason_only_on_affected_days() {
        let mut st = state();
        st.incidents.push(
            Incident::new("vac", "ana", IncidentType::Vacaciones, d("2025-01-06"), at(8)).with_duration(5),
        );
        let cal = calendar();
        let snap = st.snapshot(&cal);
        let wed = resolve_effective_duty(&snap, "ana", d("2025-01-08"), ShiftType::Day);
        assert_eq!(wed.reason, Some(IncidentType::Vacaciones));
        assert_eq!(wed.role, DutyRole::Base);

        let next_mon = resolve_effective_duty(&snap, "ana", d("2025-01-13"), ShiftType::Day);
        assert_eq!(next_mon.reason, None);
    }

    #[test]
    fn coverage_badge_in_details() {
        let mut st = state();
        let date = d("2025-01-08");
        st.coverages.push(Coverage::new("c1", date, ShiftType::Day, "ana", "beto", at(8)));
        let cal = calendar();
        let snap = st.snapshot(&cal);
        let ana = resolve_effective_duty(&snap, "ana", date, ShiftType::Day);
        assert_eq!(ana.details.as_deref(), Some("CUBIERTO por beto"));
        let beto = resolve_effective_duty(&snap, "beto", date, ShiftType::Day);
        assert_eq!(beto.details.as_deref(), Some("CUBRIENDO a ana"));
    }
}
