//! Weekly schedule builder.
//!
//! Applies the duty engine to every active representative across seven days.
//! The plan is derived data: operational changes go into incidents, swaps or
//! schedules and the plan is rebuilt, never edited.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::calendar::week_dates;
use crate::day::{DayPlan, DayReality, DayResolution};
use crate::duty::{EffectiveDutyResult, reality_incident, resolve_for_rep};
use crate::metrics::{WeekMetrics, compute_day_metrics, compute_week_metrics};
use crate::representative::{Representative, ShiftType};
use crate::snapshot::DutySnapshot;
use crate::special_schedule::resolve_effective_schedule;
use crate::swap::coverage_context;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentWeek {
    pub representative_id: String,
    pub name: String,
    pub days: BTreeMap<NaiveDate, DayResolution>,
}

impl AgentWeek {
    pub fn metrics(&self) -> WeekMetrics {
        compute_week_metrics(self.days.values())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlan {
    pub week_start: NaiveDate,
    pub agents: Vec<AgentWeek>,
}

impl WeeklyPlan {
    pub fn agent(&self, representative_id: &str) -> Option<&AgentWeek> {
        self.agents.iter().find(|a| a.representative_id == representative_id)
    }

    pub fn day(&self, representative_id: &str, date: NaiveDate) -> Option<&DayResolution> {
        self.agent(representative_id)?.days.get(&date)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        week_dates(self.week_start)
    }
}

/// Per-shift engine results for one representative-day, DAY then NIGHT.
pub fn resolve_shifts(
    snap: &DutySnapshot<'_>,
    rep: &Representative,
    date: NaiveDate,
) -> [EffectiveDutyResult; 2] {
    let effective = resolve_effective_schedule(rep, date, snap.special_schedules);
    let reality = reality_incident(snap, rep, date);
    ShiftType::ALL.map(|shift| resolve_for_rep(snap, rep, date, shift, &effective, reality))
}

/// Resolve one representative-day into plan, reality and metrics.
pub fn resolve_day(snap: &DutySnapshot<'_>, rep: &Representative, date: NaiveDate) -> DayResolution {
    let [day, night] = resolve_shifts(snap, rep, date);

    let assignment = Assignment::from_flags(day.should_work, night.should_work);
    // Both slots share the override / base layers; swaps may touch only one.
    let source = day
        .source
        .into_iter()
        .chain(night.source)
        .max()
        .unwrap_or(crate::day::AssignmentSource::Base);
    let plan = DayPlan::new(assignment, source);

    let reality = DayReality::from_plan(&plan, day.reason);
    let coverage = coverage_context(snap.coverages, &rep.id, date);
    let computed = compute_day_metrics(&plan, &reality, Some(&coverage));

    DayResolution {
        plan,
        reality,
        coverage,
        computed,
    }
}

/// Build the plan for the seven days starting at `week_start`.
pub fn build_weekly_plan(snap: &DutySnapshot<'_>, week_start: NaiveDate) -> WeeklyPlan {
    let dates = week_dates(week_start);
    let agents = snap
        .active_representatives()
        .into_iter()
        .map(|rep| AgentWeek {
            representative_id: rep.id.clone(),
            name: rep.name.clone(),
            days: dates
                .iter()
                .map(|&date| (date, resolve_day(snap, rep, date)))
                .collect(),
        })
        .collect();

    tracing::debug!(%week_start, "weekly plan built");
    WeeklyPlan { week_start, agents }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{calendar_range, parse_date};
    use crate::day::{AssignmentSource, RealityStatus};
    use crate::incident::{Incident, IncidentType};
    use crate::metrics::{Badge, SlotAccounting};
    use crate::representative::MixProfile;
    use crate::snapshot::RosterState;
    use crate::swap::{Coverage, SwapEvent};
    use chrono::{TimeZone, Utc};

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn roster() -> RosterState {
        RosterState {
            representatives: vec![
                Representative::new("beto", "Beto", ShiftType::Night).with_order(2),
                Representative::new("ana", "Ana", ShiftType::Day).with_order(1),
                Representative::new("caro", "Caro", ShiftType::Day)
                    .with_order(3)
                    .with_mix_profile(MixProfile::Weekday),
                Representative::new("old", "Old", ShiftType::Day).inactive(),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn plan_orders_active_agents() {
        let st = roster();
        let cal = calendar_range(d("2025-01-01"), d("2025-01-31"), &[]);
        let plan = build_weekly_plan(&st.snapshot(&cal), d("2025-01-06"));
        let ids: Vec<&str> = plan.agents.iter().map(|a| a.representative_id.as_str()).collect();
        assert_eq!(ids, vec!["ana", "beto", "caro"]);
        assert_eq!(plan.agents[0].days.len(), 7);
    }

    #[test]
    fn mixto_days_are_both() {
        let st = roster();
        let cal = calendar_range(d("2025-01-01"), d("2025-01-31"), &[]);
        let plan = build_weekly_plan(&st.snapshot(&cal), d("2025-01-06"));
        let mon = plan.day("caro", d("2025-01-06")).unwrap();
        assert_eq!(mon.plan.assignment, Assignment::Both);
        let fri = plan.day("caro", d("2025-01-10")).unwrap();
        assert_eq!(fri.plan.assignment, Assignment::Single(ShiftType::Day));
        let week = plan.agent("caro").unwrap().metrics();
        assert_eq!(week.planned_days, 5);
    }

    #[test]
    fn cover_and_absence_flow_into_the_plan() {
        let mut st = roster();
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap();
        st.swaps.push(SwapEvent::cover("s1", d("2025-01-07"), ShiftType::Night, "beto", "ana", at));
        st.incidents.push(Incident::new("a1", "beto", IncidentType::Ausencia, d("2025-01-08"), at));
        let cal = calendar_range(d("2025-01-01"), d("2025-01-31"), &[]);
        let plan = build_weekly_plan(&st.snapshot(&cal), d("2025-01-06"));

        let ana_tue = plan.day("ana", d("2025-01-07")).unwrap();
        assert_eq!(ana_tue.plan.assignment, Assignment::Both);
        assert_eq!(ana_tue.plan.source, AssignmentSource::Swap);
        assert_eq!(ana_tue.computed.display.badge, Some(Badge::Cubriendo));

        let beto_tue = plan.day("beto", d("2025-01-07")).unwrap();
        assert_eq!(beto_tue.plan.assignment, Assignment::None);
        assert!(!beto_tue.computed.display.appears_in_planner);

        let beto_wed = plan.day("beto", d("2025-01-08")).unwrap();
        assert_eq!(beto_wed.reality.status, RealityStatus::Absent);
        let week = plan.agent("beto").unwrap().metrics();
        assert!(!week.incentives.eligible);
    }

    #[test]
    fn slot_accounting_balances() {
        let mut st = roster();
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap();
        st.incidents.push(Incident::new("a1", "ana", IncidentType::Ausencia, d("2025-01-07"), at));
        st.incidents.push(
            Incident::new("v1", "beto", IncidentType::Vacaciones, d("2025-01-08"), at).with_duration(2),
        );
        st.coverages.push(Coverage::new("c1", d("2025-01-10"), ShiftType::Day, "caro", "ana", at));
        let cal = calendar_range(d("2025-01-01"), d("2025-01-31"), &[]);
        let plan = build_weekly_plan(&st.snapshot(&cal), d("2025-01-06"));

        let slots = SlotAccounting::calculate(&plan);
        assert_eq!(slots.planned_slots, 15);
        assert_eq!(slots.absence_slots, 1);
        assert_eq!(slots.uncovered_slots, 2);
        assert_eq!(slots.covered_slots, 1);
        assert_eq!(slots.executed_slots, 11);
        assert!(slots.is_balanced());
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let st = roster();
        let cal = calendar_range(d("2025-01-01"), d("2025-01-31"), &[]);
        let snap = st.snapshot(&cal);
        let a = build_weekly_plan(&snap, d("2025-01-06"));
        let b = build_weekly_plan(&snap, d("2025-01-06"));
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
