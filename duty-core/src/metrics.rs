//! Day and week metrics: display flags and attendance / incentive counters.
//!
//! # Day rules (first matching row wins)
//!
//! | Condition | Planner | Shifts | Badge | Worked | Incentive | Absence |
//! |---|---|---|---|---|---|---|
//! | VACACIONES / LICENCIA | no | [] | same | no | no | no |
//! | AUSENCIA (any plan) | yes | plan's shifts | AUSENCIA | yes | no | yes |
//! | source = SWAP, working | yes | plan shifts | CUBRIENDO | yes | yes | no |
//! | covered | yes | plan shifts | CUBIERTO | yes | yes | no |
//! | covering | yes | plan + covered shifts | CUBRIENDO | yes | yes | no |
//! | BOTH (MIXTO) | yes | [DAY, NIGHT] | - | yes | yes | no |
//! | working | yes | plan shift | - | yes | yes | no |
//! | NONE / OFF | no | [] | - | no | no | no |
//!
//! # Week rules
//! - a day counts once, BOTH included
//! - planned = days counted as worked (absences included), worked = planned - absent
//! - leave days are outside the denominator entirely
//! - a single absence makes the whole week ineligible for incentives

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::day::{AssignmentSource, DayPlan, DayReality, DayResolution, RealityStatus};
use crate::representative::ShiftType;
use crate::swap::CoverageContext;
use crate::weekly_plan::WeeklyPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Badge {
    Vacaciones,
    Licencia,
    Ausencia,
    Cubierto,
    Cubriendo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDisplay {
    pub appears_in_planner: bool,
    pub appears_in_shifts: Vec<ShiftType>,
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCounters {
    pub counts_as_worked: bool,
    pub counts_for_incentives: bool,
    pub counts_as_absence: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMetrics {
    pub display: DayDisplay,
    pub metrics: DayCounters,
}

fn shown(shifts: Vec<ShiftType>, badge: Option<Badge>, incentive: bool, absence: bool) -> DayMetrics {
    DayMetrics {
        display: DayDisplay {
            appears_in_planner: true,
            appears_in_shifts: shifts,
            badge,
        },
        metrics: DayCounters {
            counts_as_worked: true,
            counts_for_incentives: incentive,
            counts_as_absence: absence,
        },
    }
}

fn hidden(badge: Option<Badge>) -> DayMetrics {
    DayMetrics {
        display: DayDisplay {
            appears_in_planner: false,
            appears_in_shifts: vec![],
            badge,
        },
        metrics: DayCounters::default(),
    }
}

pub fn compute_day_metrics(
    plan: &DayPlan,
    reality: &DayReality,
    coverage: Option<&CoverageContext>,
) -> DayMetrics {
    let covered = coverage.map(|c| c.is_covered()).unwrap_or(false);
    let covering = coverage.map(|c| c.is_covering()).unwrap_or(false);

    match reality.status {
        RealityStatus::Vacation => return hidden(Some(Badge::Vacaciones)),
        RealityStatus::License => return hidden(Some(Badge::Licencia)),
        RealityStatus::Absent => {
            return shown(plan.assignment.shifts(), Some(Badge::Ausencia), false, true);
        }
        RealityStatus::Working | RealityStatus::Off => {}
    }

    let working = plan.assignment.is_working();

    if plan.source == AssignmentSource::Swap && working {
        return shown(plan.assignment.shifts(), Some(Badge::Cubriendo), true, false);
    }
    if covered {
        return shown(plan.assignment.shifts(), Some(Badge::Cubierto), true, false);
    }
    if covering {
        let mut shifts = plan.assignment.shifts();
        if let Some(c) = coverage {
            shifts.extend(c.covering_shifts.iter().copied());
        }
        shifts.sort();
        shifts.dedup();
        return shown(shifts, Some(Badge::Cubriendo), true, false);
    }
    match plan.assignment {
        Assignment::Both => shown(ShiftType::ALL.to_vec(), None, true, false),
        Assignment::Single(s) => shown(vec![s], None, true, false),
        Assignment::None => hidden(None),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncentiveSummary {
    pub eligible: bool,
    pub worked_days: u32,
    pub disqualified_by_absence: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekMetrics {
    pub planned_days: u32,
    pub worked_days: u32,
    pub absent_days: u32,
    /// VACACIONES / LICENCIA days; not part of planned or worked.
    pub excused_days: u32,
    pub incentives: IncentiveSummary,
}

/// Aggregate a representative's days (normally seven).
pub fn compute_week_metrics<'a>(days: impl IntoIterator<Item = &'a DayResolution>) -> WeekMetrics {
    let mut out = WeekMetrics::default();
    for day in days {
        if day.reality.is_leave() {
            out.excused_days += 1;
            continue;
        }
        let m = &day.computed.metrics;
        if m.counts_as_worked {
            out.planned_days += 1;
        }
        if m.counts_as_absence {
            out.absent_days += 1;
        }
        if m.counts_for_incentives {
            out.incentives.worked_days += 1;
        }
    }
    out.worked_days = out.planned_days.saturating_sub(out.absent_days);
    out.incentives.disqualified_by_absence = out.absent_days > 0;
    out.incentives.eligible = out.absent_days == 0;
    out
}

/// Slot-level accounting over a weekly plan.
///
/// Every (representative, date) with a working plan assignment is one slot,
/// BOTH included. Each slot lands in exactly one bucket, checked in order:
/// covered, absence, uncovered (leave), executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAccounting {
    pub planned_slots: u32,
    pub executed_slots: u32,
    pub absence_slots: u32,
    pub covered_slots: u32,
    pub uncovered_slots: u32,
}

impl SlotAccounting {
    pub fn calculate(plan: &WeeklyPlan) -> Self {
        let mut out = Self::default();
        for day in plan.agents.iter().flat_map(|a| a.days.values()) {
            out.add(day);
        }
        out
    }

    fn add(&mut self, day: &DayResolution) {
        if !day.plan.assignment.is_working() {
            return;
        }
        self.planned_slots += 1;
        if day.coverage.is_covered() {
            self.covered_slots += 1;
        } else if day.reality.status == RealityStatus::Absent {
            self.absence_slots += 1;
        } else if day.reality.is_leave() {
            self.uncovered_slots += 1;
        } else {
            self.executed_slots += 1;
        }
    }

    /// planned = executed + absence + covered + uncovered
    pub fn is_balanced(&self) -> bool {
        self.planned_slots
            == self.executed_slots + self.absence_slots + self.covered_slots + self.uncovered_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::IncidentType;

    fn day(assignment: Assignment, source: AssignmentSource, incident: Option<IncidentType>) -> DayResolution {
        let plan = DayPlan::new(assignment, source);
        let reality = DayReality::from_plan(&plan, incident);
        let computed = compute_day_metrics(&plan, &reality, None);
        DayResolution {
            plan,
            reality,
            coverage: CoverageContext::default(),
            computed,
        }
    }

    fn working() -> DayResolution {
        day(Assignment::Single(ShiftType::Day), AssignmentSource::Base, None)
    }

    #[test]
    fn test_vacation_is_hidden_with_badge() {
        let m = day(Assignment::Single(ShiftType::Day), AssignmentSource::Base, Some(IncidentType::Vacaciones)).computed;
        assert!(!m.display.appears_in_planner);
        assert!(m.display.appears_in_shifts.is_empty());
        assert_eq!(m.display.badge, Some(Badge::Vacaciones));
        assert_eq!(m.metrics, DayCounters::default());
    }

    #[test]
    fn test_absence_beats_covered_badge() {
        let plan = DayPlan::new(Assignment::Single(ShiftType::Night), AssignmentSource::Base);
        let reality = DayReality::from_plan(&plan, Some(IncidentType::Ausencia));
        let cov = CoverageContext {
            covered_shifts: vec![ShiftType::Night],
            covering_shifts: vec![],
        };
        let m = compute_day_metrics(&plan, &reality, Some(&cov));
        assert_eq!(m.display.badge, Some(Badge::Ausencia));
        assert_eq!(m.display.appears_in_shifts, vec![ShiftType::Night]);
        assert!(m.metrics.counts_as_worked);
        assert!(!m.metrics.counts_for_incentives);
        assert!(m.metrics.counts_as_absence);
    }

    #[test]
    fn test_swap_source_working_is_cubriendo() {
        let m = day(Assignment::Single(ShiftType::Day), AssignmentSource::Swap, None).computed;
        assert_eq!(m.display.badge, Some(Badge::Cubriendo));
        assert!(m.metrics.counts_for_incentives);
    }

    #[test]
    fn test_covering_shows_covered_shift() {
        let plan = DayPlan::new(Assignment::None, AssignmentSource::Base);
        let reality = DayReality::from_plan(&plan, None);
        let cov = CoverageContext {
            covered_shifts: vec![],
            covering_shifts: vec![ShiftType::Night],
        };
        let m = compute_day_metrics(&plan, &reality, Some(&cov));
        assert!(m.display.appears_in_planner);
        assert_eq!(m.display.appears_in_shifts, vec![ShiftType::Night]);
        assert_eq!(m.display.badge, Some(Badge::Cubriendo));
    }

    #[test]
    fn test_mixto_appears_in_both_shifts_without_badge() {
        let m = day(Assignment::Both, AssignmentSource::Base, None).computed;
        assert_eq!(m.display.appears_in_shifts, vec![ShiftType::Day, ShiftType::Night]);
        assert_eq!(m.display.badge, None);
        assert!(m.metrics.counts_as_worked);
    }

    #[test]
    fn test_off_day_counts_for_nothing() {
        let m = day(Assignment::None, AssignmentSource::Base, None).computed;
        assert!(!m.display.appears_in_planner);
        assert_eq!(m.metrics, DayCounters::default());
    }

    #[test]
    fn test_one_absence_disqualifies_the_week() {
        let mut days: Vec<DayResolution> = (0..6).map(|_| working()).collect();
        days.push(day(Assignment::Single(ShiftType::Day), AssignmentSource::Base, Some(IncidentType::Ausencia)));
        let week = compute_week_metrics(&days);
        assert_eq!(week.worked_days, 6);
        assert_eq!(week.absent_days, 1);
        assert!(!week.incentives.eligible);
        assert!(week.incentives.disqualified_by_absence);
    }

    #[test]
    fn test_leave_days_leave_the_denominator() {
        let mut days: Vec<DayResolution> = (0..3).map(|_| working()).collect();
        days.push(day(Assignment::Single(ShiftType::Day), AssignmentSource::Base, Some(IncidentType::Licencia)));
        days.push(day(Assignment::Single(ShiftType::Day), AssignmentSource::Base, Some(IncidentType::Vacaciones)));
        days.push(day(Assignment::Both, AssignmentSource::Base, None));
        days.push(day(Assignment::None, AssignmentSource::Base, None));
        let week = compute_week_metrics(&days);
        assert_eq!(week.planned_days, 4);
        assert_eq!(week.worked_days, 4);
        assert_eq!(week.excused_days, 2);
        assert_eq!(week.incentives.worked_days, 4);
        assert!(week.incentives.eligible);
    }
}
