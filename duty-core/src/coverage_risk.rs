//! Per-shift staffing risk over a built weekly plan.
//!
//! Only operational dates are reported: a date counts when at least one agent
//! has a plan assignment other than NONE on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::{DayResolution, RealityStatus};
use crate::representative::ShiftType;
use crate::weekly_plan::WeeklyPlan;

/// Minimum headcount required per shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffingThreshold {
    pub min_day: u32,
    pub min_night: u32,
}

impl Default for StaffingThreshold {
    fn default() -> Self {
        Self {
            min_day: 1,
            min_night: 1,
        }
    }
}

impl StaffingThreshold {
    pub fn for_shift(&self, shift: ShiftType) -> u32 {
        match shift {
            ShiftType::Day => self.min_day,
            ShiftType::Night => self.min_night,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRisk {
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub planned: u32,
    pub present: u32,
    pub deficit: u32,
    pub at_risk: bool,
}

fn is_present(day: &DayResolution, shift: ShiftType) -> bool {
    if matches!(
        day.reality.status,
        RealityStatus::Absent | RealityStatus::Vacation | RealityStatus::License
    ) {
        return false;
    }
    let own = day.plan.assignment.covers(shift) && !day.coverage.covered_shifts.contains(&shift);
    own || day.coverage.covering_shifts.contains(&shift)
}

/// Staffing per (operational date, shift), dates ascending, DAY before NIGHT.
pub fn coverage_risk(plan: &WeeklyPlan, threshold: &StaffingThreshold) -> Vec<ShiftRisk> {
    let mut out = Vec::new();
    for date in plan.dates() {
        let days: Vec<&DayResolution> = plan.agents.iter().filter_map(|a| a.days.get(&date)).collect();
        if !days.iter().any(|d| d.plan.assignment.is_working()) {
            continue;
        }
        for shift in ShiftType::ALL {
            let planned = days.iter().filter(|d| d.plan.assignment.covers(shift)).count() as u32;
            let present = days.iter().filter(|d| is_present(d, shift)).count() as u32;
            let deficit = threshold.for_shift(shift).saturating_sub(present);
            out.push(ShiftRisk {
                date,
                shift,
                planned,
                present,
                deficit,
                at_risk: deficit > 0,
            });
        }
    }
    out
}
