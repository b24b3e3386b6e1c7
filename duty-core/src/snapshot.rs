//! Aggregate roster state and the borrowed snapshot every resolver reads.

use serde::{Deserialize, Serialize};

use crate::calendar::DayInfo;
use crate::incident::Incident;
use crate::representative::{Representative, find_representative};
use crate::special_schedule::SpecialSchedule;
use crate::swap::{Coverage, SwapEvent};

/// Everything the persistence layer loads and saves, already deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterState {
    #[serde(default)]
    pub representatives: Vec<Representative>,
    #[serde(default)]
    pub incidents: Vec<Incident>,
    #[serde(default)]
    pub swaps: Vec<SwapEvent>,
    #[serde(default)]
    pub special_schedules: Vec<SpecialSchedule>,
    #[serde(default)]
    pub coverages: Vec<Coverage>,
}

impl RosterState {
    /// Read-only view for resolution, paired with an externally supplied calendar.
    pub fn snapshot<'a>(&'a self, calendar: &'a [DayInfo]) -> DutySnapshot<'a> {
        DutySnapshot {
            representatives: &self.representatives,
            incidents: &self.incidents,
            swaps: &self.swaps,
            special_schedules: &self.special_schedules,
            coverages: &self.coverages,
            calendar,
        }
    }
}

/// Borrowed inputs of one resolution pass.
#[derive(Debug, Clone, Copy)]
pub struct DutySnapshot<'a> {
    pub representatives: &'a [Representative],
    pub incidents: &'a [Incident],
    pub swaps: &'a [SwapEvent],
    pub special_schedules: &'a [SpecialSchedule],
    pub coverages: &'a [Coverage],
    pub calendar: &'a [DayInfo],
}

impl<'a> DutySnapshot<'a> {
    pub fn representative(&self, id: &str) -> Option<&'a Representative> {
        find_representative(self.representatives, id)
    }

    /// Active representatives ordered by `order_index`, then id.
    pub fn active_representatives(&self) -> Vec<&'a Representative> {
        let mut reps: Vec<&Representative> =
            self.representatives.iter().filter(|r| r.is_active).collect();
        reps.sort_by(|a, b| a.order_index.cmp(&b.order_index).then_with(|| a.id.cmp(&b.id)));
        reps
    }
}
