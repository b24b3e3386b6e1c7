//! Per-day derived records: what was planned, what happened, what it means.

use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;
use crate::incident::IncidentType;
use crate::metrics::DayMetrics;
use crate::swap::CoverageContext;

/// Which layer produced a planned assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentSource {
    Base,
    SpecialSchedule,
    Swap,
    Override,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub assignment: Assignment,
    pub source: AssignmentSource,
}

impl DayPlan {
    pub fn new(assignment: Assignment, source: AssignmentSource) -> Self {
        Self { assignment, source }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RealityStatus {
    Working,
    Off,
    Absent,
    Vacation,
    License,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayReality {
    pub status: RealityStatus,
    pub incident_type: Option<IncidentType>,
}

impl DayReality {
    /// Derive reality from the plan and the winning reality incident, if any.
    pub fn from_plan(plan: &DayPlan, incident_type: Option<IncidentType>) -> Self {
        let status = match incident_type {
            Some(IncidentType::Ausencia) => RealityStatus::Absent,
            Some(IncidentType::Vacaciones) => RealityStatus::Vacation,
            Some(IncidentType::Licencia) => RealityStatus::License,
            _ if plan.assignment.is_working() => RealityStatus::Working,
            _ => RealityStatus::Off,
        };
        Self {
            status,
            incident_type,
        }
    }

    pub fn is_leave(&self) -> bool {
        matches!(self.status, RealityStatus::Vacation | RealityStatus::License)
    }
}

/// Fully resolved day for one representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayResolution {
    pub plan: DayPlan,
    pub reality: DayReality,
    #[serde(default)]
    pub coverage: CoverageContext,
    pub computed: DayMetrics,
}
