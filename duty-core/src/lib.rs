//! duty-core: effective-duty resolution for shift rosters
//!
//! Given a snapshot of representatives, incidents, swaps, special schedules
//! and coverages, answers who is scheduled, who actually works and how each
//! day counts. Everything here is pure and synchronous: the same snapshot
//! always yields the same plan.

pub mod assignment;
pub mod calendar;
pub mod conflict;
pub mod coverage_risk;
pub mod day;
pub mod duty;
pub mod guard;
pub mod incident;
pub mod incident_dates;
pub mod metrics;
pub mod representative;
pub mod snapshot;
pub mod special_schedule;
pub mod swap;
pub mod weekly_plan;

pub use assignment::Assignment;
pub use calendar::{DayInfo, DayKind, calendar_range, parse_date, week_dates, week_start_monday};
pub use conflict::{CandidateIncident, ConflictCheckResult, ConflictType, check_incident_conflicts};
pub use coverage_risk::{ShiftRisk, StaffingThreshold, coverage_risk};
pub use day::{AssignmentSource, DayPlan, DayReality, DayResolution, RealityStatus};
pub use duty::{DutyRole, EffectiveDutyResult, resolve_effective_duty};
pub use guard::{Roster, ValidationError};
pub use incident::{Incident, IncidentSource, IncidentType};
pub use incident_dates::{ResolvedIncidentDates, resolve_incident_dates};
pub use metrics::{
    Badge, DayCounters, DayDisplay, DayMetrics, IncentiveSummary, SlotAccounting, WeekMetrics,
    compute_day_metrics, compute_week_metrics,
};
pub use representative::{BaseSchedule, DayStatus, MixProfile, Representative, ShiftType};
pub use snapshot::{DutySnapshot, RosterState};
pub use special_schedule::{
    EffectiveSchedule, EffectiveScheduleType, PatternDay, ScheduleScope, SpecialSchedule,
    WeeklyPattern, resolve_effective_schedule,
};
pub use swap::{Coverage, CoverageContext, CoverageStatus, SwapEvent, SwapKind};
pub use weekly_plan::{AgentWeek, WeeklyPlan, build_weekly_plan};
