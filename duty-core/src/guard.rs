//! Write boundary for roster records.
//!
//! Resolution never fails; everything that can be rejected is rejected here,
//! before the record reaches `RosterState`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::DayInfo;
use crate::conflict::{CandidateIncident, ConflictType, check_incident_conflicts};
use crate::duty::resolve_effective_duty;
use crate::incident::{Incident, IncidentSource, IncidentType};
use crate::representative::{ShiftType, find_representative};
use crate::snapshot::{DutySnapshot, RosterState};
use crate::special_schedule::{ScheduleScope, SpecialSchedule};
use crate::swap::{Coverage, CoverageStatus, SwapEvent, SwapKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("unknown representative: {0}")]
    UnknownRepresentative(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("{message}")]
    Conflict { kind: ConflictType, message: String },

    #[error("incident {0} comes from a coverage but has no slot owner")]
    MissingSlotOwner(String),

    #[error("incident {0}: the slot owner cannot be marked absent on a covered slot")]
    AbsenceOnSlotOwner(String),

    #[error("incident {0} needs an assignment")]
    MissingAssignment(String),

    #[error("incident {0}: duration must be at least one day")]
    InvalidDuration(String),

    #[error("{0} names the same representative on both sides")]
    SelfReference(String),

    #[error("swap {0} exchanges a shift for the same shift")]
    SameShiftSwap(String),

    #[error("{representative_id} already works {shift:?} on {date}")]
    DoubleBooking {
        representative_id: String,
        date: NaiveDate,
        shift: ShiftType,
    },

    #[error("special schedule {id}: {from} is after {to}")]
    InvalidRange { id: String, from: NaiveDate, to: NaiveDate },

    #[error("special schedule {0} is individual but has no target")]
    MissingTarget(String),
}

pub type GuardResult<T> = std::result::Result<T, ValidationError>;

/// Owns the roster state and validates every append.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    state: RosterState,
}

impl Roster {
    pub fn new(state: RosterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn into_state(self) -> RosterState {
        self.state
    }

    pub fn snapshot<'a>(&'a self, calendar: &'a [DayInfo]) -> DutySnapshot<'a> {
        self.state.snapshot(calendar)
    }

    fn require_rep(&self, id: &str) -> GuardResult<()> {
        if find_representative(&self.state.representatives, id).is_none() {
            return Err(ValidationError::UnknownRepresentative(id.to_string()));
        }
        Ok(())
    }

    /// `rep_id` must not already be working `shift` on `date`.
    fn require_free(
        &self,
        rep_id: &str,
        date: NaiveDate,
        shift: ShiftType,
        calendar: &[DayInfo],
    ) -> GuardResult<()> {
        let duty = resolve_effective_duty(&self.state.snapshot(calendar), rep_id, date, shift);
        if duty.should_work {
            return Err(ValidationError::DoubleBooking {
                representative_id: rep_id.to_string(),
                date,
                shift,
            });
        }
        Ok(())
    }

    pub fn add_incident(&mut self, incident: Incident, calendar: &[DayInfo]) -> GuardResult<()> {
        if self.state.incidents.iter().any(|i| i.id == incident.id) {
            return Err(ValidationError::DuplicateId(incident.id));
        }
        let rep = find_representative(&self.state.representatives, &incident.representative_id)
            .ok_or_else(|| ValidationError::UnknownRepresentative(incident.representative_id.clone()))?;

        match incident.incident_type {
            IncidentType::Vacaciones | IncidentType::Licencia if incident.duration == 0 => {
                return Err(ValidationError::InvalidDuration(incident.id));
            }
            IncidentType::Override | IncidentType::Swap if incident.assignment.is_none() => {
                return Err(ValidationError::MissingAssignment(incident.id));
            }
            _ => {}
        }

        if incident.source == IncidentSource::Coverage {
            let Some(owner) = incident.slot_owner_id.as_deref() else {
                return Err(ValidationError::MissingSlotOwner(incident.id));
            };
            if incident.incident_type == IncidentType::Ausencia && owner == incident.representative_id {
                return Err(ValidationError::AbsenceOnSlotOwner(incident.id));
            }
        }

        let check = check_incident_conflicts(
            rep,
            CandidateIncident::from(&incident),
            &self.state.incidents,
            calendar,
        );
        if let (true, Some(kind)) = (check.has_conflict, check.conflict_type) {
            return Err(ValidationError::Conflict {
                kind,
                message: check.message.unwrap_or_default(),
            });
        }

        tracing::debug!(id = %incident.id, kind = incident.incident_type.as_str(), "incident recorded");
        self.state.incidents.push(incident);
        Ok(())
    }

    pub fn remove_incident(&mut self, id: &str) -> Option<Incident> {
        let pos = self.state.incidents.iter().position(|i| i.id == id)?;
        Some(self.state.incidents.remove(pos))
    }

    pub fn add_swap(&mut self, swap: SwapEvent, calendar: &[DayInfo]) -> GuardResult<()> {
        if self.state.swaps.iter().any(|s| s.id == swap.id) {
            return Err(ValidationError::DuplicateId(swap.id));
        }
        for rep_id in swap.participants() {
            self.require_rep(rep_id)?;
        }
        match &swap.kind {
            SwapKind::Cover {
                shift,
                from_representative_id,
                to_representative_id,
            } => {
                if from_representative_id == to_representative_id {
                    return Err(ValidationError::SelfReference(swap.id));
                }
                self.require_free(to_representative_id, swap.date, *shift, calendar)?;
            }
            SwapKind::Double {
                shift,
                representative_id,
            } => {
                self.require_free(representative_id, swap.date, *shift, calendar)?;
            }
            SwapKind::Swap {
                from_representative_id,
                from_shift,
                to_representative_id,
                to_shift,
            } => {
                if from_representative_id == to_representative_id {
                    return Err(ValidationError::SelfReference(swap.id));
                }
                if from_shift == to_shift {
                    return Err(ValidationError::SameShiftSwap(swap.id));
                }
                // Each party takes the other's shift.
                self.require_free(from_representative_id, swap.date, *to_shift, calendar)?;
                self.require_free(to_representative_id, swap.date, *from_shift, calendar)?;
            }
        }

        self.state.swaps.push(swap);
        Ok(())
    }

    pub fn remove_swap(&mut self, id: &str) -> Option<SwapEvent> {
        let pos = self.state.swaps.iter().position(|s| s.id == id)?;
        Some(self.state.swaps.remove(pos))
    }

    pub fn add_special_schedule(&mut self, schedule: SpecialSchedule) -> GuardResult<()> {
        if self.state.special_schedules.iter().any(|s| s.id == schedule.id) {
            return Err(ValidationError::DuplicateId(schedule.id));
        }
        if schedule.from > schedule.to {
            return Err(ValidationError::InvalidRange {
                id: schedule.id,
                from: schedule.from,
                to: schedule.to,
            });
        }
        if schedule.scope == ScheduleScope::Individual {
            let Some(target) = schedule.target_id.as_deref() else {
                return Err(ValidationError::MissingTarget(schedule.id));
            };
            self.require_rep(target)?;
        }
        self.state.special_schedules.push(schedule);
        Ok(())
    }

    pub fn remove_special_schedule(&mut self, id: &str) -> Option<SpecialSchedule> {
        let pos = self.state.special_schedules.iter().position(|s| s.id == id)?;
        Some(self.state.special_schedules.remove(pos))
    }

    pub fn add_coverage(&mut self, coverage: Coverage) -> GuardResult<()> {
        if self.state.coverages.iter().any(|c| c.id == coverage.id) {
            return Err(ValidationError::DuplicateId(coverage.id));
        }
        self.require_rep(&coverage.covered_rep_id)?;
        self.require_rep(&coverage.covering_rep_id)?;
        if coverage.covered_rep_id == coverage.covering_rep_id {
            return Err(ValidationError::SelfReference(coverage.id));
        }
        self.state.coverages.push(coverage);
        Ok(())
    }

    /// Mark a coverage cancelled. Returns the updated record, or `None` when
    /// the id is unknown or already cancelled.
    pub fn cancel_coverage(&mut self, id: &str) -> Option<&Coverage> {
        let cov = self
            .state
            .coverages
            .iter_mut()
            .find(|c| c.id == id && c.is_active())?;
        cov.status = CoverageStatus::Cancelled;
        Some(&*cov)
    }
}
