//! Incident model: dated events attached to a representative.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::assignment::Assignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentType {
    Vacaciones,
    Licencia,
    Ausencia,
    Tardanza,
    Error,
    Otro,
    Override,
    Swap,
}

impl IncidentType {
    /// Multi-day leave whose span is expanded from `duration`.
    pub fn is_leave(&self) -> bool {
        matches!(self, IncidentType::Vacaciones | IncidentType::Licencia)
    }

    /// Changes what actually happened, without touching the plan.
    pub fn is_reality(&self) -> bool {
        matches!(
            self,
            IncidentType::Vacaciones | IncidentType::Licencia | IncidentType::Ausencia
        )
    }

    /// Replaces the planned assignment.
    pub fn is_plan(&self) -> bool {
        matches!(self, IncidentType::Override | IncidentType::Swap)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentType::Vacaciones => "VACACIONES",
            IncidentType::Licencia => "LICENCIA",
            IncidentType::Ausencia => "AUSENCIA",
            IncidentType::Tardanza => "TARDANZA",
            IncidentType::Error => "ERROR",
            IncidentType::Otro => "OTRO",
            IncidentType::Override => "OVERRIDE",
            IncidentType::Swap => "SWAP",
        }
    }
}

/// Where the duty an incident refers to came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentSource {
    #[default]
    Base,
    /// The representative was covering someone else's slot.
    Coverage,
    Swap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub representative_id: String,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub start_date: NaiveDate,
    /// Calendar days for LICENCIA, working days for VACACIONES, unused otherwise.
    #[serde(default = "default_duration")]
    pub duration: u32,
    /// For OVERRIDE / SWAP.
    #[serde(default)]
    pub assignment: Option<Assignment>,
    #[serde(default)]
    pub source: IncidentSource,
    /// Representative originally scheduled when the absence happened on a covered slot.
    #[serde(default)]
    pub slot_owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_duration() -> u32 {
    1
}

impl Incident {
    pub fn new(
        id: impl Into<String>,
        representative_id: impl Into<String>,
        incident_type: IncidentType,
        start_date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            representative_id: representative_id.into(),
            incident_type,
            start_date,
            duration: 1,
            assignment: None,
            source: IncidentSource::Base,
            slot_owner_id: None,
            created_at,
            note: None,
        }
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_assignment(mut self, assignment: Assignment) -> Self {
        self.assignment = Some(assignment);
        self
    }

    pub fn with_source(mut self, source: IncidentSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_slot_owner(mut self, slot_owner_id: impl Into<String>) -> Self {
        self.slot_owner_id = Some(slot_owner_id.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Total order used wherever "latest wins": `created_at`, then id.
    pub fn recency_key(&self) -> (DateTime<Utc>, &str) {
        (self.created_at, self.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::representative::ShiftType;
    use chrono::TimeZone;

    #[test]
    fn test_incident_json_roundtrip_keeps_wire_names() {
        let inc = Incident::new(
            "i1",
            "r1",
            IncidentType::Override,
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
        )
        .with_assignment(Assignment::Single(ShiftType::Night));

        let json = serde_json::to_string(&inc).unwrap();
        assert!(json.contains("\"type\":\"OVERRIDE\""));
        assert!(json.contains("\"representativeId\":\"r1\""));
        assert!(json.contains("\"startDate\":\"2025-01-06\""));
        assert!(json.contains("\"source\":\"BASE\""));

        let back: Incident = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inc);
    }

    #[test]
    fn test_type_classification() {
        assert!(IncidentType::Licencia.is_leave());
        assert!(!IncidentType::Ausencia.is_leave());
        assert!(IncidentType::Ausencia.is_reality());
        assert!(!IncidentType::Tardanza.is_reality());
        assert!(IncidentType::Swap.is_plan());
    }

    #[test]
    fn test_recency_key_breaks_ties_by_id() {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        let a = Incident::new("a", "r1", IncidentType::Override, day, at);
        let b = Incident::new("b", "r1", IncidentType::Override, day, at);
        assert!(b.recency_key() > a.recency_key());
    }
}
