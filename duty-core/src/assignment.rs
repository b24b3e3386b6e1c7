//! Plan-level assignment of a representative for one day.

use serde::{Deserialize, Serialize};

use crate::representative::ShiftType;

/// What the plan expects of a representative on a given day.
///
/// `Both` is the MIXTO capacity state: eligible for either shift, not a
/// double duty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "shift", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Assignment {
    #[default]
    None,
    Single(ShiftType),
    Both,
}

impl Assignment {
    pub fn covers(&self, shift: ShiftType) -> bool {
        match self {
            Assignment::None => false,
            Assignment::Single(s) => *s == shift,
            Assignment::Both => true,
        }
    }

    pub fn is_working(&self) -> bool {
        !matches!(self, Assignment::None)
    }

    /// Shifts in DAY, NIGHT order.
    pub fn shifts(&self) -> Vec<ShiftType> {
        match self {
            Assignment::None => vec![],
            Assignment::Single(s) => vec![*s],
            Assignment::Both => ShiftType::ALL.to_vec(),
        }
    }

    /// Rebuild an assignment from per-shift flags.
    pub fn from_flags(day: bool, night: bool) -> Self {
        match (day, night) {
            (true, true) => Assignment::Both,
            (true, false) => Assignment::Single(ShiftType::Day),
            (false, true) => Assignment::Single(ShiftType::Night),
            (false, false) => Assignment::None,
        }
    }
}
