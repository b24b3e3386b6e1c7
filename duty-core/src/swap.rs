//! Swap events and coverage relationships.
//!
//! Both are overlays. Nothing here ever rewrites a base schedule: removing a
//! swap simply makes the underlying plan visible again.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::representative::ShiftType;

/// Type-specific body of a swap event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapKind {
    /// `to` works `from`'s shift; `from` stays home.
    #[serde(rename_all = "camelCase")]
    Cover {
        shift: ShiftType,
        from_representative_id: String,
        to_representative_id: String,
    },
    /// Extra shift on top of whatever the representative already has.
    #[serde(rename_all = "camelCase")]
    Double {
        shift: ShiftType,
        representative_id: String,
    },
    /// Both parties exchange shifts.
    #[serde(rename_all = "camelCase")]
    Swap {
        from_representative_id: String,
        from_shift: ShiftType,
        to_representative_id: String,
        to_shift: ShiftType,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapEvent {
    pub id: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kind: SwapKind,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

/// How a swap event touches one (representative, shift) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEffect {
    Covered,
    Covering,
    Double,
    SwappedOut,
    SwappedIn,
}

impl SwapEvent {
    pub fn cover(
        id: impl Into<String>,
        date: NaiveDate,
        shift: ShiftType,
        from: impl Into<String>,
        to: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            kind: SwapKind::Cover {
                shift,
                from_representative_id: from.into(),
                to_representative_id: to.into(),
            },
            created_at,
            note: None,
        }
    }

    pub fn double(
        id: impl Into<String>,
        date: NaiveDate,
        shift: ShiftType,
        rep: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            kind: SwapKind::Double {
                shift,
                representative_id: rep.into(),
            },
            created_at,
            note: None,
        }
    }

    pub fn swap(
        id: impl Into<String>,
        date: NaiveDate,
        from: (impl Into<String>, ShiftType),
        to: (impl Into<String>, ShiftType),
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            kind: SwapKind::Swap {
                from_representative_id: from.0.into(),
                from_shift: from.1,
                to_representative_id: to.0.into(),
                to_shift: to.1,
            },
            created_at,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Every representative id this event names.
    pub fn participants(&self) -> Vec<&str> {
        match &self.kind {
            SwapKind::Cover {
                from_representative_id,
                to_representative_id,
                ..
            }
            | SwapKind::Swap {
                from_representative_id,
                to_representative_id,
                ..
            } => vec![from_representative_id.as_str(), to_representative_id.as_str()],
            SwapKind::Double {
                representative_id, ..
            } => vec![representative_id.as_str()],
        }
    }

    /// Effect on `rep_id` working `shift` on this event's date, if any.
    pub fn effect_on(&self, rep_id: &str, shift: ShiftType) -> Option<SlotEffect> {
        match &self.kind {
            SwapKind::Cover {
                shift: s,
                from_representative_id,
                to_representative_id,
            } if *s == shift => {
                if from_representative_id == rep_id {
                    Some(SlotEffect::Covered)
                } else if to_representative_id == rep_id {
                    Some(SlotEffect::Covering)
                } else {
                    None
                }
            }
            SwapKind::Double {
                shift: s,
                representative_id,
            } if *s == shift && representative_id == rep_id => Some(SlotEffect::Double),
            SwapKind::Swap {
                from_representative_id,
                from_shift,
                to_representative_id,
                to_shift,
            } => {
                // Each party gives up their own shift and takes the other's.
                let (own, taken) = if from_representative_id == rep_id {
                    (*from_shift, *to_shift)
                } else if to_representative_id == rep_id {
                    (*to_shift, *from_shift)
                } else {
                    return None;
                };
                if taken == shift {
                    Some(SlotEffect::SwappedIn)
                } else if own == shift {
                    Some(SlotEffect::SwappedOut)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Short human description from the point of view of `rep_id`.
    pub fn describe_for(&self, rep_id: &str) -> String {
        match &self.kind {
            SwapKind::Cover {
                shift,
                from_representative_id,
                to_representative_id,
            } => {
                if from_representative_id == rep_id {
                    format!("Cubierto por {} ({})", to_representative_id, shift.as_str())
                } else {
                    format!("Cubre a {} ({})", from_representative_id, shift.as_str())
                }
            }
            SwapKind::Double { shift, .. } => format!("Doble turno ({})", shift.as_str()),
            SwapKind::Swap {
                from_representative_id,
                to_representative_id,
                ..
            } => {
                let other = if from_representative_id == rep_id {
                    to_representative_id
                } else {
                    from_representative_id
                };
                format!("Intercambio con {other}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoverageStatus {
    #[default]
    Active,
    Cancelled,
}

/// A failure-mode stand-in: someone covers a slot its owner could not work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub id: String,
    pub date: NaiveDate,
    pub shift: ShiftType,
    pub covered_rep_id: String,
    pub covering_rep_id: String,
    #[serde(default)]
    pub status: CoverageStatus,
    pub created_at: DateTime<Utc>,
}

impl Coverage {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        shift: ShiftType,
        covered: impl Into<String>,
        covering: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            shift,
            covered_rep_id: covered.into(),
            covering_rep_id: covering.into(),
            status: CoverageStatus::Active,
            created_at,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == CoverageStatus::Active
    }
}

/// Active coverage relationships for one representative on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageContext {
    /// Shifts on which the representative is covered by someone else.
    pub covered_shifts: Vec<ShiftType>,
    /// Shifts the representative covers for someone else.
    pub covering_shifts: Vec<ShiftType>,
}

impl CoverageContext {
    pub fn is_covered(&self) -> bool {
        !self.covered_shifts.is_empty()
    }

    pub fn is_covering(&self) -> bool {
        !self.covering_shifts.is_empty()
    }
}

/// Collect active coverages touching `rep_id` on `date`, shifts in DAY, NIGHT order.
pub fn coverage_context(coverages: &[Coverage], rep_id: &str, date: NaiveDate) -> CoverageContext {
    let mut ctx = CoverageContext::default();
    for c in coverages.iter().filter(|c| c.is_active() && c.date == date) {
        if c.covered_rep_id == rep_id {
            ctx.covered_shifts.push(c.shift);
        }
        if c.covering_rep_id == rep_id {
            ctx.covering_shifts.push(c.shift);
        }
    }
    ctx.covered_shifts.sort();
    ctx.covered_shifts.dedup();
    ctx.covering_shifts.sort();
    ctx.covering_shifts.dedup();
    ctx
}

/// Latest active coverage for one slot, if any (`created_at`, then id).
pub fn find_slot_coverage<'a>(
    coverages: &'a [Coverage],
    date: NaiveDate,
    shift: ShiftType,
    rep_id: &str,
) -> Option<&'a Coverage> {
    coverages
        .iter()
        .filter(|c| c.is_active() && c.date == date && c.shift == shift)
        .filter(|c| c.covered_rep_id == rep_id || c.covering_rep_id == rep_id)
        .max_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)))
}
