//! Special schedules: time-bounded weekly-pattern overrides, global or per representative.
//!
//! Resolution for one (representative, date):
//! - keep schedules whose inclusive `[from, to]` contains the date and whose scope applies
//! - INDIVIDUAL beats GLOBAL; among the same scope the narrowest range wins,
//!   then the latest `created_at`, then the greatest id
//! - no match falls back to the base schedule (with the MIXTO profile path)
//! - a matching schedule without a weekly pattern is corrupt: warn and fall back
//!   to the base schedule, skipping the MIXTO profile path

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::weekday_index;
use crate::representative::{DayStatus, Representative, ShiftType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleScope {
    Global,
    Individual,
}

/// One weekday of a special schedule pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternDay {
    Off,
    Day,
    Night,
    Mixto,
}

/// Explicit weekly pattern, indexed Sunday = 0 .. Saturday = 6.
pub type WeeklyPattern = [PatternDay; 7];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialSchedule {
    pub id: String,
    pub scope: ScheduleScope,
    #[serde(default)]
    pub target_id: Option<String>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// `None` only for corrupt records.
    #[serde(default)]
    pub weekly_pattern: Option<WeeklyPattern>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SpecialSchedule {
    pub fn global(id: impl Into<String>, from: NaiveDate, to: NaiveDate, pattern: WeeklyPattern) -> Self {
        Self {
            id: id.into(),
            scope: ScheduleScope::Global,
            target_id: None,
            from,
            to,
            weekly_pattern: Some(pattern),
            note: None,
            created_at: None,
        }
    }

    pub fn individual(
        id: impl Into<String>,
        target_id: impl Into<String>,
        from: NaiveDate,
        to: NaiveDate,
        pattern: WeeklyPattern,
    ) -> Self {
        Self {
            id: id.into(),
            scope: ScheduleScope::Individual,
            target_id: Some(target_id.into()),
            from,
            to,
            weekly_pattern: Some(pattern),
            note: None,
            created_at: None,
        }
    }

    /// Freeze a representative's current base schedule into an explicit
    /// individual pattern. The record is a copy; later edits to the
    /// representative do not flow into it.
    pub fn frozen_from_base(
        id: impl Into<String>,
        rep: &Representative,
        from: NaiveDate,
        to: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut sched = Self::individual(id, rep.id.clone(), from, to, materialize_base_pattern(rep));
        sched.created_at = Some(created_at);
        sched.note = Some(format!("Base de {} congelada", rep.name));
        sched
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    pub fn applies_to(&self, rep_id: &str) -> bool {
        match self.scope {
            ScheduleScope::Global => true,
            ScheduleScope::Individual => self.target_id.as_deref() == Some(rep_id),
        }
    }

    fn span_days(&self) -> i64 {
        (self.to - self.from).num_days()
    }
}

/// Copy a representative's base schedule into an explicit weekly pattern.
pub fn materialize_base_pattern(rep: &Representative) -> WeeklyPattern {
    let mut pattern = [PatternDay::Off; 7];
    for (idx, status) in rep.base_schedule.0.iter().enumerate() {
        pattern[idx] = match status {
            DayStatus::Off => PatternDay::Off,
            DayStatus::Working => {
                let mixto = rep
                    .mix_profile
                    .map(|p| p.applies_to(weekday_from_sunday_index(idx)))
                    .unwrap_or(false);
                if mixto {
                    PatternDay::Mixto
                } else {
                    match rep.base_shift {
                        ShiftType::Day => PatternDay::Day,
                        ShiftType::Night => PatternDay::Night,
                    }
                }
            }
        };
    }
    pattern
}

fn weekday_from_sunday_index(idx: usize) -> chrono::Weekday {
    (0..idx).fold(chrono::Weekday::Sun, |wd, _| wd.succ())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveScheduleType {
    Off,
    Base,
    Override,
    Mixto,
}

/// Which special schedule produced an effective schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSource {
    pub schedule_id: String,
    pub scope: ScheduleScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSchedule {
    #[serde(rename = "type")]
    pub kind: EffectiveScheduleType,
    pub shift: Option<ShiftType>,
    pub source: Option<ScheduleSource>,
}

impl EffectiveSchedule {
    fn off(source: Option<ScheduleSource>) -> Self {
        Self {
            kind: EffectiveScheduleType::Off,
            shift: None,
            source,
        }
    }

    /// Plan assignment this schedule implies.
    pub fn assignment(&self) -> crate::Assignment {
        match self.kind {
            EffectiveScheduleType::Off => crate::Assignment::None,
            EffectiveScheduleType::Mixto => crate::Assignment::Both,
            EffectiveScheduleType::Base | EffectiveScheduleType::Override => self
                .shift
                .map(crate::Assignment::Single)
                .unwrap_or(crate::Assignment::None),
        }
    }
}

fn compare_candidates(a: &SpecialSchedule, b: &SpecialSchedule) -> Ordering {
    let scope_rank = |s: &SpecialSchedule| match s.scope {
        ScheduleScope::Individual => 0,
        ScheduleScope::Global => 1,
    };
    scope_rank(a)
        .cmp(&scope_rank(b))
        // narrowest range first
        .then_with(|| a.span_days().cmp(&b.span_days()))
        // latest created first; missing timestamps sort last
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

/// Resolve the effective weekly-pattern schedule for one representative on one date.
pub fn resolve_effective_schedule(
    rep: &Representative,
    date: NaiveDate,
    schedules: &[SpecialSchedule],
) -> EffectiveSchedule {
    let winner = schedules
        .iter()
        .filter(|s| s.contains(date) && s.applies_to(&rep.id))
        .min_by(|a, b| compare_candidates(a, b));

    let Some(schedule) = winner else {
        return base_only(rep, date, true);
    };

    let source = Some(ScheduleSource {
        schedule_id: schedule.id.clone(),
        scope: schedule.scope,
    });

    let Some(pattern) = schedule.weekly_pattern else {
        tracing::warn!(
            schedule_id = %schedule.id,
            representative_id = %rep.id,
            %date,
            "special schedule has no weekly pattern; falling back to base schedule"
        );
        return base_only(rep, date, false);
    };

    match pattern[weekday_index(date) as usize] {
        PatternDay::Off => EffectiveSchedule::off(source),
        PatternDay::Mixto => EffectiveSchedule {
            kind: EffectiveScheduleType::Mixto,
            shift: None,
            source,
        },
        PatternDay::Day => EffectiveSchedule {
            kind: EffectiveScheduleType::Override,
            shift: Some(ShiftType::Day),
            source,
        },
        PatternDay::Night => EffectiveSchedule {
            kind: EffectiveScheduleType::Override,
            shift: Some(ShiftType::Night),
            source,
        },
    }
}

fn base_only(rep: &Representative, date: NaiveDate, allow_mix: bool) -> EffectiveSchedule {
    if !rep.works_on(date) {
        return EffectiveSchedule::off(None);
    }
    if allow_mix
        && rep
            .mix_profile
            .map(|p| p.applies_to(date.weekday()))
            .unwrap_or(false)
    {
        return EffectiveSchedule {
            kind: EffectiveScheduleType::Mixto,
            shift: None,
            source: None,
        };
    }
    EffectiveSchedule {
        kind: EffectiveScheduleType::Base,
        shift: Some(rep.base_shift),
        source: None,
    }
}
