//! Representative model: who works, on which weekdays, on which shift by default.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calendar::{is_mix_weekday, is_mix_weekend, weekday_index};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftType {
    Day,
    Night,
}

impl ShiftType {
    pub const ALL: [ShiftType; 2] = [ShiftType::Day, ShiftType::Night];

    pub fn other(self) -> ShiftType {
        match self {
            ShiftType::Day => ShiftType::Night,
            ShiftType::Night => ShiftType::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Day => "DAY",
            ShiftType::Night => "NIGHT",
        }
    }
}

/// Base schedule entry for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Working,
    Off,
}

/// Recurring weekly pattern, indexed Sunday = 0 .. Saturday = 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseSchedule(pub [DayStatus; 7]);

impl BaseSchedule {
    /// Monday to Friday working, weekend off.
    pub fn weekdays() -> Self {
        use DayStatus::{Off, Working};
        Self([Off, Working, Working, Working, Working, Working, Off])
    }

    pub fn every_day() -> Self {
        Self([DayStatus::Working; 7])
    }

    pub fn status_on(&self, date: NaiveDate) -> DayStatus {
        self.0[weekday_index(date) as usize]
    }

    pub fn with_day(mut self, weekday: Weekday, status: DayStatus) -> Self {
        self.0[weekday.num_days_from_sunday() as usize] = status;
        self
    }
}

impl Default for BaseSchedule {
    fn default() -> Self {
        Self::weekdays()
    }
}

/// Which half of the week a representative may take either shift (MIXTO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MixProfile {
    /// Mon–Thu.
    Weekday,
    /// Fri–Sun.
    Weekend,
}

impl MixProfile {
    pub fn applies_to(&self, weekday: Weekday) -> bool {
        match self {
            MixProfile::Weekday => is_mix_weekday(weekday),
            MixProfile::Weekend => is_mix_weekend(weekday),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Representative {
    pub id: String,
    pub name: String,
    pub base_shift: ShiftType,
    #[serde(default)]
    pub base_schedule: BaseSchedule,
    #[serde(default)]
    pub mix_profile: Option<MixProfile>,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub order_index: i32,
}

fn default_active() -> bool {
    true
}

impl Representative {
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_shift: ShiftType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_shift,
            base_schedule: BaseSchedule::default(),
            mix_profile: None,
            role: "AGENT".to_string(),
            is_active: true,
            order_index: 0,
        }
    }

    pub fn with_schedule(mut self, schedule: BaseSchedule) -> Self {
        self.base_schedule = schedule;
        self
    }

    pub fn with_mix_profile(mut self, profile: MixProfile) -> Self {
        self.mix_profile = Some(profile);
        self
    }

    pub fn with_order(mut self, order_index: i32) -> Self {
        self.order_index = order_index;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Base-schedule says this is a working weekday.
    pub fn works_on(&self, date: NaiveDate) -> bool {
        self.base_schedule.status_on(date) == DayStatus::Working
    }
}

/// Find a representative by id.
pub fn find_representative<'a>(reps: &'a [Representative], id: &str) -> Option<&'a Representative> {
    reps.iter().find(|r| r.id == id)
}
