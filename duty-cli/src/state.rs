use anyhow::{Context, Result};
use duty_core::{DayInfo, RosterState};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub fn duty_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".duty"))
}

pub fn ensure_duty_home() -> Result<PathBuf> {
    let dir = duty_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// On-disk snapshot: the calendar plus every roster collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFile {
    #[serde(default)]
    pub calendar: Vec<DayInfo>,
    #[serde(flatten)]
    pub roster: RosterState,
}

pub fn load_snapshot(path: &Path) -> Result<SnapshotFile> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut snap: SnapshotFile =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    snap.calendar.sort_by_key(|d| d.date);
    tracing::debug!(
        path = %path.display(),
        days = snap.calendar.len(),
        representatives = snap.roster.representatives.len(),
        incidents = snap.roster.incidents.len(),
        "snapshot loaded"
    );
    Ok(snap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_file_reads_flat_collections() {
        let json = r#"{
            "calendar": [
                {"date": "2025-01-07", "dayOfWeek": 2, "kind": "WORKING", "isSpecial": false},
                {"date": "2025-01-06", "dayOfWeek": 1, "kind": "HOLIDAY", "isSpecial": true, "label": "Feriado"}
            ],
            "representatives": [
                {"id": "ana", "name": "Ana", "baseShift": "DAY",
                 "baseSchedule": ["OFF","WORKING","WORKING","WORKING","WORKING","WORKING","OFF"],
                 "role": "AGENT", "orderIndex": 1}
            ],
            "incidents": [],
            "specialSchedules": []
        }"#;
        let snap: SnapshotFile = serde_json::from_str(json).unwrap();
        assert_eq!(snap.calendar.len(), 2);
        assert_eq!(snap.roster.representatives[0].id, "ana");
        assert!(snap.roster.swaps.is_empty());
    }

    #[test]
    fn demo_roster_builds_a_plan() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .unwrap()
            .join("demos/roster.json");
        let file = load_snapshot(&path).unwrap();
        let plan = duty_core::build_weekly_plan(
            &file.roster.snapshot(&file.calendar),
            duty_core::parse_date("2025-01-13").unwrap(),
        );
        assert_eq!(plan.agents.len(), 3);
        assert!(duty_core::SlotAccounting::calculate(&plan).is_balanced());
    }
}
