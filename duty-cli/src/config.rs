use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use duty_core::StaffingThreshold;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_duty_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA zone used to decide what "this week" means.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    #[serde(default)]
    pub staffing: StaffingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffingSection {
    pub min_day: u32,
    pub min_night: u32,
}

impl Default for StaffingSection {
    fn default() -> Self {
        Self {
            min_day: 2,
            min_night: 1,
        }
    }
}

impl From<&StaffingSection> for StaffingThreshold {
    fn from(s: &StaffingSection) -> Self {
        StaffingThreshold {
            min_day: s.min_day,
            min_night: s.min_night,
        }
    }
}

fn default_timezone() -> String {
    "America/Santo_Domingo".to_string()
}

fn default_log_filter() -> String {
    "duty=info,duty_core=warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            log_filter: default_log_filter(),
            staffing: StaffingSection::default(),
        }
    }
}

impl Config {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid timezone {:?}: {e}", self.timezone))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_duty_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
