use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use duty_core::{
    CandidateIncident, IncidentType, ShiftType, StaffingThreshold, build_weekly_plan,
    check_incident_conflicts, coverage_risk, parse_date, resolve_effective_duty,
    resolve_incident_dates, week_start_monday,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(name = "duty", version, about = "Effective-duty resolution for shift rosters")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the weekly plan with per-agent metrics and slot accounting
    PlanWeek {
        #[arg(long)]
        snapshot: PathBuf,

        /// Any date of the week; defaults to this week in the configured timezone
        #[arg(long)]
        week_start: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Resolve one (representative, date, shift)
    Resolve {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        rep: String,

        #[arg(long)]
        date: String,

        #[arg(long, value_enum)]
        shift: ShiftArg,

        #[arg(long)]
        json: bool,
    },

    /// Check whether a new incident would clash with existing vacations or licenses
    CheckIncident {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        rep: String,

        #[arg(long = "type", value_enum)]
        kind: IncidentArg,

        #[arg(long)]
        start: String,

        #[arg(long, default_value_t = 1)]
        duration: u32,

        #[arg(long)]
        json: bool,
    },

    /// Show the dates an existing incident occupies and the return date
    IncidentDates {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// Per-shift staffing against the configured minimums
    Risk {
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long)]
        week_start: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Write ~/.duty/config.toml with defaults
    InitConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShiftArg {
    Day,
    Night,
}

impl From<ShiftArg> for ShiftType {
    fn from(s: ShiftArg) -> Self {
        match s {
            ShiftArg::Day => ShiftType::Day,
            ShiftArg::Night => ShiftType::Night,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum IncidentArg {
    Tardanza,
    Ausencia,
    Error,
    Otro,
    Vacaciones,
    Licencia,
}

impl From<IncidentArg> for IncidentType {
    fn from(k: IncidentArg) -> Self {
        match k {
            IncidentArg::Tardanza => IncidentType::Tardanza,
            IncidentArg::Ausencia => IncidentType::Ausencia,
            IncidentArg::Error => IncidentType::Error,
            IncidentArg::Otro => IncidentType::Otro,
            IncidentArg::Vacaciones => IncidentType::Vacaciones,
            IncidentArg::Licencia => IncidentType::Licencia,
        }
    }
}

fn init_tracing(cfg: &config::Config) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_filter)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_tracing(&cfg);
    tracing::debug!(build = env!("DUTY_BUILD_SHA"), "duty starting");

    match cli.command {
        Command::PlanWeek {
            snapshot,
            week_start,
            json,
        } => {
            let file = state::load_snapshot(&snapshot)?;
            let start = resolve_week_start(week_start.as_deref(), &cfg)?;
            let plan = build_weekly_plan(&file.roster.snapshot(&file.calendar), start);
            if json {
                print_json(&render::PlanReport::new(&plan))?;
            } else {
                render::print_plan(&plan);
            }
        }

        Command::Resolve {
            snapshot,
            rep,
            date,
            shift,
            json,
        } => {
            let file = state::load_snapshot(&snapshot)?;
            let date = parse_date(&date)?;
            let snap = file.roster.snapshot(&file.calendar);
            if snap.representative(&rep).is_none() {
                tracing::warn!(representative_id = %rep, "unknown representative");
            }
            let res = resolve_effective_duty(&snap, &rep, date, shift.into());
            if json {
                print_json(&res)?;
            } else {
                render::print_duty(&rep, date, shift.into(), &res);
            }
        }

        Command::CheckIncident {
            snapshot,
            rep,
            kind,
            start,
            duration,
            json,
        } => {
            let file = state::load_snapshot(&snapshot)?;
            let representative = file
                .roster
                .representatives
                .iter()
                .find(|r| r.id == rep)
                .with_context(|| format!("unknown representative: {rep}"))?;
            let candidate = CandidateIncident {
                incident_type: kind.into(),
                start_date: parse_date(&start)?,
                duration,
            };
            let res = check_incident_conflicts(
                representative,
                candidate,
                &file.roster.incidents,
                &file.calendar,
            );
            if json {
                print_json(&res)?;
            } else if let Some(msg) = &res.message {
                println!("CONFLICT: {msg}");
            } else {
                println!("No conflict");
            }
        }

        Command::IncidentDates { snapshot, id, json } => {
            let file = state::load_snapshot(&snapshot)?;
            let incident = file
                .roster
                .incidents
                .iter()
                .find(|i| i.id == id)
                .with_context(|| format!("unknown incident: {id}"))?;
            let Some(rep) = file
                .roster
                .representatives
                .iter()
                .find(|r| r.id == incident.representative_id)
            else {
                bail!("incident {id} names unknown representative {}", incident.representative_id);
            };
            let span = resolve_incident_dates(incident, &file.calendar, rep);
            if json {
                print_json(&span)?;
            } else {
                render::print_span(incident, &span);
            }
        }

        Command::Risk {
            snapshot,
            week_start,
            json,
        } => {
            let file = state::load_snapshot(&snapshot)?;
            let start = resolve_week_start(week_start.as_deref(), &cfg)?;
            let plan = build_weekly_plan(&file.roster.snapshot(&file.calendar), start);
            let risk = coverage_risk(&plan, &StaffingThreshold::from(&cfg.staffing));
            if json {
                print_json(&risk)?;
            } else {
                render::print_risk(&risk);
            }
        }

        Command::InitConfig => {
            config::init_config()?;
        }
    }

    Ok(())
}

/// Monday of the given date's week, or of today in the configured timezone.
fn resolve_week_start(arg: Option<&str>, cfg: &config::Config) -> Result<NaiveDate> {
    let date = match arg {
        Some(s) => parse_date(s)?,
        None => Utc::now().with_timezone(&cfg.tz()?).date_naive(),
    };
    Ok(week_start_monday(date))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{s}");
    Ok(())
}
