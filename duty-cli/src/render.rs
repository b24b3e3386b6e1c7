use chrono::NaiveDate;
use duty_core::{
    Assignment, Badge, DayResolution, EffectiveDutyResult, Incident, ResolvedIncidentDates,
    ShiftRisk, ShiftType, SlotAccounting, WeekMetrics, WeeklyPlan,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// JSON shape of `plan-week --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport<'a> {
    pub plan: &'a WeeklyPlan,
    pub metrics: BTreeMap<&'a str, WeekMetrics>,
    pub slots: SlotAccounting,
}

impl<'a> PlanReport<'a> {
    pub fn new(plan: &'a WeeklyPlan) -> Self {
        Self {
            plan,
            metrics: plan
                .agents
                .iter()
                .map(|a| (a.representative_id.as_str(), a.metrics()))
                .collect(),
            slots: SlotAccounting::calculate(plan),
        }
    }
}

fn badge_mark(badge: Badge) -> &'static str {
    match badge {
        Badge::Vacaciones => "VAC",
        Badge::Licencia => "LIC",
        Badge::Ausencia => "AUS",
        Badge::Cubierto => "CUB",
        Badge::Cubriendo => "+C",
    }
}

/// One planner cell, e.g. `D`, `DN`, `N AUS`, `-`.
fn cell(day: &DayResolution) -> String {
    let shifts = match day.plan.assignment {
        Assignment::None => "-".to_string(),
        Assignment::Single(ShiftType::Day) => "D".to_string(),
        Assignment::Single(ShiftType::Night) => "N".to_string(),
        Assignment::Both => "DN".to_string(),
    };
    match day.computed.display.badge {
        Some(b) => format!("{shifts} {}", badge_mark(b)),
        None => shifts,
    }
}

pub fn print_plan(plan: &WeeklyPlan) {
    let dates = plan.dates();
    println!("# Week of {}\n", plan.week_start);

    print!("{:<16}", "");
    for d in &dates {
        print!("{:<9}", d.format("%a %d"));
    }
    println!("{:>6}{:>6}{:>6}", "plan", "work", "abs");

    for agent in &plan.agents {
        print!("{:<16}", truncate(&agent.name, 15));
        for d in &dates {
            let c = agent.days.get(d).map(cell).unwrap_or_default();
            print!("{:<9}", c);
        }
        let m = agent.metrics();
        let flag = if m.incentives.eligible { "" } else { " !" };
        println!(
            "{:>6}{:>6}{:>6}{}",
            m.planned_days, m.worked_days, m.absent_days, flag
        );
    }

    let s = SlotAccounting::calculate(plan);
    println!(
        "\nSlots: planned={} executed={} absence={} covered={} uncovered={}",
        s.planned_slots, s.executed_slots, s.absence_slots, s.covered_slots, s.uncovered_slots
    );
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max.saturating_sub(1)).chain(std::iter::once('~')).collect()
    }
}

pub fn print_duty(rep: &str, date: NaiveDate, shift: ShiftType, res: &EffectiveDutyResult) {
    println!(
        "{rep} {date} {}: {:?} (works: {})",
        shift.as_str(),
        res.role,
        if res.should_work { "yes" } else { "no" }
    );
    if let Some(src) = res.source {
        println!("  source: {src:?}");
    }
    if let Some(reason) = res.reason {
        println!("  reason: {}", reason.as_str());
    }
    if let Some(details) = &res.details {
        println!("  details: {details}");
    }
    if let Some(note) = &res.note {
        println!("  note: {note}");
    }
}

pub fn print_span(incident: &Incident, span: &ResolvedIncidentDates) {
    println!(
        "{} {} for {}: {} day(s)",
        incident.id,
        incident.incident_type.as_str(),
        incident.representative_id,
        span.dates.len()
    );
    for d in &span.dates {
        println!("  {d}");
    }
    match span.return_date {
        Some(r) => println!("returns {r}"),
        None => println!("no return date inside the calendar"),
    }
}

pub fn print_risk(risk: &[ShiftRisk]) {
    if risk.is_empty() {
        println!("No operational days this week");
        return;
    }
    println!("{:<12}{:<7}{:>8}{:>8}{:>8}", "date", "shift", "planned", "present", "deficit");
    for r in risk {
        println!(
            "{:<12}{:<7}{:>8}{:>8}{:>8}{}",
            r.date.to_string(),
            r.shift.as_str(),
            r.planned,
            r.present,
            r.deficit,
            if r.at_risk { "  AT RISK" } else { "" }
        );
    }
}
