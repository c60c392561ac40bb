//! Pattern analysis
//!
//! Derives the actionable signals - avoidance patterns, energy trends,
//! completion rate, category balance, burnout risk - from the current task
//! pool, journal history, and sprint status. [`analyze`] is a pure function
//! over a snapshot so it can be tested on hand-built fixtures; [`Analyzer`]
//! loads the snapshot from the store. Nothing here is ever persisted, so
//! results can never go stale.

use chrono::{Local, NaiveDate};

use crate::config::{Config, AVOIDANCE_ROLL_THRESHOLD};
use crate::energy::{average_energy, cutoff, energy_trends, readings_since};
use crate::sprint::SprintTracker;
use crate::store::{Result, Store};
use crate::types::{
    AvoidancePattern, BurnoutRisk, CategoryBalance, DailyLog, PatternAnalysis, SprintHealth,
    SprintStatus, Task, TaskPriority,
};

/// Trailing window, in days, for completion rate and energy averages.
const ANALYSIS_WINDOW_DAYS: u64 = 7;

/// Note prefix written by the roll-forward operation.
const ROLL_NOTE_PREFIX: &str = "Rolled forward on ";

/// Store-backed analysis entry point.
pub struct Analyzer<'a> {
    store: &'a Store,
    config: &'a Config,
}

impl<'a> Analyzer<'a> {
    pub fn new(store: &'a Store, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Analyze the current records.
    pub fn run(&self) -> Result<PatternAnalysis> {
        self.run_on(Local::now().date_naive())
    }

    /// Analyze as of a specific date.
    pub fn run_on(&self, today: NaiveDate) -> Result<PatternAnalysis> {
        let pool = self.store.load_tasks()?;
        let daily = self.store.load_daily()?;
        let sprint = SprintTracker::new(self.store, self.config).status_on(today)?;
        Ok(analyze(&pool.tasks, &daily, &sprint, today))
    }
}

/// Pure analysis over a snapshot of the records.
pub fn analyze(
    tasks: &[Task],
    daily: &DailyLog,
    sprint: &SprintStatus,
    today: NaiveDate,
) -> PatternAnalysis {
    let since = cutoff(today, ANALYSIS_WINDOW_DAYS);
    let recent = readings_since(daily, since);

    PatternAnalysis {
        avoidance_patterns: avoidance_patterns(tasks),
        energy_trends: energy_trends(&recent),
        completion_rate: completion_rate(daily, since),
        category_balance: category_balance(tasks),
        burnout_risk: burnout_risk(sprint.status, average_energy(&recent)),
    }
}

/// Active tasks rolled forward at or beyond the threshold.
fn avoidance_patterns(tasks: &[Task]) -> Vec<AvoidancePattern> {
    tasks
        .iter()
        .filter(|t| t.is_active() && t.roll_forward_count >= AVOIDANCE_ROLL_THRESHOLD)
        .map(|t| AvoidancePattern {
            task_id: t.id.clone(),
            task_content: t.content.clone(),
            roll_count: t.roll_forward_count,
            first_rolled: first_rolled(t),
            category: t.priority,
        })
        .collect()
}

/// Date of the first roll: the first stored note with the roll prefix
/// stripped, falling back to the creation timestamp.
fn first_rolled(task: &Task) -> String {
    match task.notes.first() {
        Some(note) => note.strip_prefix(ROLL_NOTE_PREFIX).unwrap_or(note).to_string(),
        None => task.created_at.to_rfc3339(),
    }
}

/// Completions over completions-plus-rolls across the trailing window.
/// `0.0` when there was no task activity at all.
fn completion_rate(daily: &DailyLog, since: NaiveDate) -> f64 {
    let mut completed = 0usize;
    let mut rolled = 0usize;
    for (date, entry) in &daily.entries {
        if *date >= since {
            completed += entry.tasks_completed.len();
            rolled += entry.tasks_rolled_forward.len();
        }
    }

    let total = completed + rolled;
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    }
}

/// Active task counts per priority.
fn category_balance(tasks: &[Task]) -> CategoryBalance {
    let mut balance = CategoryBalance::default();
    for task in tasks.iter().filter(|t| t.is_active()) {
        match task.priority {
            TaskPriority::Deep => balance.deep += 1,
            TaskPriority::Standard => balance.standard += 1,
            TaskPriority::Light => balance.light += 1,
            TaskPriority::Someday => balance.someday += 1,
        }
    }
    balance
}

/// Three-tier burnout classification. The sprint check and the energy
/// threshold are OR'd at each tier, so a danger-level sprint reads HIGH
/// no matter how good the energy looks. No readings averages to 0.0 and
/// therefore also reads HIGH.
fn burnout_risk(sprint: SprintHealth, avg_energy: f64) -> BurnoutRisk {
    if sprint == SprintHealth::Danger || avg_energy < 2.5 {
        BurnoutRisk::High
    } else if sprint == SprintHealth::Warning || avg_energy < 3.5 {
        BurnoutRisk::Medium
    } else {
        BurnoutRisk::Low
    }
}
