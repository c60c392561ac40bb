//! Operations layer
//!
//! The surface the CLI and other front ends call. Every operation returns an
//! [`Outcome`] envelope: a pre-formatted `message` for humans and an optional
//! `data` payload for programmatic consumers. Domain failures - unknown ids,
//! invalid enum values, double completion - are failure envelopes; only a
//! [`StoreError`](crate::store::StoreError) propagates as a hard error.

use serde::Serialize;
use serde_json::json;

use crate::config::{Config, AVOIDANCE_ROLL_THRESHOLD};
use crate::energy::EnergyLog;
use crate::journal::Journal;
use crate::patterns::Analyzer;
use crate::sessions::Sessions;
use crate::sprint::SprintTracker;
use crate::store::{Result, Store};
use crate::tasks::TaskRegistry;
use crate::types::{
    EnergyLevel, SessionType, SprintHealth, Task, TaskPriority,
};

/// Result envelope returned by every operation.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

// ============================================================================
// Task Operations
// ============================================================================

/// Add a new task.
pub fn add_task(
    store: &Store,
    config: &Config,
    content: &str,
    priority: &str,
    note: Option<&str>,
) -> Result<Outcome> {
    let priority: TaskPriority = match priority.parse() {
        Ok(p) => p,
        Err(e) => return Ok(Outcome::failure(e.to_string())),
    };

    let notes = note.map(|n| vec![n.to_string()]).unwrap_or_default();
    let task = TaskRegistry::new(store).add(content, priority, notes)?;
    let category = config.category_name(priority);

    Ok(Outcome::ok_with(
        format!("Task added to {}: \"{}\"", category, content),
        json!({
            "task_id": task.id,
            "priority": priority.as_str(),
            "category": category,
        }),
    ))
}

/// Complete a task by id or content match. Rejects double completion.
pub fn complete_task(store: &Store, config: &Config, identifier: &str) -> Result<Outcome> {
    let registry = TaskRegistry::new(store);

    let task = match registry.find(identifier)? {
        Some(task) => task,
        None => {
            return Ok(Outcome::failure(format!(
                "Task not found: \"{}\"",
                identifier
            )))
        }
    };

    if task.completed_at.is_some() {
        return Ok(Outcome::failure(format!(
            "Task already completed: \"{}\"",
            task.content
        )));
    }

    let completed = registry
        .complete(&task.id)?
        .expect("task resolved just above");
    Journal::new(store, config).record_completion(&task.id)?;

    Ok(Outcome::ok_with(
        format!("Completed: \"{}\"", task.content),
        json!({
            "task_id": task.id,
            "completed_at": completed.completed_at,
        }),
    ))
}

/// Roll a task forward into the next day.
pub fn roll_task(store: &Store, config: &Config, identifier: &str) -> Result<Outcome> {
    let registry = TaskRegistry::new(store);

    let task = match registry.find(identifier)? {
        Some(task) => task,
        None => {
            return Ok(Outcome::failure(format!(
                "Task not found: \"{}\"",
                identifier
            )))
        }
    };

    let updated = registry
        .roll_forward(&task.id)?
        .expect("task resolved just above");
    Journal::new(store, config).record_roll(&task.id)?;

    let is_avoided = updated.roll_forward_count >= AVOIDANCE_ROLL_THRESHOLD;
    let message = if is_avoided {
        format!(
            "AVOIDANCE PATTERN: \"{}\" has been rolled forward {} times",
            task.content, updated.roll_forward_count
        )
    } else {
        format!(
            "Rolled forward: \"{}\" ({}x)",
            task.content, updated.roll_forward_count
        )
    };

    Ok(Outcome::ok_with(
        message,
        json!({
            "task_id": task.id,
            "roll_count": updated.roll_forward_count,
            "is_avoidance_pattern": is_avoided,
        }),
    ))
}

fn format_task_line(task: &Task) -> String {
    if task.roll_forward_count > 0 {
        format!(
            "- {} [rolled {}x]",
            task.content, task.roll_forward_count
        )
    } else {
        format!("- {}", task.content)
    }
}

/// List active tasks, grouped by category display name.
pub fn list_tasks(store: &Store, config: &Config, priority: Option<&str>) -> Result<Outcome> {
    let filter = match priority {
        Some(raw) => match raw.parse::<TaskPriority>() {
            Ok(p) => Some(p),
            Err(e) => return Ok(Outcome::failure(e.to_string())),
        },
        None => None,
    };

    let tasks = TaskRegistry::new(store).list(filter, true)?;

    let message = match filter {
        Some(p) => {
            let lines: Vec<String> = tasks.iter().map(format_task_line).collect();
            let body = if lines.is_empty() {
                "No tasks".to_string()
            } else {
                lines.join("\n")
            };
            format!("{}:\n{}", config.category_name(p), body)
        }
        None => {
            let mut sections = Vec::new();
            for p in TaskPriority::ALL {
                let group: Vec<String> = tasks
                    .iter()
                    .filter(|t| t.priority == p)
                    .map(format_task_line)
                    .collect();
                if !group.is_empty() {
                    sections.push(format!("{}:\n{}", config.category_name(p), group.join("\n")));
                }
            }
            if sections.is_empty() {
                "No active tasks".to_string()
            } else {
                sections.join("\n\n")
            }
        }
    };

    let count = tasks.len();
    Ok(Outcome::ok_with(
        message,
        json!({ "tasks": tasks, "count": count }),
    ))
}

/// Tasks showing avoidance patterns, most-rolled first.
pub fn avoided_tasks(store: &Store, config: &Config) -> Result<Outcome> {
    let mut avoided = TaskRegistry::new(store).avoided(AVOIDANCE_ROLL_THRESHOLD)?;

    if avoided.is_empty() {
        return Ok(Outcome::ok_with(
            "No avoidance patterns detected. Great job staying on top of tasks!",
            json!({ "tasks": [], "count": 0 }),
        ));
    }

    avoided.sort_by(|a, b| b.roll_forward_count.cmp(&a.roll_forward_count));
    let lines: Vec<String> = avoided
        .iter()
        .map(|t| {
            format!(
                "- \"{}\" - rolled {}x ({})",
                t.content,
                t.roll_forward_count,
                config.category_name(t.priority)
            )
        })
        .collect();

    let count = avoided.len();
    Ok(Outcome::ok_with(
        format!("Avoidance patterns detected:\n{}", lines.join("\n")),
        json!({ "tasks": avoided, "count": count }),
    ))
}

// ============================================================================
// Energy Operations
// ============================================================================

fn energy_recommendation(level: EnergyLevel) -> &'static str {
    match level {
        EnergyLevel::High => "Perfect time for deep work!",
        EnergyLevel::Medium => "Good for standard tasks.",
        EnergyLevel::Low => "Focus on light tasks or take a break.",
        EnergyLevel::Depleted => "Consider stopping for today. Rest is productive.",
        EnergyLevel::Recovery => "Take it easy. Gentle tasks only.",
    }
}

/// Log an energy reading.
pub fn log_energy(
    store: &Store,
    config: &Config,
    level: &str,
    context: Option<&str>,
) -> Result<Outcome> {
    let level: EnergyLevel = match level.parse() {
        Ok(l) => l,
        Err(e) => return Ok(Outcome::failure(e.to_string())),
    };

    let reading = EnergyLog::new(store, config).log(level, context.map(str::to_string))?;
    let sprint = SprintTracker::new(store, config).status()?;

    let mut recommendation = energy_recommendation(level).to_string();
    if sprint.status == SprintHealth::Danger {
        recommendation.push_str(&format!(
            " Sprint day {} - consider a rest day soon.",
            sprint.current_day
        ));
    }

    Ok(Outcome::ok_with(
        format!("Energy logged: {}. {}", level, recommendation),
        json!({
            "reading": reading,
            "sprint_day": sprint.current_day,
            "sprint_status": sprint.status.as_str(),
        }),
    ))
}

// ============================================================================
// Sprint & Session Operations
// ============================================================================

/// Current sprint status.
pub fn sprint_status(store: &Store, config: &Config) -> Result<Outcome> {
    let sprint = SprintTracker::new(store, config).status()?;

    let mut message = format!("Sprint Day {}", sprint.current_day);
    match sprint.status {
        SprintHealth::Danger => {
            message.push_str(&format!(
                " - DANGER: you've worked {} consecutive days. Take a rest day!",
                sprint.current_day
            ));
        }
        SprintHealth::Warning => {
            let until_danger = config.sprint.danger_day.saturating_sub(sprint.current_day);
            message.push_str(&format!(
                " - warning: rest day recommended within {} days",
                until_danger
            ));
        }
        SprintHealth::Healthy => {
            message.push_str(&format!(
                " - healthy sprint (warning at day {})",
                config.sprint.warning_day
            ));
        }
    }

    if let Some(rest) = sprint.last_rest_day {
        message.push_str(&format!("\nLast rest day: {}", rest));
    }

    let data = serde_json::to_value(&sprint)?;
    Ok(Outcome::ok_with(message, data))
}

/// Record a rest day and reset the sprint counter.
pub fn record_rest_day(store: &Store, config: &Config) -> Result<Outcome> {
    SprintTracker::new(store, config).record_rest_day()?;
    Ok(Outcome::ok_with(
        "Rest day recorded. Sprint counter reset. Enjoy your recovery!",
        json!({
            "rest_day": chrono::Local::now().date_naive(),
        }),
    ))
}

/// Start a productivity session.
pub fn start_session(
    store: &Store,
    session_type: &str,
    context: Option<serde_json::Value>,
) -> Result<Outcome> {
    let session_type: SessionType = match session_type.parse() {
        Ok(t) => t,
        Err(e) => return Ok(Outcome::failure(e.to_string())),
    };

    let session = Sessions::new(store).start(session_type, context)?;
    Ok(Outcome::ok_with(
        format!("Session started: {}", session_type),
        json!({
            "session_id": session.id,
            "started_at": session.started_at,
        }),
    ))
}

/// End the current session.
pub fn end_session(store: &Store) -> Result<Outcome> {
    Sessions::new(store).end()?;
    Ok(Outcome::ok("Session ended."))
}

/// Add a field report (quick capture) to today's entry.
pub fn add_field_report(store: &Store, config: &Config, report: &str) -> Result<Outcome> {
    Journal::new(store, config).add_field_report(report)?;
    Ok(Outcome::ok_with(
        format!("Field report logged: \"{}\"", report),
        json!({
            "timestamp": chrono::Local::now().format("%H:%M").to_string(),
        }),
    ))
}

// ============================================================================
// Analysis Operations
// ============================================================================

/// Full pattern analysis: avoidance, trends, completion rate, burnout.
pub fn pattern_analysis(store: &Store, config: &Config) -> Result<Outcome> {
    let analysis = Analyzer::new(store, config).run()?;

    let mut lines = vec!["Pattern Analysis".to_string(), String::new()];

    if !analysis.avoidance_patterns.is_empty() {
        lines.push("Avoidance patterns:".to_string());
        for p in &analysis.avoidance_patterns {
            lines.push(format!(
                "- \"{}\" - {}x rolls ({})",
                p.task_content,
                p.roll_count,
                config.category_name(p.category)
            ));
        }
        lines.push(String::new());
    }

    lines.push("Energy trends (7 days):".to_string());
    for t in &analysis.energy_trends {
        let bar = "#".repeat(t.average_level.round() as usize);
        lines.push(format!(
            "- {}: {} {:.1}/5 ({} readings)",
            t.period, bar, t.average_level, t.sample_count
        ));
    }
    lines.push(String::new());

    lines.push(format!(
        "Completion rate: {:.0}%",
        analysis.completion_rate * 100.0
    ));
    lines.push(format!("Burnout risk: {}", analysis.burnout_risk));

    let data = serde_json::to_value(&analysis)?;
    Ok(Outcome::ok_with(lines.join("\n"), data))
}

/// Overall data summary.
pub fn summary(store: &Store, config: &Config) -> Result<Outcome> {
    let pool = store.load_tasks()?;
    let daily = store.load_daily()?;
    let sprint = SprintTracker::new(store, config).status()?;
    let analysis = Analyzer::new(store, config).run()?;
    let today = Journal::new(store, config).today()?;

    let active = pool.tasks.iter().filter(|t| t.is_active()).count();
    let completed = pool.tasks.len() - active;

    let mut lines = vec![
        "Tally Status".to_string(),
        String::new(),
        format!("Sprint: Day {} ({})", sprint.current_day, sprint.status),
        format!("Active tasks: {}", active),
        format!("Completed today: {}", today.tasks_completed.len()),
        format!("Rolled today: {}", today.tasks_rolled_forward.len()),
        format!(
            "7-day completion: {:.1}%",
            analysis.completion_rate * 100.0
        ),
        format!("Burnout risk: {}", analysis.burnout_risk),
    ];

    let avoided = analysis.avoidance_patterns.len();
    if avoided > 0 {
        lines.push(String::new());
        lines.push(format!("{} task(s) showing avoidance patterns", avoided));
    }

    Ok(Outcome::ok_with(
        lines.join("\n"),
        json!({
            "total_tasks": pool.tasks.len(),
            "active_tasks": active,
            "completed_tasks": completed,
            "avoided_tasks": avoided,
            "daily_entries": daily.entries.len(),
            "sprint_day": sprint.current_day,
            "sprint_status": sprint.status.as_str(),
            "burnout_risk": analysis.burnout_risk.as_str(),
            "completion_rate": format!("{:.1}%", analysis.completion_rate * 100.0),
        }),
    ))
}

// ============================================================================
// Configuration Operations
// ============================================================================

/// Show the current configuration.
pub fn show_config(config: &Config) -> Result<Outcome> {
    let data = serde_json::to_value(config)?;
    let message = format!(
        "Sprint thresholds: warning day {}, danger day {}\nPeak windows: {}",
        config.sprint.warning_day,
        config.sprint.danger_day,
        config
            .energy_windows
            .iter()
            .map(|w| {
                let label = w.label.as_deref().unwrap_or("unnamed");
                format!("{}-{} ({})", w.start, w.end, label)
            })
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(Outcome::ok_with(message, data))
}

/// Update the sprint thresholds.
pub fn set_sprint_thresholds(
    store: &Store,
    config: &mut Config,
    warning_day: u32,
    danger_day: u32,
) -> Result<Outcome> {
    if warning_day == 0 || danger_day == 0 {
        return Ok(Outcome::failure("Sprint thresholds must be at least 1"));
    }
    if danger_day <= warning_day {
        return Ok(Outcome::failure(format!(
            "Danger day ({}) must come after warning day ({})",
            danger_day, warning_day
        )));
    }

    config.sprint.warning_day = warning_day;
    config.sprint.danger_day = danger_day;
    store.save_config(config)?;

    Ok(Outcome::ok_with(
        format!(
            "Sprint thresholds updated: warning day {}, danger day {}",
            warning_day, danger_day
        ),
        json!({ "warning_day": warning_day, "danger_day": danger_day }),
    ))
}

/// Reset configuration to defaults.
pub fn reset_config(store: &Store, config: &mut Config) -> Result<Outcome> {
    *config = Config::default();
    store.save_config(config)?;
    Ok(Outcome::ok("Configuration reset to defaults."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open_at(dir.path().join("tally.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_add_task_rejects_unknown_priority() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        let outcome = add_task(&store, &config, "Write report", "urgent", None).unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.contains("deep, standard, light, someday"));
    }

    #[test]
    fn test_complete_rejects_double_completion() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        add_task(&store, &config, "Write report", "deep", None).unwrap();

        let first = complete_task(&store, &config, "write report").unwrap();
        assert!(first.success);

        let second = complete_task(&store, &config, "write report").unwrap();
        assert!(!second.success);
        assert!(second.message.contains("already completed"));
    }

    #[test]
    fn test_complete_unknown_task() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        let outcome = complete_task(&store, &config, "ghost").unwrap();
        assert!(!outcome.success);
        assert!(outcome.message.contains("not found"));
    }

    #[test]
    fn test_roll_flags_avoidance_at_threshold() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        add_task(&store, &config, "Write report", "deep", None).unwrap();

        let first = roll_task(&store, &config, "Write report").unwrap();
        assert!(first.message.starts_with("Rolled forward"));

        roll_task(&store, &config, "Write report").unwrap();
        let third = roll_task(&store, &config, "Write report").unwrap();
        assert!(third.message.starts_with("AVOIDANCE PATTERN"));
        assert_eq!(third.data.unwrap()["is_avoidance_pattern"], true);
    }

    #[test]
    fn test_rolls_feed_avoided_and_first_rolled() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        add_task(&store, &config, "Write report", "deep", None).unwrap();
        for _ in 0..3 {
            roll_task(&store, &config, "Write report").unwrap();
        }

        let analysis = Analyzer::new(&store, &config).run().unwrap();
        assert_eq!(analysis.avoidance_patterns.len(), 1);
        let pattern = &analysis.avoidance_patterns[0];
        assert_eq!(pattern.roll_count, 3);
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        assert_eq!(pattern.first_rolled, today);

        let outcome = avoided_tasks(&store, &config).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.data.unwrap()["count"], 1);
    }

    #[test]
    fn test_log_energy_validation_and_payload() {
        let (_dir, store) = temp_store();
        let config = Config::default();

        let bad = log_energy(&store, &config, "caffeinated", None).unwrap();
        assert!(!bad.success);
        assert!(bad.message.contains("high, medium, low, depleted, recovery"));

        let good = log_energy(&store, &config, "high", Some("morning run")).unwrap();
        assert!(good.success);
        assert!(good.message.contains("deep work"));
        assert_eq!(good.data.unwrap()["sprint_day"], 1);
    }

    #[test]
    fn test_session_lifecycle() {
        let (_dir, store) = temp_store();

        let bad = start_session(&store, "party", None).unwrap();
        assert!(!bad.success);

        let started = start_session(&store, "briefing", None).unwrap();
        assert!(started.success);
        assert!(end_session(&store).unwrap().success);
        assert!(Sessions::new(&store).current().unwrap().is_none());
    }

    #[test]
    fn test_summary_counts() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        add_task(&store, &config, "One", "standard", None).unwrap();
        add_task(&store, &config, "Two", "light", None).unwrap();
        complete_task(&store, &config, "One").unwrap();

        let outcome = summary(&store, &config).unwrap();
        assert!(outcome.success);
        let data = outcome.data.unwrap();
        assert_eq!(data["total_tasks"], 2);
        assert_eq!(data["active_tasks"], 1);
        assert_eq!(data["completed_tasks"], 1);
    }

    #[test]
    fn test_sprint_threshold_update_validation() {
        let (_dir, store) = temp_store();
        let mut config = Config::default();

        let bad = set_sprint_thresholds(&store, &mut config, 10, 5).unwrap();
        assert!(!bad.success);
        assert_eq!(config.sprint.warning_day, 14);

        let good = set_sprint_thresholds(&store, &mut config, 10, 15).unwrap();
        assert!(good.success);
        let stored = store.load_config().unwrap();
        assert_eq!(stored.sprint.warning_day, 10);
        assert_eq!(stored.sprint.danger_day, 15);
    }
}
