//! Core record types for the productivity tracker
//!
//! Everything that is persisted or derived lives here: tasks, daily entries,
//! energy readings, sprint state, sessions, and the pattern-analysis results.
//! Closed string enums are parsed at the boundary; an unknown value is a
//! [`ParseEnumError`] listing the accepted options, never a silent fallback.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generate a unique record id: unix-seconds prefix plus an 8-hex random
/// suffix, so ids sort chronologically.
pub fn generate_id() -> String {
    let secs = Local::now().timestamp();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", secs, &suffix[..8])
}

// ============================================================================
// Closed string enums
// ============================================================================

/// Error from parsing a closed string enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    /// What was being parsed ("priority", "energy level", ...).
    pub what: &'static str,
    /// The rejected input.
    pub value: String,
    /// The accepted values.
    pub options: &'static [&'static str],
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {}: {}. Choose from: {}",
            self.what,
            self.value,
            self.options.join(", ")
        )
    }
}

impl std::error::Error for ParseEnumError {}

/// Task priority, by cognitive energy required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Deep,
    Standard,
    Light,
    Someday,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Deep,
        TaskPriority::Standard,
        TaskPriority::Light,
        TaskPriority::Someday,
    ];

    const NAMES: &'static [&'static str] = &["deep", "standard", "light", "someday"];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Deep => "deep",
            TaskPriority::Standard => "standard",
            TaskPriority::Light => "light",
            TaskPriority::Someday => "someday",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deep" => Ok(TaskPriority::Deep),
            "standard" => Ok(TaskPriority::Standard),
            "light" => Ok(TaskPriority::Light),
            "someday" => Ok(TaskPriority::Someday),
            _ => Err(ParseEnumError {
                what: "priority",
                value: s.to_string(),
                options: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Energy level for a logged reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
    Depleted,
    Recovery,
}

impl EnergyLevel {
    const NAMES: &'static [&'static str] = &["high", "medium", "low", "depleted", "recovery"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevel::High => "high",
            EnergyLevel::Medium => "medium",
            EnergyLevel::Low => "low",
            EnergyLevel::Depleted => "depleted",
            EnergyLevel::Recovery => "recovery",
        }
    }

    /// Ordinal weight used for averaging readings.
    pub fn weight(&self) -> f64 {
        match self {
            EnergyLevel::High => 5.0,
            EnergyLevel::Medium => 4.0,
            EnergyLevel::Low => 3.0,
            EnergyLevel::Depleted => 2.0,
            EnergyLevel::Recovery => 1.0,
        }
    }
}

impl FromStr for EnergyLevel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(EnergyLevel::High),
            "medium" => Ok(EnergyLevel::Medium),
            "low" => Ok(EnergyLevel::Low),
            "depleted" => Ok(EnergyLevel::Depleted),
            "recovery" => Ok(EnergyLevel::Recovery),
            _ => Err(ParseEnumError {
                what: "energy level",
                value: s.to_string(),
                options: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sprint health, classified against the configured warning/danger days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintHealth {
    Healthy,
    Warning,
    Danger,
}

impl SprintHealth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SprintHealth::Healthy => "healthy",
            SprintHealth::Warning => "warning",
            SprintHealth::Danger => "danger",
        }
    }
}

impl fmt::Display for SprintHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Burnout risk tier derived from sprint health and recent energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnoutRisk {
    Low,
    Medium,
    High,
}

impl BurnoutRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            BurnoutRisk::Low => "low",
            BurnoutRisk::Medium => "medium",
            BurnoutRisk::High => "high",
        }
    }
}

impl fmt::Display for BurnoutRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of productivity session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Briefing,
    Card,
    Energy,
    Accountability,
    General,
}

impl SessionType {
    const NAMES: &'static [&'static str] =
        &["briefing", "card", "energy", "accountability", "general"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Briefing => "briefing",
            SessionType::Card => "card",
            SessionType::Energy => "energy",
            SessionType::Accountability => "accountability",
            SessionType::General => "general",
        }
    }
}

impl FromStr for SessionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "briefing" => Ok(SessionType::Briefing),
            "card" => Ok(SessionType::Card),
            "energy" => Ok(SessionType::Energy),
            "accountability" => Ok(SessionType::Accountability),
            "general" => Ok(SessionType::General),
            _ => Err(ParseEnumError {
                what: "session type",
                value: s.to_string(),
                options: Self::NAMES,
            }),
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Persisted records
// ============================================================================

/// A single task from the card pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    pub priority: TaskPriority,
    pub created_at: DateTime<Local>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub roll_forward_count: u32,
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.completed_at.is_none()
    }
}

/// The stored task collection: ordered tasks plus a last-updated stamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPool {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Local>>,
}

/// One energy reading. Immutable once logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyReading {
    pub timestamp: DateTime<Local>,
    pub level: EnergyLevel,
    #[serde(default)]
    pub context: Option<String>,
}

/// One day's record: energy readings, task activity, field reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub sprint_day: u32,
    #[serde(default)]
    pub energy_readings: Vec<EnergyReading>,
    #[serde(default)]
    pub tasks_completed: Vec<String>,
    #[serde(default)]
    pub tasks_rolled_forward: Vec<String>,
    #[serde(default)]
    pub field_reports: Vec<String>,
    #[serde(default)]
    pub briefing: Option<String>,
}

impl DailyEntry {
    pub fn new(date: NaiveDate, sprint_day: u32) -> Self {
        Self {
            date,
            sprint_day,
            energy_readings: Vec::new(),
            tasks_completed: Vec::new(),
            tasks_rolled_forward: Vec::new(),
            field_reports: Vec::new(),
            briefing: None,
        }
    }
}

/// The stored daily journal: one entry per calendar date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyLog {
    #[serde(default)]
    pub entries: std::collections::BTreeMap<NaiveDate, DailyEntry>,
}

/// Persisted sprint counter state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintState {
    pub current_day: u32,
    pub start_date: NaiveDate,
    pub last_work_day: NaiveDate,
    #[serde(default)]
    pub rest_days: Vec<NaiveDate>,
}

impl SprintState {
    /// Fresh state for a sprint starting on `date`.
    pub fn starting(date: NaiveDate) -> Self {
        Self {
            current_day: 1,
            start_date: date,
            last_work_day: date,
            rest_days: Vec::new(),
        }
    }
}

/// Derived sprint status returned by the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintStatus {
    pub current_day: u32,
    pub start_date: NaiveDate,
    pub status: SprintHealth,
    #[serde(default)]
    pub last_rest_day: Option<NaiveDate>,
}

/// A productivity session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub started_at: DateTime<Local>,
    pub last_activity: DateTime<Local>,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// The stored session record: append-only history plus at most one current.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionLog {
    #[serde(default)]
    pub history: Vec<Session>,
    #[serde(default)]
    pub current_session: Option<Session>,
}

// ============================================================================
// Derived analysis (never persisted)
// ============================================================================

/// A task rolled forward at or beyond the avoidance threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvoidancePattern {
    pub task_id: String,
    pub task_content: String,
    pub roll_count: u32,
    /// Date of the first roll, or the creation timestamp if no notes exist.
    pub first_rolled: String,
    pub category: TaskPriority,
}

/// Average energy over one period of the day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyTrend {
    pub period: String,
    pub average_level: f64,
    pub sample_count: usize,
}

/// Active task counts per priority.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CategoryBalance {
    pub deep: usize,
    pub standard: usize,
    pub light: usize,
    pub someday: usize,
}

/// Full pattern-analysis result. Recomputed on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternAnalysis {
    pub avoidance_patterns: Vec<AvoidancePattern>,
    pub energy_trends: Vec<EnergyTrend>,
    pub completion_rate: f64,
    pub category_balance: CategoryBalance,
    pub burnout_risk: BurnoutRisk,
}
