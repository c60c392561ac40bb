//! Configuration for tally
//!
//! One record in the store holds the whole tree: sprint thresholds, peak
//! energy windows, display names, coaching voices, module flags, and system
//! settings. Loaded once per process and threaded into each component -
//! there is no ambient global. Missing or unreadable stored config falls
//! back to defaults.

use serde::{Deserialize, Serialize};

use crate::types::TaskPriority;

/// Roll-forward count at which a task counts as avoided.
pub const AVOIDANCE_ROLL_THRESHOLD: u32 = 3;

/// Complete configuration tree.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    /// Display names for the three core documents
    #[serde(default)]
    pub documents: DocumentNames,

    /// Peak productivity hour ranges
    #[serde(default = "default_energy_windows")]
    pub energy_windows: Vec<EnergyWindow>,

    /// Display names for task categories
    #[serde(default)]
    pub categories: CategoryNames,

    /// Sprint thresholds for burnout detection
    #[serde(default)]
    pub sprint: SprintThresholds,

    /// Coaching persona labels, passed through to the NLG collaborator
    #[serde(default)]
    pub voices: CoachingVoices,

    /// Optional module flags
    #[serde(default)]
    pub modules: ModuleSettings,

    /// System path/timezone settings
    #[serde(default)]
    pub system: SystemSettings,
}

/// A peak productivity time window (start ≤ hour < end).
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EnergyWindow {
    pub start: u32,
    pub end: u32,
    #[serde(default)]
    pub label: Option<String>,
}

fn default_energy_windows() -> Vec<EnergyWindow> {
    vec![
        EnergyWindow {
            start: 9,
            end: 13,
            label: Some("Morning Focus".to_string()),
        },
        EnergyWindow {
            start: 15,
            end: 18,
            label: Some("Afternoon Drive".to_string()),
        },
        EnergyWindow {
            start: 20,
            end: 22,
            label: Some("Evening Flow".to_string()),
        },
    ]
}

/// Display names for the three core documents.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DocumentNames {
    #[serde(default = "default_daily_doc")]
    pub daily: String,
    #[serde(default = "default_tasks_doc")]
    pub tasks: String,
    #[serde(default = "default_journey_doc")]
    pub journey: String,
}

fn default_daily_doc() -> String {
    "The Watchtower".to_string()
}

fn default_tasks_doc() -> String {
    "The Forge".to_string()
}

fn default_journey_doc() -> String {
    "The Long Road".to_string()
}

impl Default for DocumentNames {
    fn default() -> Self {
        Self {
            daily: default_daily_doc(),
            tasks: default_tasks_doc(),
            journey: default_journey_doc(),
        }
    }
}

/// Display names for task categories.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CategoryNames {
    #[serde(default = "default_deep_name")]
    pub deep: String,
    #[serde(default = "default_standard_name")]
    pub standard: String,
    #[serde(default = "default_light_name")]
    pub light: String,
    #[serde(default = "default_someday_name")]
    pub someday: String,
}

fn default_deep_name() -> String {
    "Deep Work Forging".to_string()
}

fn default_standard_name() -> String {
    "Standard Forge Work".to_string()
}

fn default_light_name() -> String {
    "Light Smithing".to_string()
}

fn default_someday_name() -> String {
    "The Anvil Awaits".to_string()
}

impl Default for CategoryNames {
    fn default() -> Self {
        Self {
            deep: default_deep_name(),
            standard: default_standard_name(),
            light: default_light_name(),
            someday: default_someday_name(),
        }
    }
}

/// Sprint day thresholds.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SprintThresholds {
    /// Consecutive work days before the sprint reads as a warning
    #[serde(default = "default_warning_day")]
    pub warning_day: u32,
    /// Consecutive work days before the sprint reads as danger
    #[serde(default = "default_danger_day")]
    pub danger_day: u32,
}

fn default_warning_day() -> u32 {
    14
}

fn default_danger_day() -> u32 {
    21
}

impl Default for SprintThresholds {
    fn default() -> Self {
        Self {
            warning_day: default_warning_day(),
            danger_day: default_danger_day(),
        }
    }
}

/// Archetypal coaching persona labels. Opaque to the engine.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoachingVoices {
    #[serde(default = "default_discipline_voice")]
    pub discipline: String,
    #[serde(default = "default_wisdom_voice")]
    pub wisdom: String,
    #[serde(default = "default_leadership_voice")]
    pub leadership: String,
}

fn default_discipline_voice() -> String {
    "Marcus Aurelius".to_string()
}

fn default_wisdom_voice() -> String {
    "Gandalf".to_string()
}

fn default_leadership_voice() -> String {
    "Aragorn".to_string()
}

impl Default for CoachingVoices {
    fn default() -> Self {
        Self {
            discipline: default_discipline_voice(),
            wisdom: default_wisdom_voice(),
            leadership: default_leadership_voice(),
        }
    }
}

/// Optional module flags.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModuleSettings {
    #[serde(default)]
    pub health: bool,
    #[serde(default = "default_true")]
    pub weekly_review: bool,
    #[serde(default = "default_true")]
    pub deep_work_sessions: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            health: false,
            weekly_review: true,
            deep_work_sessions: true,
        }
    }
}

/// Collaborator path/timezone settings. Informational for this engine;
/// the database location itself comes from `TALLY_DB_PATH` or the home dir.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemSettings {
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: String,
}

fn default_timezone() -> String {
    "auto".to_string()
}

fn default_data_dir() -> String {
    "~/.tally".to_string()
}

fn default_sessions_dir() -> String {
    "~/.tally/sessions".to_string()
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            data_dir: default_data_dir(),
            sessions_dir: default_sessions_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            documents: DocumentNames::default(),
            energy_windows: default_energy_windows(),
            categories: CategoryNames::default(),
            sprint: SprintThresholds::default(),
            voices: CoachingVoices::default(),
            modules: ModuleSettings::default(),
            system: SystemSettings::default(),
        }
    }
}

impl Config {
    /// Display name for a task category.
    pub fn category_name(&self, priority: TaskPriority) -> &str {
        match priority {
            TaskPriority::Deep => &self.categories.deep,
            TaskPriority::Standard => &self.categories.standard,
            TaskPriority::Light => &self.categories.light,
            TaskPriority::Someday => &self.categories.someday,
        }
    }

    /// The peak window covering `hour`, if any.
    pub fn peak_window(&self, hour: u32) -> Option<&EnergyWindow> {
        self.energy_windows
            .iter()
            .find(|w| w.start <= hour && hour < w.end)
    }

    /// Coaching voice for a signal context. Unknown contexts fall back to
    /// the wisdom voice.
    pub fn coaching_voice(&self, context: &str) -> &str {
        match context {
            "avoidance" => &self.voices.discipline,
            "burnout" => &self.voices.wisdom,
            "scattered" => &self.voices.leadership,
            _ => &self.voices.wisdom,
        }
    }
}
