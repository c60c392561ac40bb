//! Tally - personal productivity tracking
//!
//! Bridge a physical index-card workflow with a digital record of tasks,
//! energy levels, and multi-day sprint health.
//!
//! # Overview
//!
//! Tally keeps a small set of durable records - the task pool, a daily
//! journal, sprint state, sessions, and configuration - and derives the
//! signals that matter from them on every read: avoidance patterns, energy
//! trends, completion rate, and burnout risk. Derived analysis is never
//! stored, so it can never go stale.
//!
//! # Records
//!
//! | Record | Purpose |
//! |--------|---------|
//! | `tasks` | The ordered task pool |
//! | `daily` | One journal entry per calendar date |
//! | `sprint` | Consecutive-work-day counter |
//! | `sessions` | Session history plus the current session |
//! | `config` | Thresholds, windows, display names |
//!
//! # Quick Start
//!
//! ```no_run
//! use tally::{ops, Store};
//!
//! let store = Store::open().unwrap();
//! let config = store.load_config().unwrap();
//!
//! // Add a task and roll it into tomorrow
//! ops::add_task(&store, &config, "Write report", "deep", None).unwrap();
//! ops::roll_task(&store, &config, "Write report").unwrap();
//!
//! // Every operation returns a {success, message, data} envelope
//! let outcome = ops::summary(&store, &config).unwrap();
//! println!("{}", outcome.message);
//! ```

pub mod config;
pub mod energy;
pub mod journal;
pub mod ops;
pub mod patterns;
pub mod schema;
pub mod sessions;
pub mod sprint;
pub mod store;
pub mod tasks;
pub mod types;

pub use config::{Config, EnergyWindow, AVOIDANCE_ROLL_THRESHOLD};
pub use energy::{average_energy, energy_trends, EnergyLog};
pub use journal::Journal;
pub use ops::Outcome;
pub use patterns::{analyze, Analyzer};
pub use sessions::Sessions;
pub use sprint::SprintTracker;
pub use store::{Store, StoreError};
pub use tasks::TaskRegistry;
pub use types::{
    AvoidancePattern, BurnoutRisk, CategoryBalance, DailyEntry, DailyLog, EnergyLevel,
    EnergyReading, EnergyTrend, PatternAnalysis, Session, SessionLog, SessionType, SprintHealth,
    SprintState, SprintStatus, Task, TaskPool, TaskPriority,
};
