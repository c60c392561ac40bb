//! SQLite-backed document store
//!
//! Each named record (tasks, daily journal, sprint state, sessions, config)
//! is one JSON document in a single `documents` table. Loads return a default
//! when the row is missing or its JSON no longer parses - malformed records
//! self-heal on the next save instead of failing the process. Saves upsert in
//! one statement, so a whole document is replaced atomically.
//!
//! There is no cross-document isolation: every operation is a read-modify-
//! write cycle and two concurrent processes race with last-writer-wins
//! semantics. A daemonized version would need single-writer serialization or
//! version checks before sharing this store.

use crate::config::Config;
use crate::schema::documents;
use crate::types::{DailyLog, SessionLog, SprintState, Task, TaskPool};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Record keys. Collaborators agree on these names.
pub const TASKS_KEY: &str = "tasks";
pub const DAILY_KEY: &str = "daily";
pub const SPRINT_KEY: &str = "sprint";
pub const SESSIONS_KEY: &str = "sessions";
pub const CONFIG_KEY: &str = "config";

/// Database location: `TALLY_DB_PATH` env var, else `$HOME/.tally/tally.db`.
fn get_db_path() -> std::path::PathBuf {
    if let Ok(path) = std::env::var("TALLY_DB_PATH") {
        return std::path::PathBuf::from(path);
    }

    if let Some(home) = std::env::var_os("HOME") {
        return std::path::PathBuf::from(home).join(".tally").join("tally.db");
    }

    // No home dir - fall back to the working directory
    std::path::PathBuf::from(".tally/tally.db")
}

// ============================================================================
// Diesel Models
// ============================================================================

/// Insertable document row
#[derive(Insertable)]
#[diesel(table_name = documents)]
struct NewDocument<'a> {
    key: &'a str,
    content: &'a str,
    updated_at: &'a str,
}

// ============================================================================
// Store Connection
// ============================================================================

type DbPool = Pool<ConnectionManager<SqliteConnection>>;
type DbConn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Document store over a pooled SQLite connection.
pub struct Store {
    pool: DbPool,
}

/// Error type for store operations. The only hard failure in the system -
/// everything else surfaces as a failure envelope.
#[derive(Debug)]
pub enum StoreError {
    Connection(String),
    Query(diesel::result::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Connection(msg) => write!(f, "Connection error: {}", msg),
            StoreError::Query(e) => write!(f, "Query error: {}", e),
            StoreError::Serialize(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<diesel::result::Error> for StoreError {
    fn from(e: diesel::result::Error) -> Self {
        StoreError::Query(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialize(e)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl Store {
    /// Get the database path that will be used
    pub fn db_path() -> std::path::PathBuf {
        get_db_path()
    }

    /// Open the store at the default path (respects TALLY_DB_PATH env var)
    pub fn open() -> Result<Self> {
        let path = get_db_path();
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).ok();
            }
        }
        Self::open_at(&path)
    }

    /// Open the store at a specific path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let manager = ConnectionManager::<SqliteConnection>::new(&path_str);
        let pool = Pool::builder()
            .max_size(5)
            .build(manager)
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.init_schema()?;
        Ok(store)
    }

    fn get_conn(&self) -> Result<DbConn> {
        self.pool
            .get()
            .map_err(|e| StoreError::Connection(e.to_string()))
    }

    fn init_schema(&self) -> Result<()> {
        let mut conn = self.get_conn()?;

        diesel::sql_query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY NOT NULL,
                content TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#,
        )
        .execute(&mut conn)?;

        Ok(())
    }

    // ========================================================================
    // Document Primitives
    // ========================================================================

    /// Load a document, or None when it is missing or no longer parses.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let mut conn = self.get_conn()?;

        let content: Option<String> = documents::table
            .filter(documents::key.eq(key))
            .select(documents::content)
            .first::<String>(&mut conn)
            .optional()?;

        // Unparseable content is treated as absent; the next save heals it.
        Ok(content.and_then(|c| serde_json::from_str(&c).ok()))
    }

    /// Load a document, falling back to `default` when missing or malformed.
    pub fn load_or_default<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        Ok(self.load(key)?.unwrap_or(default))
    }

    /// Save a document, replacing any previous version atomically.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let mut conn = self.get_conn()?;
        let content = serde_json::to_string(value)?;
        let now = chrono::Local::now().to_rfc3339();

        diesel::replace_into(documents::table)
            .values(&NewDocument {
                key,
                content: &content,
                updated_at: &now,
            })
            .execute(&mut conn)?;

        Ok(())
    }

    // ========================================================================
    // Typed Records
    // ========================================================================

    /// Load the task collection.
    pub fn load_tasks(&self) -> Result<TaskPool> {
        self.load_or_default(TASKS_KEY, TaskPool::default())
    }

    /// Save the task collection, stamping `last_updated`.
    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let pool = TaskPool {
            tasks: tasks.to_vec(),
            last_updated: Some(chrono::Local::now()),
        };
        self.save(TASKS_KEY, &pool)
    }

    /// Load the daily journal.
    pub fn load_daily(&self) -> Result<DailyLog> {
        self.load_or_default(DAILY_KEY, DailyLog::default())
    }

    /// Save the daily journal.
    pub fn save_daily(&self, log: &DailyLog) -> Result<()> {
        self.save(DAILY_KEY, log)
    }

    /// Load the sprint state, if one has been persisted.
    pub fn load_sprint(&self) -> Result<Option<SprintState>> {
        self.load(SPRINT_KEY)
    }

    /// Save the sprint state.
    pub fn save_sprint(&self, state: &SprintState) -> Result<()> {
        self.save(SPRINT_KEY, state)
    }

    /// Load the session record.
    pub fn load_sessions(&self) -> Result<SessionLog> {
        self.load_or_default(SESSIONS_KEY, SessionLog::default())
    }

    /// Save the session record.
    pub fn save_sessions(&self, log: &SessionLog) -> Result<()> {
        self.save(SESSIONS_KEY, log)
    }

    /// Load the configuration, persisting defaults on first run.
    pub fn load_config(&self) -> Result<Config> {
        match self.load::<Config>(CONFIG_KEY)? {
            Some(config) => Ok(config),
            None => {
                let config = Config::default();
                self.save(CONFIG_KEY, &config)?;
                Ok(config)
            }
        }
    }

    /// Save the configuration.
    pub fn save_config(&self, config: &Config) -> Result<()> {
        self.save(CONFIG_KEY, config)
    }
}
