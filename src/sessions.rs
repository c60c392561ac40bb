//! Session tracking
//!
//! An append-only history of productivity sessions plus at most one current
//! session. Starting a session archives whatever was current.

use chrono::{DateTime, Local};

use crate::store::{Result, Store};
use crate::types::{generate_id, Session, SessionType};

/// Session access over the store.
pub struct Sessions<'a> {
    store: &'a Store,
}

impl<'a> Sessions<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// The current session, if one is active.
    pub fn current(&self) -> Result<Option<Session>> {
        Ok(self.store.load_sessions()?.current_session)
    }

    /// Start a new session, archiving any current one into history.
    pub fn start(
        &self,
        session_type: SessionType,
        context: Option<serde_json::Value>,
    ) -> Result<Session> {
        self.start_at(Local::now(), session_type, context)
    }

    /// Start a session with an explicit timestamp.
    pub fn start_at(
        &self,
        now: DateTime<Local>,
        session_type: SessionType,
        context: Option<serde_json::Value>,
    ) -> Result<Session> {
        let mut log = self.store.load_sessions()?;
        if let Some(previous) = log.current_session.take() {
            log.history.push(previous);
        }

        let session = Session {
            id: generate_id(),
            started_at: now,
            last_activity: now,
            session_type,
            context,
        };
        log.current_session = Some(session.clone());
        self.store.save_sessions(&log)?;
        Ok(session)
    }

    /// End the current session, if any, moving it into history.
    pub fn end(&self) -> Result<()> {
        let mut log = self.store.load_sessions()?;
        if let Some(current) = log.current_session.take() {
            log.history.push(current);
        }
        self.store.save_sessions(&log)?;
        Ok(())
    }
}
