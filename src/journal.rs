//! Daily journal
//!
//! One entry per calendar date, created lazily the first time "today" is
//! touched and stamped with the sprint day at creation. Entries are only
//! appended to through the mutators here - never replaced wholesale.

use chrono::{DateTime, Local, NaiveDate};

use crate::config::Config;
use crate::sprint::SprintTracker;
use crate::store::{Result, Store};
use crate::types::DailyEntry;

/// Daily entry access over the store.
pub struct Journal<'a> {
    store: &'a Store,
    config: &'a Config,
}

impl<'a> Journal<'a> {
    pub fn new(store: &'a Store, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Get or lazily create today's entry.
    pub fn today(&self) -> Result<DailyEntry> {
        self.today_on(Local::now().date_naive())
    }

    /// Get or lazily create the entry for `today`.
    pub fn today_on(&self, today: NaiveDate) -> Result<DailyEntry> {
        self.with_today_on(today, |_| {})
    }

    /// Apply a mutation to today's entry, creating it first if needed, and
    /// persist the result.
    pub fn with_today_on<F>(&self, today: NaiveDate, mutate: F) -> Result<DailyEntry>
    where
        F: FnOnce(&mut DailyEntry),
    {
        let mut log = self.store.load_daily()?;

        if !log.entries.contains_key(&today) {
            let sprint = SprintTracker::new(self.store, self.config).status_on(today)?;
            log.entries
                .insert(today, DailyEntry::new(today, sprint.current_day));
        }

        let entry = log
            .entries
            .get_mut(&today)
            .expect("entry inserted above");
        mutate(entry);
        let snapshot = entry.clone();
        self.store.save_daily(&log)?;
        Ok(snapshot)
    }

    /// Append a field report to today's entry, prefixed with the time.
    pub fn add_field_report(&self, report: &str) -> Result<DailyEntry> {
        self.add_field_report_at(Local::now(), report)
    }

    /// Append a field report with an explicit timestamp.
    pub fn add_field_report_at(
        &self,
        now: DateTime<Local>,
        report: &str,
    ) -> Result<DailyEntry> {
        let line = format!("[{}] {}", now.format("%H:%M"), report);
        self.with_today_on(now.date_naive(), |entry| entry.field_reports.push(line))
    }

    /// Set today's briefing text.
    pub fn set_briefing(&self, briefing: &str) -> Result<DailyEntry> {
        let text = briefing.to_string();
        self.with_today_on(Local::now().date_naive(), |entry| {
            entry.briefing = Some(text)
        })
    }

    /// Record a task completion in today's entry.
    pub fn record_completion(&self, task_id: &str) -> Result<DailyEntry> {
        let id = task_id.to_string();
        self.with_today_on(Local::now().date_naive(), |entry| {
            entry.tasks_completed.push(id)
        })
    }

    /// Record a task roll-forward in today's entry.
    pub fn record_roll(&self, task_id: &str) -> Result<DailyEntry> {
        let id = task_id.to_string();
        self.with_today_on(Local::now().date_naive(), |entry| {
            entry.tasks_rolled_forward.push(id)
        })
    }
}
