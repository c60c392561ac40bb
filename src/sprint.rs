//! Sprint tracker
//!
//! Counts consecutive calendar days with at least one interaction and
//! classifies the run against the configured warning/danger thresholds.
//! The day-rollover transition happens on status read and is idempotent
//! within a day. A gap of more than one day resets the counter to 1; an
//! explicit rest day zeroes it and schedules tomorrow as day 1.

use chrono::{Days, Local, NaiveDate};

use crate::config::Config;
use crate::store::{Result, Store};
use crate::types::{SprintHealth, SprintState, SprintStatus};

/// Sprint day counter over the store.
pub struct SprintTracker<'a> {
    store: &'a Store,
    config: &'a Config,
}

impl<'a> SprintTracker<'a> {
    pub fn new(store: &'a Store, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Current sprint status. Reading the status advances the day counter
    /// the first time it is called on a new calendar day.
    pub fn status(&self) -> Result<SprintStatus> {
        self.status_on(Local::now().date_naive())
    }

    /// Status as of a specific date.
    pub fn status_on(&self, today: NaiveDate) -> Result<SprintStatus> {
        let mut state = self
            .store
            .load_sprint()?
            .unwrap_or_else(|| SprintState::starting(today));

        if state.last_work_day != today {
            let days_since = (today - state.last_work_day).num_days();
            if days_since > 1 {
                // Unrecorded gap - the sprint restarts today
                state.current_day = 1;
                state.start_date = today;
            } else {
                state.current_day += 1;
            }
            state.last_work_day = today;
            self.store.save_sprint(&state)?;
        }

        Ok(SprintStatus {
            current_day: state.current_day,
            start_date: state.start_date,
            status: self.classify(state.current_day),
            last_rest_day: state.rest_days.last().copied(),
        })
    }

    /// Record an explicit rest day: zero the counter and schedule tomorrow
    /// as day 1, so the sprint reads healthy the moment work resumes.
    pub fn record_rest_day(&self) -> Result<()> {
        self.record_rest_day_on(Local::now().date_naive())
    }

    /// Record a rest day as of a specific date.
    pub fn record_rest_day_on(&self, today: NaiveDate) -> Result<()> {
        let mut state = self
            .store
            .load_sprint()?
            .unwrap_or_else(|| SprintState::starting(today));

        let tomorrow = today
            .checked_add_days(Days::new(1))
            .expect("date arithmetic stays in range");

        state.rest_days.push(today);
        state.current_day = 0;
        state.start_date = tomorrow;
        self.store.save_sprint(&state)?;
        Ok(())
    }

    fn classify(&self, current_day: u32) -> SprintHealth {
        if current_day >= self.config.sprint.danger_day {
            SprintHealth::Danger
        } else if current_day >= self.config.sprint.warning_day {
            SprintHealth::Warning
        } else {
            SprintHealth::Healthy
        }
    }
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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_read_starts_at_day_one() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        let tracker = SprintTracker::new(&store, &config);

        let status = tracker.status_on(date(2026, 8, 1)).unwrap();
        assert_eq!(status.current_day, 1);
        assert_eq!(status.status, SprintHealth::Healthy);
        assert_eq!(status.start_date, date(2026, 8, 1));
    }

    #[test]
    fn test_consecutive_days_increment_once_per_day() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        let tracker = SprintTracker::new(&store, &config);

        store.save_sprint(&SprintState::starting(date(2026, 8, 1))).unwrap();
        let status = tracker.status_on(date(2026, 8, 2)).unwrap();
        assert_eq!(status.current_day, 2);

        // Same-day reads are no-ops
        let again = tracker.status_on(date(2026, 8, 2)).unwrap();
        assert_eq!(again.current_day, 2);
    }

    #[test]
    fn test_threshold_classification() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        let tracker = SprintTracker::new(&store, &config);
        let today = date(2026, 8, 7);

        for (day, expected) in [
            (13, SprintHealth::Healthy),
            (14, SprintHealth::Warning),
            (20, SprintHealth::Warning),
            (21, SprintHealth::Danger),
            (30, SprintHealth::Danger),
        ] {
            let mut state = SprintState::starting(today);
            state.current_day = day;
            store.save_sprint(&state).unwrap();
            let status = tracker.status_on(today).unwrap();
            assert_eq!(status.status, expected, "day {}", day);
        }
    }

    #[test]
    fn test_gap_resets_to_day_one() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        let tracker = SprintTracker::new(&store, &config);

        let mut state = SprintState::starting(date(2026, 8, 1));
        state.current_day = 9;
        store.save_sprint(&state).unwrap();

        // Three days later - implicit rest taken
        let status = tracker.status_on(date(2026, 8, 4)).unwrap();
        assert_eq!(status.current_day, 1);
        assert_eq!(status.start_date, date(2026, 8, 4));
        assert_eq!(status.status, SprintHealth::Healthy);
    }

    #[test]
    fn test_rest_day_zeroes_counter_and_schedules_tomorrow() {
        let (_dir, store) = temp_store();
        let config = Config::default();
        let tracker = SprintTracker::new(&store, &config);

        let mut state = SprintState::starting(date(2026, 8, 1));
        state.current_day = 16;
        state.last_work_day = date(2026, 8, 16);
        store.save_sprint(&state).unwrap();

        tracker.record_rest_day_on(date(2026, 8, 16)).unwrap();
        let saved = store.load_sprint().unwrap().unwrap();
        assert_eq!(saved.current_day, 0);
        assert_eq!(saved.start_date, date(2026, 8, 17));
        assert_eq!(saved.rest_days, vec![date(2026, 8, 16)]);

        // Same-day status read stays at zero
        let status = tracker.status_on(date(2026, 8, 16)).unwrap();
        assert_eq!(status.current_day, 0);
        assert_eq!(status.last_rest_day, Some(date(2026, 8, 16)));

        // The next day is day 1, healthy
        let next = tracker.status_on(date(2026, 8, 17)).unwrap();
        assert_eq!(next.current_day, 1);
        assert_eq!(next.status, SprintHealth::Healthy);
    }
}
