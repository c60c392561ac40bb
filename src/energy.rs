//! Energy log
//!
//! Timestamped energy readings appended to the daily journal, plus the
//! derived views: trailing-window recall, weighted averages, and fixed
//! morning/afternoon/evening buckets.

use chrono::{DateTime, Days, Local, NaiveDate, Timelike};

use crate::config::Config;
use crate::journal::Journal;
use crate::store::{Result, Store};
use crate::types::{DailyLog, EnergyLevel, EnergyReading, EnergyTrend};

/// Energy reading access over the store.
pub struct EnergyLog<'a> {
    store: &'a Store,
    config: &'a Config,
}

impl<'a> EnergyLog<'a> {
    pub fn new(store: &'a Store, config: &'a Config) -> Self {
        Self { store, config }
    }

    /// Log a reading against today's entry.
    pub fn log(&self, level: EnergyLevel, context: Option<String>) -> Result<EnergyReading> {
        self.log_at(Local::now(), level, context)
    }

    /// Log a reading with an explicit timestamp.
    pub fn log_at(
        &self,
        now: DateTime<Local>,
        level: EnergyLevel,
        context: Option<String>,
    ) -> Result<EnergyReading> {
        let reading = EnergyReading {
            timestamp: now,
            level,
            context,
        };
        let stored = reading.clone();
        Journal::new(self.store, self.config).with_today_on(now.date_naive(), |entry| {
            entry.energy_readings.push(stored)
        })?;
        Ok(reading)
    }

    /// Readings from the trailing `days` days, oldest first.
    pub fn recent(&self, days: u64) -> Result<Vec<EnergyReading>> {
        self.recent_as_of(Local::now().date_naive(), days)
    }

    /// Trailing-window readings as of a specific date.
    pub fn recent_as_of(&self, today: NaiveDate, days: u64) -> Result<Vec<EnergyReading>> {
        let log = self.store.load_daily()?;
        Ok(readings_since(&log, cutoff(today, days)))
    }
}

/// The earliest date still inside a trailing window of `days` days.
pub(crate) fn cutoff(today: NaiveDate, days: u64) -> NaiveDate {
    today
        .checked_sub_days(Days::new(days))
        .expect("date arithmetic stays in range")
}

/// All readings from entries dated on or after `cutoff`, oldest first.
pub(crate) fn readings_since(log: &DailyLog, cutoff: NaiveDate) -> Vec<EnergyReading> {
    let mut readings: Vec<EnergyReading> = log
        .entries
        .iter()
        .filter(|(date, _)| **date >= cutoff)
        .flat_map(|(_, entry)| entry.energy_readings.iter().cloned())
        .collect();
    readings.sort_by_key(|r| r.timestamp);
    readings
}

/// Mean of the level weights. `0.0` means "no data", which callers must
/// distinguish from a real low score.
pub fn average_energy(readings: &[EnergyReading]) -> f64 {
    if readings.is_empty() {
        return 0.0;
    }
    let total: f64 = readings.iter().map(|r| r.level.weight()).sum();
    total / readings.len() as f64
}

/// Bucket readings into the three fixed day periods. Every period is
/// reported even with zero samples.
pub fn energy_trends(readings: &[EnergyReading]) -> Vec<EnergyTrend> {
    ["morning", "afternoon", "evening"]
        .iter()
        .map(|period| {
            let bucket: Vec<EnergyReading> = readings
                .iter()
                .filter(|r| period_of_hour(r.timestamp.hour()) == *period)
                .cloned()
                .collect();
            EnergyTrend {
                period: period.to_string(),
                average_level: average_energy(&bucket),
                sample_count: bucket.len(),
            }
        })
        .collect()
}

/// Morning is [6,12), afternoon [12,18), evening wraps [18,24) and [0,6).
fn period_of_hour(hour: u32) -> &'static str {
    match hour {
        6..=11 => "morning",
        12..=17 => "afternoon",
        _ => "evening",
    }
}
