//! Source of "today" for the daily quota.

use chrono::NaiveDate;

use crate::types::Timestamp;

/// Supplies the current instant and local calendar date.
pub trait Clock: Send + Sync {
    /// Current UTC instant.
    fn now(&self) -> Timestamp;

    /// Current calendar date on the device-local clock.
    fn today(&self) -> NaiveDate;
}

/// System clock using the host's local time zone for day boundaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }

    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock pinned to a settable date, for tests and replay.
#[derive(Debug)]
pub struct FixedClock {
    today: std::sync::Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: std::sync::Mutex::new(today),
        }
    }

    /// Move the clock to another date.
    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().unwrap_or_else(|e| e.into_inner()) = today;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.today()
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(chrono::Utc::now)
    }

    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(|e| e.into_inner())
    }
}
