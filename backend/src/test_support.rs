//! Test utilities for the surflog crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at a fixed instant.
///
/// # Examples
/// ```
/// use mockable::Clock;
/// use surflog::test_support::FixtureClock;
///
/// let clock = FixtureClock::at_ymd(2025, 7, 14);
/// assert_eq!(clock.utc().date_naive().to_string(), "2025-07-14");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    pub fn new(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }

    /// Noon UTC on the given day.
    ///
    /// # Panics
    /// Panics when the date is invalid.
    pub fn at_ymd(year: i32, month: u32, day: u32) -> Self {
        match Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single() {
            Some(utc_now) => Self { utc_now },
            None => panic!("invalid fixture date {year}-{month}-{day}"),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.utc_now.date_naive()
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}
