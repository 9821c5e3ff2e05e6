//! # Clock
//!
//! The system clock is the only source of non-determinism in the checkout
//! flow: expiry-year validation reads the current calendar year and mock
//! tokens embed the current time. Controllers take a [`SharedClock`] so tests
//! can pin both.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::sync::Arc;

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar year
    fn current_year(&self) -> i32 {
        self.now().year()
    }
}

/// Type alias for a shared clock handle (dynamic dispatch)
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }

    /// Midday on January 1st of the given year
    ///
    /// Years outside chrono's range clamp to its earliest or latest instant.
    pub fn at_year(year: i32) -> Self {
        let instant = Utc
            .with_ymd_and_hms(year, 1, 1, 12, 0, 0)
            .single()
            .unwrap_or(if year < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}

/// Shared handle to the wall clock
pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_year() {
        let clock = FixedClock::at_year(2024);
        assert_eq!(clock.current_year(), 2024);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_fixed_clock_clamps_out_of_range_years() {
        assert_eq!(FixedClock::at_year(i32::MAX).now(), DateTime::<Utc>::MAX_UTC);
        assert_eq!(FixedClock::at_year(i32::MIN).now(), DateTime::<Utc>::MIN_UTC);
        assert_eq!(FixedClock::at_year(i32::MAX).now(), FixedClock::at_year(i32::MAX).now());
    }

    #[test]
    fn test_system_clock_is_recent() {
        assert!(SystemClock.current_year() >= 2024);
    }
}
