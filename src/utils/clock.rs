use chrono::{NaiveDate, Utc};

// ============================================================================
// Clock - Injectable "today" Source
// ============================================================================
//
// Delay classification compares the delivery date against a day-granular
// "today". Injecting the clock keeps the classifier deterministic under
// test.
//
// ============================================================================

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock pinned to a fixed date, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
