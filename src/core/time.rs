use chrono::{Local, NaiveDate};

/// Clock abstracts access to the current date so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns today's local calendar date.
    fn today(&self) -> NaiveDate;
}

/// Real-time clock backed by the system's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
