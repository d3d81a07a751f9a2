//! Clock port: where "today" comes from.
//!
//! Urgency and overdue metadata are relative to the current date. The
//! calculator reads it through this trait so tests and reproducible callers can
//! pin it with [`FixedClock`].

use chrono::{Local, NaiveDate};

/// Source of the reference date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date. Production default.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
