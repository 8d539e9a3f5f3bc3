// src/dates.rs
//! Time service: year fractions between calendar dates.
//!
//! Pricing code consumes dates only through [`DayCounter::year_fraction`];
//! calendars and business-day rules are left to the caller.

use chrono::NaiveDate;
use std::fmt;

/// Year-fraction capability.
pub trait DayCounter: fmt::Debug + Send + Sync {
    /// Signed year fraction from `start` to `end`; negative when `end` precedes `start`.
    fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64;
}

/// Actual/365 (Fixed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actual365Fixed;

impl DayCounter for Actual365Fixed {
    fn year_fraction(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        (end - start).num_days() as f64 / 365.0
    }
}
