//! Flat-forward term structure.

use crate::dates::{Actual365Fixed, DayCounter};
use chrono::NaiveDate;
use std::sync::Arc;

/// Flat term structure with a single continuously compounded rate.
///
/// ```text
/// D(t) = exp(-r * t),   t = yf(reference_date, date)
/// ```
#[derive(Debug, Clone)]
pub struct FlatForward {
    reference_date: NaiveDate,
    rate: f64,
    day_counter: Arc<dyn DayCounter>,
}

impl FlatForward {
    pub fn new(reference_date: NaiveDate, rate: f64) -> Self {
        Self::with_day_counter(reference_date, rate, Arc::new(Actual365Fixed))
    }

    pub fn with_day_counter(
        reference_date: NaiveDate,
        rate: f64,
        day_counter: Arc<dyn DayCounter>,
    ) -> Self {
        FlatForward {
            reference_date,
            rate,
            day_counter,
        }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    fn time_from_reference(&self, date: NaiveDate) -> f64 {
        self.day_counter.year_fraction(self.reference_date, date)
    }

    pub fn discount(&self, date: NaiveDate) -> f64 {
        (-self.rate * self.time_from_reference(date)).exp()
    }

    /// Continuously compounded forward rate implied by the discount factors
    /// at `start` and `end`. Falls back to the curve rate when the dates
    /// coincide.
    pub fn forward_rate(&self, start: NaiveDate, end: NaiveDate) -> f64 {
        let t = self.day_counter.year_fraction(start, end);
        if t == 0.0 {
            return self.rate;
        }
        (self.discount(start) / self.discount(end)).ln() / t
    }
}
