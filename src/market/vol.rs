//! Black volatility sources.

use crate::error::{PricingError, PricingResult};
use std::fmt;

/// Black implied-volatility lookup.
///
/// Surfaces built elsewhere (e.g. from an option chain) plug in through
/// this trait; the market environment treats them as opaque.
pub trait BlackVolTermStructure: fmt::Debug + Send + Sync {
    /// Implied volatility for a time to expiry (years) and strike.
    fn black_vol(&self, time_to_expiry: f64, strike: f64) -> PricingResult<f64>;

    /// The scalar level when the source is flat.
    fn flat_vol(&self) -> Option<f64> {
        None
    }
}

/// Constant volatility for every expiry and strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantVol {
    vol: f64,
}

impl ConstantVol {
    pub fn new(vol: f64) -> Self {
        ConstantVol { vol }
    }
}

impl BlackVolTermStructure for ConstantVol {
    fn black_vol(&self, _time_to_expiry: f64, strike: f64) -> PricingResult<f64> {
        if strike <= 0.0 {
            return Err(PricingError::InvalidParameters {
                parameter: "strike".to_string(),
                value: strike,
                constraint: "volatility lookup requires a positive strike".to_string(),
            });
        }
        Ok(self.vol)
    }

    fn flat_vol(&self) -> Option<f64> {
        Some(self.vol)
    }
}
