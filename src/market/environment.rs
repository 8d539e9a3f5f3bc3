//! Market environment: spot, curves and volatility behind relinkable handles.

use super::curves::FlatForward;
use super::handle::{Handle, RelinkableHandle};
use super::snapshot::MarketSnapshot;
use super::vol::{BlackVolTermStructure, ConstantVol};
use crate::dates::{Actual365Fixed, DayCounter};
use crate::error::{validation::*, PricingResult};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

/// Live market inputs for one pricing session.
///
/// Every input sits in its own relinkable cell. Models built from this
/// environment keep [`Handle`]s onto the cells, so a setter call is seen by
/// the next pricing call of every such model. Setters take `&mut self`:
/// the environment is the single writer of its cells.
#[derive(Debug)]
pub struct MarketEnvironment {
    reference_date: NaiveDate,
    day_counter: Arc<dyn DayCounter>,
    spot: RelinkableHandle<f64>,
    rate: RelinkableHandle<FlatForward>,
    dividend: RelinkableHandle<FlatForward>,
    vol: RelinkableHandle<dyn BlackVolTermStructure>,
}

impl MarketEnvironment {
    /// Environment with flat rate, dividend and volatility.
    pub fn new(
        reference_date: NaiveDate,
        spot: f64,
        risk_free_rate: f64,
        div_yield: f64,
        vol: f64,
    ) -> PricingResult<Self> {
        validate_non_negative("vol", vol)?;
        validate_finite("vol", vol)?;
        Self::with_vol_surface(
            reference_date,
            spot,
            risk_free_rate,
            div_yield,
            Arc::new(ConstantVol::new(vol)),
        )
    }

    /// Environment on an externally built volatility surface.
    pub fn with_vol_surface(
        reference_date: NaiveDate,
        spot: f64,
        risk_free_rate: f64,
        div_yield: f64,
        surface: Arc<dyn BlackVolTermStructure>,
    ) -> PricingResult<Self> {
        validate_positive("spot", spot)?;
        validate_finite("spot", spot)?;
        validate_finite("risk_free_rate", risk_free_rate)?;
        validate_finite("div_yield", div_yield)?;

        let day_counter: Arc<dyn DayCounter> = Arc::new(Actual365Fixed);
        let curve = |rate| {
            Arc::new(FlatForward::with_day_counter(
                reference_date,
                rate,
                Arc::clone(&day_counter),
            ))
        };

        Ok(MarketEnvironment {
            reference_date,
            spot: RelinkableHandle::new(Arc::new(spot)),
            rate: RelinkableHandle::new(curve(risk_free_rate)),
            dividend: RelinkableHandle::new(curve(div_yield)),
            vol: RelinkableHandle::new(surface),
            day_counter,
        })
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn day_counter(&self) -> Arc<dyn DayCounter> {
        Arc::clone(&self.day_counter)
    }

    pub fn spot(&self) -> f64 {
        *self.spot.current()
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.rate.current().rate()
    }

    pub fn div_yield(&self) -> f64 {
        self.dividend.current().rate()
    }

    /// Flat volatility level; `None` when a surface without a flat level is bound.
    pub fn volatility(&self) -> Option<f64> {
        self.vol.current().flat_vol()
    }

    pub fn spot_handle(&self) -> Handle<f64> {
        self.spot.handle()
    }

    pub fn rate_handle(&self) -> Handle<FlatForward> {
        self.rate.handle()
    }

    pub fn dividend_handle(&self) -> Handle<FlatForward> {
        self.dividend.handle()
    }

    pub fn vol_handle(&self) -> Handle<dyn BlackVolTermStructure> {
        self.vol.handle()
    }

    pub fn set_spot(&mut self, spot: f64) -> PricingResult<()> {
        validate_positive("spot", spot)?;
        validate_finite("spot", spot)?;
        self.spot.link_to(Arc::new(spot));
        debug!(spot, "spot relinked");
        Ok(())
    }

    pub fn set_rate(&mut self, rate: f64) -> PricingResult<()> {
        validate_finite("risk_free_rate", rate)?;
        self.rate.link_to(Arc::new(self.flat_curve(rate)));
        debug!(rate, "rate curve relinked");
        Ok(())
    }

    pub fn set_dividend(&mut self, div_yield: f64) -> PricingResult<()> {
        validate_finite("div_yield", div_yield)?;
        self.dividend.link_to(Arc::new(self.flat_curve(div_yield)));
        debug!(div_yield, "dividend curve relinked");
        Ok(())
    }

    /// Replace the volatility source with a flat level.
    pub fn set_volatility(&mut self, vol: f64) -> PricingResult<()> {
        validate_non_negative("vol", vol)?;
        validate_finite("vol", vol)?;
        self.vol.link_to(Arc::new(ConstantVol::new(vol)));
        debug!(vol, "flat volatility relinked");
        Ok(())
    }

    /// Replace the volatility source with an external surface.
    pub fn set_vol_surface(&mut self, surface: Arc<dyn BlackVolTermStructure>) {
        debug!(surface = ?surface, "volatility surface relinked");
        self.vol.link_to(surface);
    }

    /// Current scalar values.
    pub fn snapshot(&self) -> MarketSnapshot {
        MarketSnapshot {
            spot: Some(self.spot()),
            risk_free_rate: Some(self.risk_free_rate()),
            div_yield: Some(self.div_yield()),
            vol: self.volatility(),
        }
    }

    /// Apply the present fields of a snapshot. All fields are validated
    /// before any cell is relinked.
    pub fn apply_snapshot(&mut self, snapshot: &MarketSnapshot) -> PricingResult<()> {
        if let Some(spot) = snapshot.spot {
            validate_positive("spot", spot)?;
            validate_finite("spot", spot)?;
        }
        if let Some(rate) = snapshot.risk_free_rate {
            validate_finite("risk_free_rate", rate)?;
        }
        if let Some(q) = snapshot.div_yield {
            validate_finite("div_yield", q)?;
        }
        if let Some(vol) = snapshot.vol {
            validate_non_negative("vol", vol)?;
            validate_finite("vol", vol)?;
        }

        if let Some(spot) = snapshot.spot {
            self.set_spot(spot)?;
        }
        if let Some(rate) = snapshot.risk_free_rate {
            self.set_rate(rate)?;
        }
        if let Some(q) = snapshot.div_yield {
            self.set_dividend(q)?;
        }
        if let Some(vol) = snapshot.vol {
            self.set_volatility(vol)?;
        }
        Ok(())
    }

    fn flat_curve(&self, rate: f64) -> FlatForward {
        FlatForward::with_day_counter(self.reference_date, rate, Arc::clone(&self.day_counter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Skew;

    impl BlackVolTermStructure for Skew {
        fn black_vol(&self, _t: f64, strike: f64) -> PricingResult<f64> {
            Ok(0.2 + 0.001 * (100.0 - strike))
        }
    }

    fn env() -> MarketEnvironment {
        let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        MarketEnvironment::new(today, 100.0, 0.03, 0.01, 0.2).unwrap()
    }

    #[test]
    fn test_handles_follow_setters() {
        let mut mkt = env();
        let spot = mkt.spot_handle();
        let rate = mkt.rate_handle();
        let vol = mkt.vol_handle();

        mkt.set_spot(105.0).unwrap();
        mkt.set_rate(0.04).unwrap();
        mkt.set_volatility(0.25).unwrap();

        assert_eq!(*spot.current(), 105.0);
        assert_eq!(rate.current().rate(), 0.04);
        assert_eq!(vol.current().black_vol(1.0, 100.0).unwrap(), 0.25);
    }

    #[test]
    fn test_latest_vol_source_wins() {
        let mut mkt = env();
        let vol = mkt.vol_handle();

        mkt.set_vol_surface(Arc::new(Skew));
        assert_eq!(mkt.volatility(), None);
        assert!((vol.current().black_vol(1.0, 90.0).unwrap() - 0.21).abs() < 1e-12);

        mkt.set_volatility(0.3).unwrap();
        assert_eq!(mkt.volatility(), Some(0.3));
        assert_eq!(vol.current().black_vol(1.0, 90.0).unwrap(), 0.3);
    }

    #[test]
    fn test_invalid_setters_leave_state() {
        let mut mkt = env();
        assert!(mkt.set_spot(0.0).is_err());
        assert!(mkt.set_spot(-1.0).is_err());
        assert!(mkt.set_volatility(-0.1).is_err());
        assert!(mkt.set_rate(f64::NAN).is_err());
        assert_eq!(mkt.spot(), 100.0);
        assert_eq!(mkt.volatility(), Some(0.2));
        assert_eq!(mkt.risk_free_rate(), 0.03);
    }

    #[test]
    fn test_apply_snapshot_is_atomic() {
        let mut mkt = env();
        let bad = MarketSnapshot {
            spot: Some(110.0),
            vol: Some(-0.5),
            ..Default::default()
        };
        assert!(mkt.apply_snapshot(&bad).is_err());
        assert_eq!(mkt.spot(), 100.0);

        let partial = MarketSnapshot {
            div_yield: Some(0.02),
            ..Default::default()
        };
        mkt.apply_snapshot(&partial).unwrap();
        assert_eq!(mkt.div_yield(), 0.02);
        assert_eq!(mkt.spot(), 100.0);
        assert_eq!(mkt.snapshot().vol, Some(0.2));
    }

    #[test]
    fn test_construction_rejects_bad_spot() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert!(MarketEnvironment::new(today, 0.0, 0.03, 0.0, 0.2).is_err());
        assert!(MarketEnvironment::new(today, 100.0, 0.03, 0.0, -0.2).is_err());
    }
}
