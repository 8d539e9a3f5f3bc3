//! Monte Carlo model with bump-and-reprice Greeks.

use super::model::{require_european, Capabilities, Greeks, PricingModel};
use crate::dates::{Actual365Fixed, DayCounter};
use crate::error::{validation::*, PricingError, PricingResult};
use crate::instruments::VanillaOption;
use crate::market::MarketEnvironment;
use crate::mc::mc_engine::{mc_price_european_gbm, McConfig, McEstimate};
use crate::mc::payoffs::Payoff;
use crate::rng;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// Per-call simulation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub paths: usize,
    /// Reproducible draws when set; OS entropy otherwise.
    pub seed: Option<u64>,
    pub antithetic: bool,
}

impl SimulationSettings {
    pub fn validate(&self) -> PricingResult<()> {
        validate_paths(self.paths)
    }

    /// Same settings with a seed pinned, so every leg of a finite
    /// difference sees the same draws.
    fn pinned(&self) -> SimulationSettings {
        SimulationSettings {
            seed: Some(self.seed.unwrap_or_else(rng::fresh_seed)),
            ..*self
        }
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            paths: 10_000,
            seed: None,
            antithetic: false,
        }
    }
}

/// Scalar market parameters for one simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Params {
    s0: f64,
    r: f64,
    q: f64,
    sigma: f64,
}

/// One-step Monte Carlo pricer for European vanillas.
///
/// Parameterized by scalar snapshots of spot, rate, dividend yield and
/// volatility (not live handles). Greeks reprice bumped copies of those
/// parameters; the model itself is never mutated by a pricing call.
#[derive(Debug, Clone)]
pub struct SimulationModel {
    spot: f64,
    r: f64,
    q: f64,
    vol: f64,
    evaluation_date: NaiveDate,
    day_counter: Arc<dyn DayCounter>,
    settings: SimulationSettings,
}

impl SimulationModel {
    pub fn new(
        spot: f64,
        risk_free_rate: f64,
        div_yield: f64,
        vol: f64,
        evaluation_date: NaiveDate,
    ) -> PricingResult<Self> {
        validate_positive("spot", spot)?;
        validate_finite("spot", spot)?;
        validate_finite("risk_free_rate", risk_free_rate)?;
        validate_finite("div_yield", div_yield)?;
        validate_non_negative("vol", vol)?;
        validate_finite("vol", vol)?;
        Ok(SimulationModel {
            spot,
            r: risk_free_rate,
            q: div_yield,
            vol,
            evaluation_date,
            day_counter: Arc::new(Actual365Fixed),
            settings: SimulationSettings::default(),
        })
    }

    /// Snapshot the environment's current scalars. Later market updates are
    /// not seen by the returned model.
    pub fn from_market(market: &MarketEnvironment, evaluation_date: NaiveDate) -> PricingResult<Self> {
        let vol = market
            .volatility()
            .ok_or_else(|| PricingError::UnsupportedOperation {
                operation: "snapshot of volatility surface".to_string(),
                context: "the simulation model needs a flat volatility".to_string(),
            })?;
        let mut model = Self::new(
            market.spot(),
            market.risk_free_rate(),
            market.div_yield(),
            vol,
            evaluation_date,
        )?;
        model.day_counter = market.day_counter();
        Ok(model)
    }

    /// Default settings used through the [`PricingModel`] interface.
    pub fn with_settings(mut self, settings: SimulationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> SimulationSettings {
        self.settings
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn vol(&self) -> f64 {
        self.vol
    }

    pub fn risk_free_rate(&self) -> f64 {
        self.r
    }

    pub fn div_yield(&self) -> f64 {
        self.q
    }

    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    pub fn set_spot(&mut self, spot: f64) -> PricingResult<()> {
        validate_positive("spot", spot)?;
        validate_finite("spot", spot)?;
        self.spot = spot;
        Ok(())
    }

    pub fn set_vol(&mut self, vol: f64) -> PricingResult<()> {
        validate_non_negative("vol", vol)?;
        validate_finite("vol", vol)?;
        self.vol = vol;
        Ok(())
    }

    pub fn time_to_expiry(&self, option: &VanillaOption) -> f64 {
        self.day_counter
            .year_fraction(self.evaluation_date, option.maturity())
    }

    fn params(&self) -> Params {
        Params {
            s0: self.spot,
            r: self.r,
            q: self.q,
            sigma: self.vol,
        }
    }

    fn estimate(
        &self,
        option: &VanillaOption,
        params: Params,
        settings: &SimulationSettings,
    ) -> PricingResult<McEstimate> {
        require_european(self.name(), option)?;
        settings.validate()?;
        let cfg = McConfig {
            paths: settings.paths,
            s0: params.s0,
            r: params.r,
            q: params.q,
            sigma: params.sigma,
            t: self.time_to_expiry(option),
            use_antithetic: settings.antithetic,
            seed: settings.seed,
            payoff: Payoff::for_option(option),
        };
        mc_price_european_gbm(&cfg)
    }

    pub fn price_with(&self, option: &VanillaOption, settings: &SimulationSettings) -> PricingResult<f64> {
        Ok(self.price_and_std_error(option, settings)?.price)
    }

    /// Price together with its standard error. Zero price and error when expired.
    pub fn price_and_std_error(
        &self,
        option: &VanillaOption,
        settings: &SimulationSettings,
    ) -> PricingResult<McEstimate> {
        self.estimate(option, self.params(), settings)
    }

    /// Central-difference delta `(P+ − P−) / 2h`, `h` defaulting to 1% of spot.
    pub fn delta_with(
        &self,
        option: &VanillaOption,
        settings: &SimulationSettings,
        bump: Option<f64>,
    ) -> PricingResult<f64> {
        let h = self.spot_bump(bump)?;
        let settings = settings.pinned();
        let base = self.params();

        let up = self.estimate(option, Params { s0: base.s0 + h, ..base }, &settings)?;
        let down = self.estimate(option, Params { s0: base.s0 - h, ..base }, &settings)?;
        trace!(bump = h, up = up.price, down = down.price, "delta legs");

        Ok((up.price - down.price) / (2.0 * h))
    }

    /// Second central difference `(P+ − 2P₀ + P−) / h²`.
    pub fn gamma_with(
        &self,
        option: &VanillaOption,
        settings: &SimulationSettings,
        bump: Option<f64>,
    ) -> PricingResult<f64> {
        let h = self.spot_bump(bump)?;
        let settings = settings.pinned();
        let base = self.params();

        let up = self.estimate(option, Params { s0: base.s0 + h, ..base }, &settings)?;
        let mid = self.estimate(option, base, &settings)?;
        let down = self.estimate(option, Params { s0: base.s0 - h, ..base }, &settings)?;
        trace!(bump = h, up = up.price, mid = mid.price, down = down.price, "gamma legs");

        Ok((up.price - 2.0 * mid.price + down.price) / (h * h))
    }

    /// Central difference over volatility. When `vol < vol_bump` the down
    /// leg is floored at zero volatility and the difference is taken over
    /// the width actually spanned.
    pub fn vega_with(
        &self,
        option: &VanillaOption,
        settings: &SimulationSettings,
        vol_bump: f64,
    ) -> PricingResult<f64> {
        validate_positive("vol_bump", vol_bump)?;
        validate_finite("vol_bump", vol_bump)?;
        let settings = settings.pinned();
        let base = self.params();

        let sigma_up = base.sigma + vol_bump;
        let sigma_down = (base.sigma - vol_bump).max(0.0);

        let up = self.estimate(option, Params { sigma: sigma_up, ..base }, &settings)?;
        let down = self.estimate(option, Params { sigma: sigma_down, ..base }, &settings)?;
        trace!(sigma_up, sigma_down, up = up.price, down = down.price, "vega legs");

        Ok((up.price - down.price) / (sigma_up - sigma_down))
    }

    fn spot_bump(&self, bump: Option<f64>) -> PricingResult<f64> {
        let h = bump.unwrap_or(0.01 * self.spot);
        validate_positive("bump", h)?;
        if h >= self.spot {
            return Err(PricingError::InvalidParameters {
                parameter: "bump".to_string(),
                value: h,
                constraint: format!("must be smaller than spot ({})", self.spot),
            });
        }
        Ok(h)
    }

    fn greek_settings(&self) -> SimulationSettings {
        SimulationSettings {
            antithetic: true,
            ..self.settings
        }
    }
}

pub const DEFAULT_VOL_BUMP: f64 = 0.01;

impl PricingModel for SimulationModel {
    fn name(&self) -> &'static str {
        "monte-carlo"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn price(&self, option: &VanillaOption) -> PricingResult<f64> {
        self.price_with(option, &self.settings)
    }

    /// Bumped delta, gamma and vega on one shared seed; no theta or rho.
    fn greeks(&self, option: &VanillaOption) -> PricingResult<Greeks> {
        let settings = self.greek_settings().pinned();
        Ok(Greeks {
            delta: Some(self.delta_with(option, &settings, None)?),
            gamma: Some(self.gamma_with(option, &settings, None)?),
            vega: Some(self.vega_with(option, &settings, DEFAULT_VOL_BUMP)?),
            theta: None,
            rho: None,
        })
    }

    fn delta(&self, option: &VanillaOption) -> PricingResult<f64> {
        self.delta_with(option, &self.greek_settings(), None)
    }

    fn gamma(&self, option: &VanillaOption) -> PricingResult<f64> {
        self.gamma_with(option, &self.greek_settings(), None)
    }

    fn vega(&self, option: &VanillaOption) -> PricingResult<f64> {
        self.vega_with(option, &self.greek_settings(), DEFAULT_VOL_BUMP)
    }
}
