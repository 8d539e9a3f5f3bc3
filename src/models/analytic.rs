//! Closed-form Black-Scholes-Merton model over live market handles.

use super::model::{require_european, Capabilities, Greeks, PricingModel};
use crate::analytics::bs_analytic;
use crate::dates::DayCounter;
use crate::error::PricingResult;
use crate::instruments::{OptionType, VanillaOption};
use crate::market::{BlackVolTermStructure, FlatForward, Handle, MarketEnvironment};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::warn;

/// Analytic European pricer.
///
/// Holds handles onto a [`MarketEnvironment`]'s cells, never copies of their
/// contents: every call reads the currently linked spot, curves and
/// volatility. Results are deterministic for identical inputs.
#[derive(Debug, Clone)]
pub struct AnalyticModel {
    spot: Handle<f64>,
    rate: Handle<FlatForward>,
    dividend: Handle<FlatForward>,
    vol: Handle<dyn BlackVolTermStructure>,
    evaluation_date: NaiveDate,
    day_counter: Arc<dyn DayCounter>,
}

/// Scalar inputs resolved for one call.
#[derive(Debug, Clone, Copy)]
struct BsmInputs {
    s: f64,
    k: f64,
    r: f64,
    q: f64,
    sigma: f64,
    t: f64,
    option_type: OptionType,
}

impl BsmInputs {
    fn discounted_forward_intrinsic(&self) -> f64 {
        let fwd_s = self.s * (-self.q * self.t).exp();
        let pv_k = self.k * (-self.r * self.t).exp();
        (self.option_type.sign() * (fwd_s - pv_k)).max(0.0)
    }

    fn in_the_money(&self, s: f64, k: f64) -> bool {
        self.option_type.sign() * (s - k) > 0.0
    }
}

impl AnalyticModel {
    pub fn new(market: &MarketEnvironment, evaluation_date: NaiveDate) -> Self {
        AnalyticModel {
            spot: market.spot_handle(),
            rate: market.rate_handle(),
            dividend: market.dividend_handle(),
            vol: market.vol_handle(),
            evaluation_date,
            day_counter: market.day_counter(),
        }
    }

    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
    }

    /// Same market handles, different evaluation date.
    pub fn at_date(&self, evaluation_date: NaiveDate) -> Self {
        AnalyticModel {
            evaluation_date,
            ..self.clone()
        }
    }

    pub fn time_to_expiry(&self, option: &VanillaOption) -> f64 {
        self.day_counter
            .year_fraction(self.evaluation_date, option.maturity())
    }

    fn inputs(&self, option: &VanillaOption) -> PricingResult<BsmInputs> {
        require_european(self.name(), option)?;
        let t = self.time_to_expiry(option);
        let k = option.strike();
        let sigma = if t > 0.0 {
            self.vol.current().black_vol(t, k)?
        } else {
            0.0
        };
        let maturity = option.maturity();
        Ok(BsmInputs {
            s: *self.spot.current(),
            k,
            r: self.rate.current().forward_rate(self.evaluation_date, maturity),
            q: self.dividend.current().forward_rate(self.evaluation_date, maturity),
            sigma,
            t,
            option_type: option.option_type(),
        })
    }
}

impl PricingModel for AnalyticModel {
    fn name(&self) -> &'static str {
        "analytic-bsm"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRICE | Capabilities::GREEKS
    }

    /// Closed-form price. Expired options are worth their intrinsic value;
    /// zero volatility gives the discounted forward intrinsic value.
    fn price(&self, option: &VanillaOption) -> PricingResult<f64> {
        let x = self.inputs(option)?;
        if x.t <= 0.0 {
            warn!(maturity = %option.maturity(), evaluation_date = %self.evaluation_date, "pricing expired option at intrinsic value");
            return Ok(option.intrinsic(x.s));
        }
        if x.sigma <= 0.0 {
            return Ok(x.discounted_forward_intrinsic());
        }
        Ok(match x.option_type {
            OptionType::Call => bs_analytic::bs_call_price(x.s, x.k, x.r, x.q, x.sigma, x.t),
            OptionType::Put => bs_analytic::bs_put_price(x.s, x.k, x.r, x.q, x.sigma, x.t),
        })
    }

    /// Delta, gamma, vega, theta (per year) and rho from the closed form.
    fn greeks(&self, option: &VanillaOption) -> PricingResult<Greeks> {
        let x = self.inputs(option)?;
        let sign = x.option_type.sign();

        if x.t <= 0.0 {
            let delta = if x.in_the_money(x.s, x.k) { sign } else { 0.0 };
            return Ok(Greeks {
                delta: Some(delta),
                gamma: Some(0.0),
                vega: Some(0.0),
                theta: Some(0.0),
                rho: Some(0.0),
            });
        }

        if x.sigma <= 0.0 {
            let df_q = (-x.q * x.t).exp();
            let df_r = (-x.r * x.t).exp();
            let itm = x.in_the_money(x.s * df_q, x.k * df_r);
            let (delta, theta, rho) = if itm {
                (
                    sign * df_q,
                    sign * (x.q * x.s * df_q - x.r * x.k * df_r),
                    sign * x.k * x.t * df_r,
                )
            } else {
                (0.0, 0.0, 0.0)
            };
            return Ok(Greeks {
                delta: Some(delta),
                gamma: Some(0.0),
                vega: Some(0.0),
                theta: Some(theta),
                rho: Some(rho),
            });
        }

        let (s, k, r, q, v, t) = (x.s, x.k, x.r, x.q, x.sigma, x.t);
        let (delta, theta, rho) = match x.option_type {
            OptionType::Call => (
                bs_analytic::bs_call_delta(s, k, r, q, v, t),
                bs_analytic::bs_call_theta(s, k, r, q, v, t),
                bs_analytic::bs_call_rho(s, k, r, q, v, t),
            ),
            OptionType::Put => (
                bs_analytic::bs_put_delta(s, k, r, q, v, t),
                bs_analytic::bs_put_theta(s, k, r, q, v, t),
                bs_analytic::bs_put_rho(s, k, r, q, v, t),
            ),
        };
        Ok(Greeks {
            delta: Some(delta),
            gamma: Some(bs_analytic::bs_gamma(s, k, r, q, v, t)),
            vega: Some(bs_analytic::bs_vega(s, k, r, q, v, t)),
            theta: Some(theta),
            rho: Some(rho),
        })
    }
}
