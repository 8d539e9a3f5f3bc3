// src/mc/mc_engine.rs
use crate::error::{validation::*, PricingError, PricingResult};
use crate::math_utils::SampleStats;
use crate::mc::payoffs::Payoff;
use crate::models::gbm::{Gbm, TerminalStep};
use crate::rng::NormalDraws;
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

/// Paths per work unit. Fixed so that the reduction order, and therefore
/// the result, does not depend on the thread count.
const CHUNK: usize = 4096;

#[derive(Debug, Clone, PartialEq)]
pub struct McConfig {
    pub paths: usize,
    pub s0: f64,
    pub r: f64,
    pub q: f64,
    pub sigma: f64,
    pub t: f64,
    pub use_antithetic: bool,
    pub seed: Option<u64>,
    pub payoff: Payoff,
}

impl McConfig {
    /// Validate the Monte Carlo configuration
    pub fn validate(&self) -> PricingResult<()> {
        validate_paths(self.paths)?;
        validate_positive("s0", self.s0)?;
        validate_finite("s0", self.s0)?;
        validate_finite("r", self.r)?;
        validate_finite("q", self.q)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_finite("sigma", self.sigma)?;
        validate_finite("t", self.t)?;
        Ok(())
    }
}

impl Default for McConfig {
    fn default() -> Self {
        McConfig {
            paths: 10_000,
            s0: 100.0,
            r: 0.01,
            q: 0.0,
            sigma: 0.2,
            t: 1.0,
            use_antithetic: false,
            seed: None,
            payoff: Payoff::EuropeanCall { k: 100.0 },
        }
    }
}

/// Monte Carlo price with its standard error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McEstimate {
    pub price: f64,
    pub std_error: f64,
    pub paths: usize,
}

impl McEstimate {
    /// Two-sided normal confidence interval, e.g. `level = 0.95`.
    pub fn confidence_interval(&self, level: f64) -> PricingResult<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) {
            return Err(PricingError::InvalidParameters {
                parameter: "level".to_string(),
                value: level,
                constraint: "must be in (0, 1)".to_string(),
            });
        }
        let normal = Normal::new(0.0, 1.0).map_err(|e| PricingError::NumericalInstability {
            method: "confidence interval".to_string(),
            reason: e.to_string(),
        })?;
        let z = normal.inverse_cdf(0.5 + 0.5 * level);
        Ok((self.price - z * self.std_error, self.price + z * self.std_error))
    }
}

/// Monte Carlo pricing of a European payoff under risk-neutral GBM
///
/// # Math Framework
///
/// Terminal value from the exact solution:
/// ```text
/// S_T = S_0 * exp((r - q - σ²/2)T + σ√T * Z)
/// ```
/// Price and standard error from the `N` individual payoffs:
/// ```text
/// price = e^(-rT) * mean(payoff)
/// se    = e^(-rT) * sqrt(s² / N)      s² unbiased (N-1), 0 when N = 1
/// ```
///
/// With antithetic variates each `(Z, -Z)` pair is evaluated as one unit
/// and both payoffs enter the sample individually; an odd `N` adds one
/// unpaired path.
///
/// A non-positive `T` returns a zero price and zero standard error.
pub fn mc_price_european_gbm(cfg: &McConfig) -> PricingResult<McEstimate> {
    cfg.validate()?;
    if cfg.t <= 0.0 {
        return Ok(McEstimate {
            price: 0.0,
            std_error: 0.0,
            paths: cfg.paths,
        });
    }

    let step = Gbm::risk_neutral(cfg.r, cfg.q, cfg.sigma).terminal(cfg.s0, cfg.t);
    let payoff = cfg.payoff;
    let discount = (-cfg.r * cfg.t).exp();

    let draws = NormalDraws::generate(cfg.paths, cfg.seed, cfg.use_antithetic);
    debug_assert_eq!(draws.len(), cfg.paths);
    let stats = payoff_stats(&draws, &step, &payoff);

    let estimate = McEstimate {
        price: discount * stats.mean(),
        std_error: discount * stats.std_error(),
        paths: stats.count(),
    };

    if !estimate.price.is_finite() {
        return Err(PricingError::NumericalInstability {
            method: "Monte Carlo".to_string(),
            reason: format!("Price estimate is not finite: {}", estimate.price),
        });
    }
    if !estimate.std_error.is_finite() {
        return Err(PricingError::NumericalInstability {
            method: "Monte Carlo".to_string(),
            reason: format!("Standard error is not finite: {}", estimate.std_error),
        });
    }

    debug!(
        paths = estimate.paths,
        antithetic = cfg.use_antithetic,
        seeded = cfg.seed.is_some(),
        price = estimate.price,
        std_error = estimate.std_error,
        "monte carlo run complete"
    );
    Ok(estimate)
}

fn payoff_stats(draws: &NormalDraws, step: &TerminalStep, payoff: &Payoff) -> SampleStats {
    let eval = |z: f64| payoff.calculate(step.sample(z));
    match draws {
        NormalDraws::Plain(z) => reduce(z.par_chunks(CHUNK).map(|chunk| {
            let mut stats = SampleStats::new();
            stats.extend(chunk.iter().map(|&z| eval(z)));
            stats
        })),
        NormalDraws::Antithetic { pairs, extra } => {
            let paired = reduce(pairs.par_chunks(CHUNK / 2).map(|chunk| {
                let mut stats = SampleStats::new();
                for &z in chunk {
                    stats.push(eval(z));
                    stats.push(eval(-z));
                }
                stats
            }));
            let mut unpaired = SampleStats::new();
            unpaired.extend(extra.iter().map(|&z| eval(z)));
            paired.merge(&unpaired)
        }
    }
}

/// Collect per-chunk statistics in chunk order, then merge sequentially.
fn reduce<I>(chunks: I) -> SampleStats
where
    I: IndexedParallelIterator<Item = SampleStats>,
{
    let parts: Vec<SampleStats> = chunks.collect();
    parts
        .iter()
        .fold(SampleStats::new(), |acc, part| acc.merge(part))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::bs_analytic;

    #[test]
    fn test_seeded_run_is_reproducible() {
        let cfg = McConfig {
            paths: 20_001,
            seed: Some(42),
            use_antithetic: true,
            ..Default::default()
        };
        let a = mc_price_european_gbm(&cfg).unwrap();
        let b = mc_price_european_gbm(&cfg).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.paths, 20_001);
    }

    #[test]
    fn test_matches_analytic_within_three_se() {
        let cfg = McConfig {
            paths: 200_000,
            s0: 100.0,
            r: 0.03,
            q: 0.01,
            sigma: 0.2,
            t: 0.5,
            seed: Some(7),
            payoff: Payoff::EuropeanPut { k: 105.0 },
            ..Default::default()
        };
        let est = mc_price_european_gbm(&cfg).unwrap();
        let bs = bs_analytic::bs_put_price(100.0, 105.0, 0.03, 0.01, 0.2, 0.5);
        assert!(
            (est.price - bs).abs() <= 3.0 * est.std_error + 1e-3,
            "mc={} bs={} se={}",
            est.price,
            bs,
            est.std_error
        );
    }

    #[test]
    fn test_expired_returns_zero() {
        let cfg = McConfig {
            t: -0.1,
            seed: Some(1),
            ..Default::default()
        };
        let est = mc_price_european_gbm(&cfg).unwrap();
        assert_eq!(est.price, 0.0);
        assert_eq!(est.std_error, 0.0);
    }

    #[test]
    fn test_single_path_has_zero_se() {
        let cfg = McConfig {
            paths: 1,
            seed: Some(3),
            ..Default::default()
        };
        let est = mc_price_european_gbm(&cfg).unwrap();
        assert_eq!(est.std_error, 0.0);
    }

    #[test]
    fn test_zero_vol_is_deterministic() {
        let cfg = McConfig {
            paths: 1_000,
            s0: 100.0,
            r: 0.05,
            sigma: 0.0,
            t: 1.0,
            seed: Some(9),
            payoff: Payoff::EuropeanCall { k: 90.0 },
            ..Default::default()
        };
        let est = mc_price_european_gbm(&cfg).unwrap();
        let expected = 100.0 - 90.0 * (-0.05_f64).exp();
        assert!((est.price - expected).abs() < 1e-9);
        assert!(est.std_error < 1e-9);
    }

    #[test]
    fn test_invalid_config() {
        let zero_paths = McConfig {
            paths: 0,
            ..Default::default()
        };
        assert!(matches!(
            mc_price_european_gbm(&zero_paths),
            Err(PricingError::InvalidConfiguration { .. })
        ));

        let negative_vol = McConfig {
            sigma: -0.1,
            ..Default::default()
        };
        assert!(mc_price_european_gbm(&negative_vol).is_err());
    }

    #[test]
    fn test_confidence_interval() {
        let est = McEstimate {
            price: 10.0,
            std_error: 0.1,
            paths: 1_000,
        };
        let (lo, hi) = est.confidence_interval(0.95).unwrap();
        assert!((lo - (10.0 - 1.959963984540054 * 0.1)).abs() < 1e-8);
        assert!((hi - (10.0 + 1.959963984540054 * 0.1)).abs() < 1e-8);
        assert!(est.confidence_interval(1.0).is_err());
    }
}
