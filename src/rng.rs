// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Reproducibility
//!
//! All normal variates for one pricing call are drawn sequentially from a
//! single `StdRng`. A supplied seed makes the draws reproducible; without a
//! seed the generator is seeded from OS entropy. Drawing up front keeps the
//! result independent of how the path evaluation is later split across
//! threads.
//!
//! # Antithetic Layout
//!
//! For `N` paths with antithetic variates:
//! ```text
//! Z_1 .. Z_m, -Z_1 .. -Z_m, [Z_extra]     m = floor(N/2)
//! ```
//! The trailing unpaired draw exists only when `N` is odd. It is a
//! variance-reduction approximation: the extra path has no mirror.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

pub fn seed_rng_from_u64(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Seeded generator when `seed` is given, entropy-seeded otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => seed_rng_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Fresh non-deterministic seed, used to pin one seed across the legs of a
/// bump-and-reprice Greek.
pub fn fresh_seed() -> u64 {
    rand::thread_rng().gen()
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Standard-normal draws for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalDraws {
    /// Independent draws, one per path.
    Plain(Vec<f64>),
    /// Base draws, each used as `Z` and `-Z`, plus the odd-count top-up.
    Antithetic { pairs: Vec<f64>, extra: Option<f64> },
}

impl NormalDraws {
    pub fn generate(paths: usize, seed: Option<u64>, antithetic: bool) -> Self {
        let mut rng = make_rng(seed);
        if antithetic {
            let pairs: Vec<f64> = (0..paths / 2).map(|_| get_normal_draw(&mut rng)).collect();
            let extra = if paths % 2 == 1 {
                Some(get_normal_draw(&mut rng))
            } else {
                None
            };
            NormalDraws::Antithetic { pairs, extra }
        } else {
            NormalDraws::Plain((0..paths).map(|_| get_normal_draw(&mut rng)).collect())
        }
    }

    /// Total number of paths these draws drive.
    pub(crate) fn len(&self) -> usize {
        match self {
            NormalDraws::Plain(z) => z.len(),
            NormalDraws::Antithetic { pairs, extra } => 2 * pairs.len() + extra.is_some() as usize,
        }
    }

    /// Flattened variates in path order.
    #[cfg(test)]
    fn to_vec(&self) -> Vec<f64> {
        match self {
            NormalDraws::Plain(z) => z.clone(),
            NormalDraws::Antithetic { pairs, extra } => pairs
                .iter()
                .copied()
                .chain(pairs.iter().map(|z| -z))
                .chain(extra.iter().copied())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_draws_reproducible() {
        let a = NormalDraws::generate(1_000, Some(42), false);
        let b = NormalDraws::generate(1_000, Some(42), false);
        assert_eq!(a, b);

        let c = NormalDraws::generate(1_000, Some(43), false);
        assert_ne!(a, c);
    }

    #[test]
    fn test_unseeded_draws_differ() {
        let a = NormalDraws::generate(64, None, false);
        let b = NormalDraws::generate(64, None, false);
        assert_ne!(a, b);
    }

    #[test]
    fn test_antithetic_even_layout() {
        let draws = NormalDraws::generate(10, Some(7), true);
        let z = draws.to_vec();
        assert_eq!(draws.len(), 10);
        assert_eq!(z.len(), 10);
        for i in 0..5 {
            assert_eq!(z[i + 5], -z[i]);
        }
    }

    #[test]
    fn test_antithetic_odd_top_up() {
        let draws = NormalDraws::generate(11, Some(7), true);
        let z = draws.to_vec();
        assert_eq!(z.len(), 11);
        for i in 0..5 {
            assert_eq!(z[i + 5], -z[i]);
        }
        match draws {
            NormalDraws::Antithetic { pairs, extra } => {
                assert_eq!(pairs.len(), 5);
                assert!(extra.is_some());
            }
            NormalDraws::Plain(_) => panic!("expected antithetic layout"),
        }
    }

    #[test]
    fn test_single_antithetic_path_is_unpaired() {
        let draws = NormalDraws::generate(1, Some(3), true);
        assert_eq!(draws.len(), 1);
        assert!(matches!(draws, NormalDraws::Antithetic { ref pairs, extra: Some(_) } if pairs.is_empty()));
    }

    #[test]
    fn test_normal_distribution() {
        let samples = NormalDraws::generate(20_000, Some(42), false).to_vec();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.05, "Mean should be close to 0, got {}", mean);
        assert!((variance - 1.0).abs() < 0.05, "Variance should be close to 1, got {}", variance);
    }
}
