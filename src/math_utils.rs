// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};

pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erf::erfc(-x / SQRT_2)
}

/// Standard normal probability density function
///
/// ```text
/// φ(x) = (1/√(2π)) * exp(-x²/2)
/// ```
pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

/// Streaming sample statistics (Welford), mergeable across chunks.
///
/// Chunks are merged with the pairwise update of Chan et al., so a
/// fixed chunk layout gives the same result regardless of how many
/// threads evaluated the chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampleStats {
    count: usize,
    mean: f64,
    m2: f64,
}

impl SampleStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn merge(&self, other: &SampleStats) -> SampleStats {
        if self.count == 0 {
            return *other;
        }
        if other.count == 0 {
            return *self;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = count as f64;
        SampleStats {
            count,
            mean: self.mean + delta * n_b / n,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / n,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased (N−1) sample variance; zero for fewer than two samples.
    pub fn variance(&self) -> f64 {
        if self.count > 1 {
            (self.m2 / (self.count as f64 - 1.0)).max(0.0)
        } else {
            0.0
        }
    }

    /// `sqrt(variance / N)`
    pub fn std_error(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.variance() / self.count as f64).sqrt()
        }
    }
}

impl Extend<f64> for SampleStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.push(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_norm_cdf_symmetry() {
        assert_relative_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        for &x in &[0.1, 0.5, 1.0, 2.5] {
            assert_relative_eq!(norm_cdf(x) + norm_cdf(-x), 1.0, epsilon = 1e-14);
        }
        assert_relative_eq!(norm_cdf(1.959963984540054), 0.975, epsilon = 1e-9);
    }

    #[test]
    fn test_norm_pdf_peak() {
        assert_relative_eq!(norm_pdf(0.0), 0.3989422804014327, epsilon = 1e-15);
    }

    #[test]
    fn test_sample_stats_matches_two_pass() {
        let xs = [1.0, 4.0, 2.5, 8.0, -3.0, 0.5];
        let mut stats = SampleStats::new();
        stats.extend(xs.iter().copied());

        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert_eq!(stats.count(), xs.len());
        assert_relative_eq!(stats.mean(), mean, epsilon = 1e-12);
        assert_relative_eq!(stats.variance(), var, epsilon = 1e-12);
        assert_relative_eq!(stats.std_error(), (var / n).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_sample_stats_merge_equals_sequential() {
        let xs: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
        let mut whole = SampleStats::new();
        whole.extend(xs.iter().copied());

        let mut left = SampleStats::new();
        left.extend(xs[..37].iter().copied());
        let mut right = SampleStats::new();
        right.extend(xs[37..].iter().copied());
        let merged = left.merge(&right);

        assert_eq!(merged.count(), whole.count());
        assert_relative_eq!(merged.mean(), whole.mean(), epsilon = 1e-12);
        assert_relative_eq!(merged.variance(), whole.variance(), epsilon = 1e-10);
    }

    #[test]
    fn test_single_sample_has_zero_variance() {
        let mut stats = SampleStats::new();
        stats.push(42.0);
        assert_eq!(stats.variance(), 0.0);
        assert_eq!(stats.std_error(), 0.0);
        assert_eq!(SampleStats::new().merge(&stats), stats);
    }
}
