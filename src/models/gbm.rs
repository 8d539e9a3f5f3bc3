// src/models/gbm.rs

/// Risk-neutral geometric Brownian motion with drift `r - q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(mu: f64, sigma: f64) -> Self {
        Gbm { mu, sigma }
    }

    pub fn risk_neutral(r: f64, q: f64, sigma: f64) -> Self {
        Gbm::new(r - q, sigma)
    }

    /// Exact log-normal map to a fixed horizon:
    /// `S_t = S_0 * exp((μ - σ²/2)t + σ√t * Z)`.
    pub fn terminal(&self, s0: f64, t: f64) -> TerminalStep {
        TerminalStep {
            s0,
            drift: (self.mu - 0.5 * self.sigma * self.sigma) * t,
            diffusion: self.sigma * t.sqrt(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerminalStep {
    s0: f64,
    drift: f64,
    diffusion: f64,
}

impl TerminalStep {
    #[inline]
    pub fn sample(&self, z: f64) -> f64 {
        self.s0 * (self.drift + self.diffusion * z).exp()
    }
}
