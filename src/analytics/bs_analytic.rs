// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes-Merton formulas for European options and Greeks
//!
//! # Mathematical Foundation
//!
//! Under the generalized Black-Scholes-Merton process with continuous
//! dividend yield (or foreign rate) q, the underlying follows:
//! ```text
//! dS_t = (r - q) S_t dt + σ S_t dW_t
//! ```
//!
//! and
//! ```text
//! d₁ = [ln(S/K) + (r - q + σ²/2)T] / (σ√T)
//! d₂ = d₁ - σ√T
//! ```
//!
//! All functions assume `t > 0` and `sigma > 0`; degenerate inputs are
//! handled by the caller.

use crate::math_utils::{norm_cdf, norm_pdf};

/// Returns `(d₁, d₂)`.
pub fn d1_d2(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> (f64, f64) {
    let vol_sqrt_t = sigma * t.sqrt();
    let d1 = ((s / k).ln() + (r - q + 0.5 * sigma * sigma) * t) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Black-Scholes-Merton European call option price
///
/// # Formula
/// ```text
/// C = S e^(-qT) Φ(d₁) - K e^(-rT) Φ(d₂)
/// ```
pub fn bs_call_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    s * (-q * t).exp() * norm_cdf(d1) - k * (-r * t).exp() * norm_cdf(d2)
}

/// Black-Scholes-Merton European put option price
///
/// # Formula
/// ```text
/// P = K e^(-rT) Φ(-d₂) - S e^(-qT) Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    k * (-r * t).exp() * norm_cdf(-d2) - s * (-q * t).exp() * norm_cdf(-d1)
}

/// Delta (∂V/∂S) for a call: `e^(-qT) Φ(d₁)`
pub fn bs_call_delta(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, q, sigma, t);
    (-q * t).exp() * norm_cdf(d1)
}

/// Delta for a put: `-e^(-qT) Φ(-d₁)`
pub fn bs_put_delta(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, q, sigma, t);
    -(-q * t).exp() * norm_cdf(-d1)
}

/// Gamma (∂²V/∂S²), same for calls and puts
///
/// # Formula
/// ```text
/// Γ = e^(-qT) φ(d₁) / (S σ √T)
/// ```
pub fn bs_gamma(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, q, sigma, t);
    (-q * t).exp() * norm_pdf(d1) / (s * sigma * t.sqrt())
}

/// Vega (∂V/∂σ), same for calls and puts
///
/// # Formula
/// ```text
/// ν = S e^(-qT) φ(d₁) √T
/// ```
///
/// Units: price change per unit (100%) volatility change.
pub fn bs_vega(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, _) = d1_d2(s, k, r, q, sigma, t);
    s * (-q * t).exp() * norm_pdf(d1) * t.sqrt()
}

/// Theta (∂V/∂t) for a call, per year
///
/// # Formula
/// ```text
/// Θ = -S e^(-qT) φ(d₁) σ/(2√T) - r K e^(-rT) Φ(d₂) + q S e^(-qT) Φ(d₁)
/// ```
pub fn bs_call_theta(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    let fwd_s = s * (-q * t).exp();
    -fwd_s * norm_pdf(d1) * sigma / (2.0 * t.sqrt()) - r * k * (-r * t).exp() * norm_cdf(d2)
        + q * fwd_s * norm_cdf(d1)
}

/// Theta for a put, per year
///
/// # Formula
/// ```text
/// Θ = -S e^(-qT) φ(d₁) σ/(2√T) + r K e^(-rT) Φ(-d₂) - q S e^(-qT) Φ(-d₁)
/// ```
pub fn bs_put_theta(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (d1, d2) = d1_d2(s, k, r, q, sigma, t);
    let fwd_s = s * (-q * t).exp();
    -fwd_s * norm_pdf(d1) * sigma / (2.0 * t.sqrt()) + r * k * (-r * t).exp() * norm_cdf(-d2)
        - q * fwd_s * norm_cdf(-d1)
}

/// Rho (∂V/∂r) for a call: `K T e^(-rT) Φ(d₂)`
pub fn bs_call_rho(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (_, d2) = d1_d2(s, k, r, q, sigma, t);
    k * t * (-r * t).exp() * norm_cdf(d2)
}

/// Rho for a put: `-K T e^(-rT) Φ(-d₂)`
pub fn bs_put_rho(s: f64, k: f64, r: f64, q: f64, sigma: f64, t: f64) -> f64 {
    let (_, d2) = d1_d2(s, k, r, q, sigma, t);
    -k * t * (-r * t).exp() * norm_cdf(-d2)
}
