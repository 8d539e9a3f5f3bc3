//! # fast-bsm: Vanilla Option Pricing over a Relinkable Market
//!
//! Prices European options with interchangeable models that share one
//! mutable market environment.
//!
//! ## Key Features
//!
//! - **Relinkable market data**: spot, rate and dividend curves and the
//!   volatility source live behind handles; models see every update
//! - **Analytic model**: closed-form Black-Scholes-Merton price and Greeks
//! - **Monte Carlo model**: parallel, reproducible pricing with standard
//!   error and antithetic variates; bump-and-reprice Greeks on common seeds
//! - **Model-agnostic instruments**: options delegate to an explicit or a
//!   weakly bound default model
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use fast_bsm::instruments::{OptionType, VanillaOption};
//! use fast_bsm::market::MarketEnvironment;
//! use fast_bsm::models::{AnalyticModel, PricingModel};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
//! let expiry = NaiveDate::from_ymd_opt(2025, 7, 2).unwrap();
//!
//! let mut market = MarketEnvironment::new(today, 100.0, 0.03, 0.01, 0.2).unwrap();
//! let model = AnalyticModel::new(&market, today);
//! let call = VanillaOption::new(100.0, expiry, OptionType::Call).unwrap();
//!
//! let before = model.price(&call).unwrap();
//! market.set_spot(105.0).unwrap();
//! assert!(model.price(&call).unwrap() > before);
//! ```

// Module declarations
pub mod analytics;
pub mod dates;
pub mod error;
pub mod instruments;
pub mod market;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod rng;

// Re-export commonly used types for convenience
pub use error::{PricingError, PricingResult};
