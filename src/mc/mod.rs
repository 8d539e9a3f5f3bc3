pub mod mc_engine;
pub mod payoffs;

pub use mc_engine::{mc_price_european_gbm, McConfig, McEstimate};
pub use payoffs::Payoff;
