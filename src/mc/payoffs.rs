//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! - **Call**: max(S_T - K, 0) - right to buy at strike K
//! - **Put**: max(K - S_T, 0) - right to sell at strike K
//!
//! Only the terminal level is needed; path-dependent contracts are not
//! priced by this crate.

use crate::instruments::{OptionType, VanillaOption};

/// Terminal payoff of a European vanilla option
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    /// European call option: max(S_T - K, 0)
    EuropeanCall { k: f64 },

    /// European put option: max(K - S_T, 0)
    EuropeanPut { k: f64 },
}

impl Payoff {
    pub fn for_option(option: &VanillaOption) -> Self {
        let k = option.strike();
        match option.option_type() {
            OptionType::Call => Payoff::EuropeanCall { k },
            OptionType::Put => Payoff::EuropeanPut { k },
        }
    }

    /// Non-negative payoff for a terminal asset level
    pub fn calculate(&self, s_t: f64) -> f64 {
        match self {
            Payoff::EuropeanCall { k } => (s_t - k).max(0.0),
            Payoff::EuropeanPut { k } => (k - s_t).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_vanilla_payoffs() {
        let call = Payoff::EuropeanCall { k: 100.0 };
        let put = Payoff::EuropeanPut { k: 100.0 };
        assert_eq!(call.calculate(120.0), 20.0);
        assert_eq!(call.calculate(80.0), 0.0);
        assert_eq!(put.calculate(80.0), 20.0);
        assert_eq!(put.calculate(120.0), 0.0);
    }

    #[test]
    fn test_payoff_from_option() {
        let maturity = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let put = VanillaOption::new(90.0, maturity, OptionType::Put).unwrap();
        assert_eq!(Payoff::for_option(&put), Payoff::EuropeanPut { k: 90.0 });
    }
}
