//! Contract classification enums.

use crate::error::PricingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// +1 for calls, −1 for puts.
    pub fn sign(self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExerciseStyle {
    #[default]
    European,
    American,
}

/// Underlying asset class. For FX the dividend curve carries the foreign rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnderlyingClass {
    #[default]
    Equity,
    Fx,
}

fn invalid(field: &str, value: &str, allowed: &str) -> PricingError {
    PricingError::InvalidConfiguration {
        field: field.to_string(),
        reason: format!("unsupported value '{}' (expected one of: {})", value, allowed),
    }
}

impl FromStr for OptionType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            _ => Err(invalid("option_type", s, "call, put")),
        }
    }
}

impl FromStr for ExerciseStyle {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "european" => Ok(ExerciseStyle::European),
            "american" => Ok(ExerciseStyle::American),
            _ => Err(invalid("exercise_style", s, "european, american")),
        }
    }
}

impl FromStr for UnderlyingClass {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equity" => Ok(UnderlyingClass::Equity),
            "fx" => Ok(UnderlyingClass::Fx),
            _ => Err(invalid("underlying_class", s, "equity, fx")),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::European => write!(f, "European"),
            ExerciseStyle::American => write!(f, "American"),
        }
    }
}

impl fmt::Display for UnderlyingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnderlyingClass::Equity => write!(f, "Equity"),
            UnderlyingClass::Fx => write!(f, "FX"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("Call".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" p ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("AMERICAN".parse::<ExerciseStyle>().unwrap(), ExerciseStyle::American);
        assert_eq!("fx".parse::<UnderlyingClass>().unwrap(), UnderlyingClass::Fx);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("Bermudan".parse::<ExerciseStyle>().is_err());
        assert!("Commodity".parse::<UnderlyingClass>().is_err());
        assert!("straddle".parse::<OptionType>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for style in [ExerciseStyle::European, ExerciseStyle::American] {
            assert_eq!(style.to_string().parse::<ExerciseStyle>().unwrap(), style);
        }
        for class in [UnderlyingClass::Equity, UnderlyingClass::Fx] {
            assert_eq!(class.to_string().parse::<UnderlyingClass>().unwrap(), class);
        }
    }
}
