// src/models/model.rs
use crate::error::{PricingError, PricingResult};
use crate::instruments::{ExerciseStyle, VanillaOption};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Operations a pricing model provides beyond `price`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        const PRICE  = 1 << 0;
        const GREEKS = 1 << 1;
        const DELTA  = 1 << 2;
        const GAMMA  = 1 << 3;
        const VEGA   = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Greek {
    Delta,
    Gamma,
    Vega,
    Theta,
    Rho,
}

impl Greek {
    pub fn name(self) -> &'static str {
        match self {
            Greek::Delta => "delta",
            Greek::Gamma => "gamma",
            Greek::Vega => "vega",
            Greek::Theta => "theta",
            Greek::Rho => "rho",
        }
    }

    fn capability(self) -> Capabilities {
        match self {
            Greek::Delta => Capabilities::DELTA,
            Greek::Gamma => Capabilities::GAMMA,
            Greek::Vega => Capabilities::VEGA,
            Greek::Theta | Greek::Rho => Capabilities::empty(),
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sensitivities reported by a model; a model leaves out what it does not compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub theta: Option<f64>,
    pub rho: Option<f64>,
}

impl Greeks {
    pub fn get(&self, greek: Greek) -> Option<f64> {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vega => self.vega,
            Greek::Theta => self.theta,
            Greek::Rho => self.rho,
        }
    }
}

/// Pricing capability shared by all models.
///
/// Only `price` is mandatory. A model advertises the rest through
/// [`capabilities`](PricingModel::capabilities); the defaults fail with
/// [`PricingError::NotImplemented`].
pub trait PricingModel: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn price(&self, option: &VanillaOption) -> PricingResult<f64>;

    fn capabilities(&self) -> Capabilities {
        Capabilities::PRICE
    }

    fn greeks(&self, _option: &VanillaOption) -> PricingResult<Greeks> {
        Err(not_implemented(self.name(), "greeks"))
    }

    fn delta(&self, _option: &VanillaOption) -> PricingResult<f64> {
        Err(not_implemented(self.name(), "delta"))
    }

    fn gamma(&self, _option: &VanillaOption) -> PricingResult<f64> {
        Err(not_implemented(self.name(), "gamma"))
    }

    fn vega(&self, _option: &VanillaOption) -> PricingResult<f64> {
        Err(not_implemented(self.name(), "vega"))
    }
}

pub(crate) fn not_implemented(model: &str, capability: &str) -> PricingError {
    PricingError::NotImplemented {
        capability: capability.to_string(),
        model: model.to_string(),
    }
}

/// Both models price European exercise only; American contracts are rejected
/// rather than silently priced with a European formula.
pub(crate) fn require_european(model: &str, option: &VanillaOption) -> PricingResult<()> {
    match option.exercise() {
        ExerciseStyle::European => Ok(()),
        ExerciseStyle::American => Err(PricingError::UnsupportedOperation {
            operation: format!("{} pricing", option.exercise()),
            context: format!("model '{}' supports European exercise only", model),
        }),
    }
}

/// Resolve one Greek: the model's dedicated method when it has one, the
/// generic `greeks()` mapping otherwise.
pub fn sensitivity(
    model: &dyn PricingModel,
    option: &VanillaOption,
    greek: Greek,
) -> PricingResult<f64> {
    let caps = model.capabilities();
    let dedicated = greek.capability();
    if !dedicated.is_empty() && caps.contains(dedicated) {
        return match greek {
            Greek::Delta => model.delta(option),
            Greek::Gamma => model.gamma(option),
            _ => model.vega(option),
        };
    }
    if caps.contains(Capabilities::GREEKS) {
        return model
            .greeks(option)?
            .get(greek)
            .ok_or_else(|| not_implemented(model.name(), greek.name()));
    }
    Err(not_implemented(model.name(), greek.name()))
}
