//! Vanilla option contract.

use super::types::{ExerciseStyle, OptionType, UnderlyingClass};
use crate::error::{validation::*, PricingError, PricingResult};
use crate::models::model::{sensitivity, Greek, Greeks, PricingModel};
use chrono::NaiveDate;
use std::fmt;
use std::sync::{Arc, Weak};

/// Single-underlying option contract, independent of any pricing model.
///
/// The optional default model is held weakly: the option never keeps a
/// model alive. Once the model is dropped the binding behaves as absent.
#[derive(Clone)]
pub struct VanillaOption {
    strike: f64,
    maturity: NaiveDate,
    option_type: OptionType,
    exercise: ExerciseStyle,
    underlying: UnderlyingClass,
    default_model: Option<Weak<dyn PricingModel>>,
}

impl VanillaOption {
    /// European equity option.
    pub fn new(strike: f64, maturity: NaiveDate, option_type: OptionType) -> PricingResult<Self> {
        Self::with_terms(
            strike,
            maturity,
            option_type,
            ExerciseStyle::European,
            UnderlyingClass::Equity,
        )
    }

    pub fn with_terms(
        strike: f64,
        maturity: NaiveDate,
        option_type: OptionType,
        exercise: ExerciseStyle,
        underlying: UnderlyingClass,
    ) -> PricingResult<Self> {
        validate_positive("strike", strike)?;
        validate_finite("strike", strike)?;
        Ok(VanillaOption {
            strike,
            maturity,
            option_type,
            exercise,
            underlying,
            default_model: None,
        })
    }

    /// Build from textual style and class names, e.g. as read from a trade file.
    pub fn parse(
        strike: f64,
        maturity: NaiveDate,
        option_type: &str,
        exercise: &str,
        underlying: &str,
    ) -> PricingResult<Self> {
        Self::with_terms(
            strike,
            maturity,
            option_type.parse()?,
            exercise.parse()?,
            underlying.parse()?,
        )
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    pub fn maturity(&self) -> NaiveDate {
        self.maturity
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn exercise(&self) -> ExerciseStyle {
        self.exercise
    }

    pub fn underlying(&self) -> UnderlyingClass {
        self.underlying
    }

    /// Undiscounted payoff at a terminal underlying level.
    pub fn intrinsic(&self, spot: f64) -> f64 {
        (self.option_type.sign() * (spot - self.strike)).max(0.0)
    }

    pub fn bind_model<M: PricingModel + 'static>(&mut self, model: &Arc<M>) {
        let model: Arc<dyn PricingModel> = model.clone();
        self.default_model = Some(Arc::downgrade(&model));
    }

    pub fn unbind_model(&mut self) {
        self.default_model = None;
    }

    pub fn default_model(&self) -> Option<Arc<dyn PricingModel>> {
        self.default_model.as_ref().and_then(Weak::upgrade)
    }

    fn resolve<'a>(
        &self,
        model: Option<&'a dyn PricingModel>,
    ) -> PricingResult<ResolvedModel<'a>> {
        match model {
            Some(m) => Ok(ResolvedModel::Borrowed(m)),
            None => self
                .default_model()
                .map(ResolvedModel::Owned)
                .ok_or(PricingError::NoModelBound),
        }
    }

    pub fn price(&self, model: Option<&dyn PricingModel>) -> PricingResult<f64> {
        self.resolve(model)?.get().price(self)
    }

    pub fn greeks(&self, model: Option<&dyn PricingModel>) -> PricingResult<Greeks> {
        self.resolve(model)?.get().greeks(self)
    }

    pub fn delta(&self, model: Option<&dyn PricingModel>) -> PricingResult<f64> {
        sensitivity(self.resolve(model)?.get(), self, Greek::Delta)
    }

    pub fn gamma(&self, model: Option<&dyn PricingModel>) -> PricingResult<f64> {
        sensitivity(self.resolve(model)?.get(), self, Greek::Gamma)
    }

    pub fn vega(&self, model: Option<&dyn PricingModel>) -> PricingResult<f64> {
        sensitivity(self.resolve(model)?.get(), self, Greek::Vega)
    }
}

enum ResolvedModel<'a> {
    Borrowed(&'a dyn PricingModel),
    Owned(Arc<dyn PricingModel>),
}

impl ResolvedModel<'_> {
    fn get(&self) -> &dyn PricingModel {
        match self {
            ResolvedModel::Borrowed(m) => *m,
            ResolvedModel::Owned(m) => m.as_ref(),
        }
    }
}

impl fmt::Debug for VanillaOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VanillaOption")
            .field("strike", &self.strike)
            .field("maturity", &self.maturity)
            .field("option_type", &self.option_type)
            .field("exercise", &self.exercise)
            .field("underlying", &self.underlying)
            .field("default_model", &self.default_model().map(|m| m.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maturity() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_strike() {
        assert!(VanillaOption::new(0.0, maturity(), OptionType::Call).is_err());
        assert!(VanillaOption::new(-10.0, maturity(), OptionType::Put).is_err());
        assert!(VanillaOption::new(f64::NAN, maturity(), OptionType::Put).is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_style() {
        assert!(VanillaOption::parse(100.0, maturity(), "call", "european", "equity").is_ok());
        let err = VanillaOption::parse(100.0, maturity(), "call", "asian", "equity").unwrap_err();
        assert!(matches!(err, PricingError::InvalidConfiguration { .. }));
        assert!(VanillaOption::parse(100.0, maturity(), "call", "european", "rates").is_err());
    }

    #[test]
    fn test_intrinsic() {
        let call = VanillaOption::new(100.0, maturity(), OptionType::Call).unwrap();
        let put = VanillaOption::new(100.0, maturity(), OptionType::Put).unwrap();
        assert_eq!(call.intrinsic(110.0), 10.0);
        assert_eq!(call.intrinsic(90.0), 0.0);
        assert_eq!(put.intrinsic(90.0), 10.0);
        assert_eq!(put.intrinsic(110.0), 0.0);
    }

    #[test]
    fn test_no_model_bound() {
        let call = VanillaOption::new(100.0, maturity(), OptionType::Call).unwrap();
        assert!(matches!(call.price(None), Err(PricingError::NoModelBound)));
        assert!(matches!(call.delta(None), Err(PricingError::NoModelBound)));
    }
}
