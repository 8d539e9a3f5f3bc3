pub mod analytic;
pub mod gbm;
pub mod model;
pub mod simulation;

pub use analytic::AnalyticModel;
pub use model::{sensitivity, Capabilities, Greek, Greeks, PricingModel};
pub use simulation::{SimulationModel, SimulationSettings};
