//! Multi-scenario return simulation with tax, inflation, risk and
//! sensitivity layers computed on the realistic case.

pub mod analysis;
pub mod scenarios;
pub mod simulator;

pub use analysis::{
    InflationAdjusted, RiskAnalysis, SensitivityAnalysis, SensitivityBand, TaxAnalysis,
};
pub use scenarios::{ScenarioAssumption, ScenarioKind, ScenarioResult, SAMPLE_YEARS};
pub use simulator::{calculate, calculate_with, compute, compute_with, RoiInput, RoiOutput};
