//! Type definitions for the no-show predictor

pub mod patient;
pub mod prediction;

pub use patient::{Gender, PatientInput, Weekday};
pub use prediction::{ModelKind, PredictionReport, RiskLabel};
