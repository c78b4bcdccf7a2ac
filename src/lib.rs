//! Patient No-Show Predictor Library
//!
//! Estimates the probability that a patient attends a scheduled medical
//! appointment and flags high no-show risk slots for overbooking.

pub mod cli;
pub mod config;
pub mod display;
pub mod feature_encoder;
pub mod form;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod types;

pub use config::AppConfig;
pub use feature_encoder::{FeatureEncoder, FeatureVector};
pub use models::gateway::{ActiveModel, PredictorGateway};
pub use pipeline::NoShowPipeline;
pub use types::{patient::PatientInput, prediction::PredictionReport};
