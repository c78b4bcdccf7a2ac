//! Classifier loading and inference components

pub mod fallback;
pub mod gateway;
pub mod loader;

pub use fallback::DemoForest;
pub use gateway::{ActiveModel, PredictorGateway};
pub use loader::{ModelLoadError, ModelLoader, OnnxModel};
