//! Predictor gateway: owns the active classifier for the process

use crate::config::ModelConfig;
use crate::feature_encoder::FeatureVector;
use crate::models::fallback::DemoForest;
use crate::models::loader::{ModelLoadError, ModelLoader, OnnxModel};
use crate::types::prediction::ModelKind;
use anyhow::Result;
use tracing::{info, warn};

/// The classifier behind the gateway, tagged by how it was obtained
#[derive(Debug)]
pub enum ActiveModel {
    /// Persisted model loaded from the artifact file
    Loaded(OnnxModel),
    /// Synthetic demo model; its predictions are meaningless
    FallbackDemo {
        model: DemoForest,
        reason: ModelLoadError,
    },
}

/// Single entry point for show-up probability estimates.
///
/// Built once at startup and passed by reference to whatever runs
/// predictions.
#[derive(Debug)]
pub struct PredictorGateway {
    model: ActiveModel,
}

impl PredictorGateway {
    /// Load the persisted model, or fit the demo forest if that fails.
    ///
    /// Only a failure to fit the demo forest is returned as an error.
    pub fn initialize(config: &ModelConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.onnx_threads);

        let model = match loader.load_model(&config.path) {
            Ok(model) => ActiveModel::Loaded(model),
            Err(reason) => {
                warn!(
                    path = %config.path.display(),
                    reason = %reason,
                    "Model artifact unavailable, using fallback demo model; predictions carry no signal"
                );
                let model = DemoForest::fit_synthetic(&config.fallback)?;
                ActiveModel::FallbackDemo { model, reason }
            }
        };

        let gateway = Self::from_model(model);
        info!(
            model_kind = %gateway.model_kind(),
            source = %gateway.model_source(),
            "Predictor gateway initialized"
        );
        Ok(gateway)
    }

    pub fn from_model(model: ActiveModel) -> Self {
        Self { model }
    }

    pub fn model_kind(&self) -> ModelKind {
        match self.model {
            ActiveModel::Loaded(_) => ModelKind::Loaded,
            ActiveModel::FallbackDemo { .. } => ModelKind::FallbackDemo,
        }
    }

    /// Human-readable origin of the active model
    pub fn model_source(&self) -> String {
        match &self.model {
            ActiveModel::Loaded(model) => model.path.display().to_string(),
            ActiveModel::FallbackDemo { model, .. } => format!(
                "synthetic random forest ({} trees, {} random samples, seed {})",
                model.tree_count(),
                model.samples(),
                model.seed()
            ),
        }
    }

    pub fn fallback_reason(&self) -> Option<&ModelLoadError> {
        match &self.model {
            ActiveModel::Loaded(_) => None,
            ActiveModel::FallbackDemo { reason, .. } => Some(reason),
        }
    }

    /// Estimated probability, in [0, 1], that the patient attends.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let row = features.to_model_input();

        let probability = match &self.model {
            ActiveModel::Loaded(model) => model.predict_proba(&row)?,
            ActiveModel::FallbackDemo { model, .. } => model.predict_proba(&row)?,
        };

        if !(0.0..=1.0).contains(&probability) {
            anyhow::bail!(
                "model returned show-up probability {} outside [0, 1]",
                probability
            );
        }

        Ok(probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackConfig;
    use crate::feature_encoder::FeatureEncoder;
    use crate::types::patient::{Gender, PatientInput, Weekday};

    fn config_in(dir: &tempfile::TempDir) -> ModelConfig {
        ModelConfig {
            path: dir.path().join("random_forest_noshow_model.onnx"),
            onnx_threads: 1,
            fallback: FallbackConfig {
                samples: 100,
                trees: 20,
                seed: Some(42),
            },
        }
    }

    fn with_fixture(name: &str) -> ModelConfig {
        ModelConfig {
            path: std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("tests/fixtures")
                .join(name),
            onnx_threads: 1,
            fallback: FallbackConfig {
                samples: 100,
                trees: 20,
                seed: Some(42),
            },
        }
    }

    #[test]
    fn test_loaded_artifact_predicts() {
        let gateway = PredictorGateway::initialize(&with_fixture("noshow_softmax.onnx")).unwrap();

        assert_eq!(gateway.model_kind(), ModelKind::Loaded);
        assert!(gateway.fallback_reason().is_none());
        assert!(gateway.model_source().ends_with("noshow_softmax.onnx"));

        let encoder = FeatureEncoder::new();
        let at_thirty = gateway.predict(&encoder.encode(&PatientInput::default())).unwrap();
        assert!((at_thirty - 0.5).abs() < 1e-4, "p = {}", at_thirty);

        let older = PatientInput {
            age: 60,
            ..PatientInput::default()
        };
        let p = gateway.predict(&encoder.encode(&older)).unwrap();
        assert!((0.0..=1.0).contains(&p));
        assert!(p > at_thirty);
    }

    #[test]
    fn test_incompatible_artifact_falls_back() {
        let gateway =
            PredictorGateway::initialize(&with_fixture("noshow_three_inputs.onnx")).unwrap();

        assert_eq!(gateway.model_kind(), ModelKind::FallbackDemo);
        assert!(matches!(
            gateway.fallback_reason(),
            Some(ModelLoadError::Incompatible { .. })
        ));
        let features = FeatureEncoder::new().encode(&PatientInput::default());
        let p = gateway.predict(&features).unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_missing_artifact_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = PredictorGateway::initialize(&config_in(&dir)).unwrap();

        assert_eq!(gateway.model_kind(), ModelKind::FallbackDemo);
        assert!(matches!(
            gateway.fallback_reason(),
            Some(ModelLoadError::Missing { .. })
        ));
        assert!(gateway.model_source().contains("synthetic"));
    }

    #[test]
    fn test_fallback_prediction_in_range() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = PredictorGateway::initialize(&config_in(&dir)).unwrap();
        let encoder = FeatureEncoder::new();

        let inputs = [
            PatientInput::default(),
            PatientInput {
                gender: Gender::Male,
                age: 100,
                scholarship: true,
                hypertension: true,
                diabetes: true,
                alcoholism: true,
                handicap: true,
                sms_received: true,
                lead_time_days: 100,
                weekday: Weekday::Saturday,
                hour_scheduled: 23,
            },
            PatientInput {
                age: 0,
                lead_time_days: 0,
                hour_scheduled: 0,
                ..PatientInput::default()
            },
        ];

        for input in &inputs {
            let p = gateway.predict(&encoder.encode(input)).unwrap();
            assert!((0.0..=1.0).contains(&p), "p = {}", p);
        }
    }

    #[test]
    fn test_corrupt_artifact_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        std::fs::write(&config.path, b"\x00\x01garbage").unwrap();

        let gateway = PredictorGateway::initialize(&config).unwrap();

        assert_eq!(gateway.model_kind(), ModelKind::FallbackDemo);
        assert!(matches!(
            gateway.fallback_reason(),
            Some(ModelLoadError::Session { .. })
        ));
        let features = FeatureEncoder::new().encode(&PatientInput::default());
        assert!(gateway.predict(&features).is_ok());
    }
}
