//! Prediction outcome data structures

use crate::feature_encoder::FeatureVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default show-up probability cut-off for the overbooking decision
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Binary no-show risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    /// Show-up probability below the threshold; overbook the slot
    HighNoShowRisk,
    LikelyToAttend,
}

impl RiskLabel {
    /// Classify a show-up probability. The threshold itself counts as attending.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability < threshold {
            RiskLabel::HighNoShowRisk
        } else {
            RiskLabel::LikelyToAttend
        }
    }

    pub fn recommends_overbooking(self) -> bool {
        matches!(self, RiskLabel::HighNoShowRisk)
    }

    /// Banner text shown under the probability
    pub fn message(self) -> &'static str {
        match self {
            RiskLabel::HighNoShowRisk => {
                "This patient is at HIGH risk of no-show. Consider overbooking."
            }
            RiskLabel::LikelyToAttend => "This patient is likely to show up.",
        }
    }
}

/// Which classifier produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Persisted model loaded from the artifact file
    Loaded,
    /// Random classifier fit on synthetic data; carries no signal
    FallbackDemo,
}

impl ModelKind {
    pub fn is_degraded(self) -> bool {
        matches!(self, ModelKind::FallbackDemo)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Loaded => f.write_str("loaded"),
            ModelKind::FallbackDemo => f.write_str("fallback demo"),
        }
    }
}

/// Result of one encode → predict → decide run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Unique prediction identifier
    pub prediction_id: String,

    /// Estimated probability the patient attends (0.0 - 1.0)
    pub show_probability: f64,

    pub risk_label: RiskLabel,

    /// Threshold the label was decided against
    pub threshold: f64,

    pub model_kind: ModelKind,

    /// Artifact path, or a description of the fallback
    pub model_source: String,

    /// Why the fallback is active, if it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,

    /// Encoded model input
    pub features: FeatureVector,

    pub timestamp: DateTime<Utc>,
}

impl PredictionReport {
    pub fn new(
        show_probability: f64,
        threshold: f64,
        model_kind: ModelKind,
        model_source: String,
        features: FeatureVector,
    ) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            show_probability,
            risk_label: RiskLabel::from_probability(show_probability, threshold),
            threshold,
            model_kind,
            model_source,
            fallback_reason: None,
            features,
            timestamp: Utc::now(),
        }
    }

    pub fn with_fallback_reason(mut self, reason: Option<String>) -> Self {
        self.fallback_reason = reason;
        self
    }
}
