//! Encode → predict → decide for one form submission

use crate::feature_encoder::FeatureEncoder;
use crate::models::gateway::PredictorGateway;
use crate::types::patient::PatientInput;
use crate::types::prediction::PredictionReport;
use anyhow::Result;
use std::time::Instant;
use tracing::debug;

/// Runs a full prediction for one set of form values.
pub struct NoShowPipeline<'a> {
    encoder: FeatureEncoder,
    gateway: &'a PredictorGateway,
    threshold: f64,
}

impl<'a> NoShowPipeline<'a> {
    pub fn new(gateway: &'a PredictorGateway, threshold: f64) -> Self {
        Self {
            encoder: FeatureEncoder::new(),
            gateway,
            threshold,
        }
    }

    pub fn assess(&self, input: &PatientInput) -> Result<PredictionReport> {
        let start_time = Instant::now();

        let features = self.encoder.encode(input);
        let show_probability = self.gateway.predict(&features)?;

        let report = PredictionReport::new(
            show_probability,
            self.threshold,
            self.gateway.model_kind(),
            self.gateway.model_source(),
            features,
        )
        .with_fallback_reason(self.gateway.fallback_reason().map(|r| r.to_string()));

        debug!(
            prediction_id = %report.prediction_id,
            show_probability = report.show_probability,
            risk_label = ?report.risk_label,
            model_kind = %report.model_kind,
            processing_time_us = start_time.elapsed().as_micros(),
            "Prediction complete"
        );

        Ok(report)
    }
}
