//! Result panel rendering

use crate::types::prediction::PredictionReport;
use anyhow::Result;

/// Render the report as the text result panel.
pub fn render_text(report: &PredictionReport) -> String {
    let banner = if report.risk_label.recommends_overbooking() {
        "[HIGH RISK]"
    } else {
        "[OK]"
    };

    let mut out = format!(
        "Prediction Result\n\
         -----------------\n\
         Predicted Show-Up Probability: {}\n\
         {} {}\n",
        format_percent(report.show_probability),
        banner,
        report.risk_label.message()
    );

    if report.model_kind.is_degraded() {
        out.push_str(
            "\nWARNING: demo model active. This prediction comes from a classifier \
             fit on random data and carries no signal.\n",
        );
        if let Some(reason) = &report.fallback_reason {
            out.push_str(&format!("Reason: {}\n", reason));
        }
    }

    out.push_str(&format!(
        "Model: {} ({})\n",
        report.model_kind, report.model_source
    ));
    out
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &PredictionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Probability as a percentage with two decimals, e.g. `73.50%`
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_encoder::FeatureEncoder;
    use crate::types::patient::PatientInput;
    use crate::types::prediction::ModelKind;

    fn report(probability: f64, kind: ModelKind) -> PredictionReport {
        let features = FeatureEncoder::new().encode(&PatientInput::default());
        PredictionReport::new(probability, 0.5, kind, "models/test.onnx".to_string(), features)
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.735), "73.50%");
        assert_eq!(format_percent(1.0), "100.00%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn test_high_risk_panel() {
        let text = render_text(&report(0.3, ModelKind::Loaded));
        assert!(text.contains("Predicted Show-Up Probability: 30.00%"));
        assert!(text.contains("[HIGH RISK] This patient is at HIGH risk of no-show. Consider overbooking."));
        assert!(!text.contains("WARNING"));
        assert!(text.ends_with("Model: loaded (models/test.onnx)\n"));
    }

    #[test]
    fn test_attend_panel_at_boundary() {
        let text = render_text(&report(0.5, ModelKind::Loaded));
        assert!(text.contains("[OK] This patient is likely to show up."));
    }

    #[test]
    fn test_demo_model_warning_is_visible() {
        let report = report(0.9, ModelKind::FallbackDemo)
            .with_fallback_reason(Some("model file not found at models/test.onnx".to_string()));
        let text = render_text(&report);
        assert!(text.contains("WARNING: demo model active"));
        assert!(text.contains("fit on random data and carries no signal."));
        assert!(text.contains("Reason: model file not found"));
    }

    #[test]
    fn test_json_panel() {
        let json = render_json(&report(0.6, ModelKind::Loaded)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["risk_label"], "likely_to_attend");
        assert_eq!(value["features"]["HourScheduled"], 10);
    }
}
