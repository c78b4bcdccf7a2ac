//! ONNX model loader and single-row inference

use crate::feature_encoder::FEATURE_COUNT;
use anyhow::{Context, Result};
use ort::memory::Allocator;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

/// Reasons the persisted model could not be activated
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model file not found at {}", .path.display())]
    Missing { path: PathBuf },

    #[error("failed to open ONNX session for {}: {message}", .path.display())]
    Session { path: PathBuf, message: String },

    #[error(
        "model at {} rejected a {count}-feature row: {message}",
        .path.display(),
        count = FEATURE_COUNT
    )]
    Incompatible { path: PathBuf, message: String },
}

/// Loaded ONNX classifier with metadata
pub struct OnnxModel {
    /// Artifact the session was built from
    pub path: PathBuf,
    /// ONNX Runtime session; `run` needs exclusive access
    session: Mutex<Session>,
    /// Input name for the model
    pub input_name: String,
    /// Output name for probabilities
    pub output_name: String,
}

impl OnnxModel {
    /// Probability of the "show" class (label 1) for one feature row
    pub fn predict_proba(&self, row: &[f32; FEATURE_COUNT]) -> Result<f64> {
        use ort::value::Tensor;

        // Prepare input tensor - shape [1, num_features]
        let shape = vec![1_i64, FEATURE_COUNT as i64];
        let input_tensor =
            Tensor::from_array((shape, row.to_vec())).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![&self.input_name => input_tensor])?;

        extract_show_probability(&outputs, &self.output_name)
    }
}

impl std::fmt::Debug for OnnxModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxModel")
            .field("path", &self.path)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

/// Loader for the persisted ONNX classifier
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier and check it accepts an encoded feature row.
    pub fn load_model<P: AsRef<Path>>(&self, path: P) -> Result<OnnxModel, ModelLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ModelLoadError::Missing {
                path: path.to_path_buf(),
            });
        }

        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = self
            .build_session(path)
            .map_err(|e| ModelLoadError::Session {
                path: path.to_path_buf(),
                message: format!("{:#}", e),
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "output_probability".to_string())
            });

        let model = OnnxModel {
            path: path.to_path_buf(),
            session: Mutex::new(session),
            input_name,
            output_name,
        };

        let zero_row = model
            .predict_proba(&[0.0; FEATURE_COUNT])
            .map_err(|e| ModelLoadError::Incompatible {
                path: path.to_path_buf(),
                message: format!("{:#}", e),
            })?;

        info!(
            path = %path.display(),
            input = %model.input_name,
            output = %model.output_name,
            zero_row = zero_row,
            "Model loaded successfully"
        );

        Ok(model)
    }

    fn build_session(&self, path: &Path) -> Result<Session> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;
        Ok(session)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::with_threads(1)
    }
}

/// Extract the show-up probability from model output.
///
/// Accepts a `[1, n_classes]` probability tensor or the
/// `seq(map(int64, float))` layout sklearn exports emit by default.
fn extract_show_probability(
    outputs: &ort::session::SessionOutputs,
    output_name: &str,
) -> Result<f64> {
    if let Some(output) = outputs.get(output_name) {
        if let Some(prob) = try_extract(output)? {
            return Ok(prob);
        }
    }

    // Fall back to any non-label output
    for (name, output) in outputs.iter() {
        if name.contains("label") {
            continue;
        }
        if let Some(prob) = try_extract(&output)? {
            debug!(output = %name, prob = prob, "Extracted from secondary output");
            return Ok(prob);
        }
    }

    anyhow::bail!("no probability output found (expected {})", output_name)
}

fn try_extract(output: &ort::value::DynValue) -> Result<Option<f64>> {
    let dtype = output.dtype();

    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return probability_from_tensor(&dims, data).map(Some);
    }

    if DynSequenceValueType::can_downcast(&dtype) {
        let allocator = Allocator::default();
        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
        let first = maps
            .first()
            .ok_or_else(|| anyhow::anyhow!("Empty probability sequence"))?;
        let kv_pairs = first.try_extract_key_values::<i64, f32>()?;

        return probability_from_class_map(&kv_pairs).map(Some);
    }

    Ok(None)
}

/// Class 1 probability from a `[batch, classes]` or `[classes]` tensor.
pub(crate) fn probability_from_tensor(dims: &[i64], data: &[f32]) -> Result<f64> {
    let classes = dims.last().copied().unwrap_or(0);
    match classes {
        c if c >= 2 && data.len() >= 2 => Ok(data[1] as f64),
        1 if !data.is_empty() => Ok(data[0] as f64),
        _ => anyhow::bail!("unexpected probability tensor shape {:?}", dims),
    }
}

/// Class 1 probability from `(class_id, probability)` pairs.
pub(crate) fn probability_from_class_map(kv_pairs: &[(i64, f32)]) -> Result<f64> {
    if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 1) {
        return Ok(*prob as f64);
    }
    if let Some((_, prob)) = kv_pairs.iter().find(|(class_id, _)| *class_id == 0) {
        return Ok(1.0 - *prob as f64);
    }
    anyhow::bail!("No probability found in map")
}
