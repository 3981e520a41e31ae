//! ONNX model loader

use crate::error::{ScoreError, ScoreResult};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loaded ONNX classifier with its resolved input/output names.
pub struct LoadedModel {
    /// Model name used in logs and error messages
    pub name: String,
    /// ONNX Runtime session
    pub session: Session,
    /// Input name for the feature matrix
    pub input_name: String,
    /// Output carrying per-class probabilities
    pub prob_output: String,
    /// Output carrying the classifier's native binary decision
    pub label_output: String,
}

/// Loader for ONNX classifier artifacts.
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread).
    pub fn new() -> ScoreResult<Self> {
        Self::with_threads(1)
    }

    /// Create a new model loader with the specified thread count.
    pub fn with_threads(onnx_threads: usize) -> ScoreResult<Self> {
        ort::init().commit()?;
        info!(onnx_threads = onnx_threads, "ONNX Runtime initialized");
        Ok(Self { onnx_threads })
    }

    /// Load a classifier from file.
    ///
    /// An absent or unreadable artifact is fatal at startup, never a
    /// per-request condition.
    pub fn load_model<P: AsRef<Path>>(&self, path: P, name: &str) -> ScoreResult<LoadedModel> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ScoreError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .map_err(|e| ScoreError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let prob_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("prob") || o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .last()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "probabilities".to_string())
            });

        // Classifier exports list the label first; fall back to that when no
        // output is named for it.
        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .or_else(|| session.outputs.first())
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "label".to_string());

        info!(
            model = %name,
            input = %input_name,
            prob_output = %prob_output,
            label_output = %label_output,
            "Model loaded successfully"
        );

        Ok(LoadedModel {
            name: name.to_string(),
            session,
            input_name,
            prob_output,
            label_output,
        })
    }
}
