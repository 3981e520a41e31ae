//! Error taxonomy for the scoring core

use std::path::PathBuf;
use thiserror::Error;

pub type ScoreResult<T> = Result<T, ScoreError>;

/// Errors surfaced by feature derivation, artifact loading and scoring.
///
/// Scoring errors are deterministic for a given input and are never retried;
/// they are reported to the caller with enough detail to tell the kinds
/// apart. A batch that fails at any stage fails as a unit.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The feature vector does not match the column count the model (or
    /// scaler) was trained with. Checked before any session runs; fatal for
    /// the whole batch.
    #[error("feature vector has {actual} columns but `{model}` expects {expected}")]
    FeatureShape {
        model: String,
        expected: usize,
        actual: usize,
    },

    /// A numeric field is non-finite or outside its declared domain.
    /// Raised at feature-derivation time, before any scoring occurs.
    #[error("invalid numeric input for `{field}`: {value} is {reason}")]
    InvalidNumericInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A model or scaler artifact is absent or unreadable. Fatal at process
    /// start, never a per-request condition.
    #[error("model artifact unavailable at {}: {reason}", path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    /// The ONNX runtime failed while executing a loaded session, or the
    /// session's outputs did not carry the expected probability/label shape.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<ort::Error> for ScoreError {
    fn from(err: ort::Error) -> Self {
        ScoreError::Inference(err.to_string())
    }
}

impl ScoreError {
    /// Stable tag used in error responses so callers can distinguish the
    /// taxonomy kinds without parsing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreError::FeatureShape { .. } => "feature_shape",
            ScoreError::InvalidNumericInput { .. } => "invalid_numeric_input",
            ScoreError::ModelUnavailable { .. } => "model_unavailable",
            ScoreError::Inference(_) => "inference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = ScoreError::FeatureShape {
            model: "fraud".to_string(),
            expected: 14,
            actual: 13,
        };
        assert_eq!(err.kind(), "feature_shape");

        let err = ScoreError::InvalidNumericInput {
            field: "amount",
            value: -1.0,
            reason: "negative",
        };
        assert_eq!(err.kind(), "invalid_numeric_input");
    }

    #[test]
    fn test_feature_shape_message() {
        let err = ScoreError::FeatureShape {
            model: "loan".to_string(),
            expected: 5,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "feature vector has 4 columns but `loan` expects 5"
        );
    }
}
