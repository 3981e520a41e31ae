//! Fitted feature scaler for the loan pipeline.

use crate::error::{ScoreError, ScoreResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Mean/variance scaler fitted at loan-model training time.
///
/// Serving must apply the exact statistics learned during training; using
/// different statistics silently invalidates every prediction. The artifact
/// is a JSON file with per-column `mean` and `scale` arrays, loaded once
/// alongside the model and never refitted.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Build a scaler from already-known statistics.
    pub fn from_stats(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    /// Load the scaler artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> ScoreResult<Self> {
        let path = path.as_ref();

        let raw = fs::read_to_string(path).map_err(|e| ScoreError::ModelUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let scaler: StandardScaler =
            serde_json::from_str(&raw).map_err(|e| ScoreError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        if scaler.mean.len() != scaler.scale.len() {
            return Err(ScoreError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: format!(
                    "mean has {} entries, scale has {}",
                    scaler.mean.len(),
                    scaler.scale.len()
                ),
            });
        }

        info!(
            path = %path.display(),
            features = scaler.mean.len(),
            "Feature scaler loaded"
        );

        Ok(scaler)
    }

    /// Number of columns the scaler was fitted on.
    pub fn feature_count(&self) -> usize {
        self.mean.len()
    }

    /// Apply the training-time normalization to one feature row.
    pub fn transform(&self, features: &[f32]) -> ScoreResult<Vec<f32>> {
        if features.len() != self.mean.len() {
            return Err(ScoreError::FeatureShape {
                model: "loan_scaler".to_string(),
                expected: self.mean.len(),
                actual: features.len(),
            });
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&mean, &scale))| ((x as f64 - mean) / scale) as f32)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_transform_applies_fitted_stats() {
        let scaler = StandardScaler::from_stats(vec![10.0, 100.0], vec![2.0, 50.0]);

        let scaled = scaler.transform(&[14.0, 25.0]).unwrap();

        assert_eq!(scaled, vec![2.0, -1.5]);
    }

    #[test]
    fn test_transform_rejects_wrong_width() {
        let scaler = StandardScaler::from_stats(vec![0.0; 5], vec![1.0; 5]);

        let err = scaler.transform(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            ScoreError::FeatureShape {
                expected: 5,
                actual: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_load_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"mean": [1.0, 2.0, 3.0], "scale": [0.5, 1.0, 2.0]}}"#
        )
        .unwrap();

        let scaler = StandardScaler::load(file.path()).unwrap();
        assert_eq!(scaler.feature_count(), 3);

        let scaled = scaler.transform(&[2.0, 2.0, 7.0]).unwrap();
        assert_eq!(scaled, vec![2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = StandardScaler::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ScoreError::ModelUnavailable { .. }));
    }

    #[test]
    fn test_load_rejects_mismatched_stats() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mean": [1.0, 2.0], "scale": [0.5]}}"#).unwrap();

        let err = StandardScaler::load(file.path()).unwrap_err();
        assert!(matches!(err, ScoreError::ModelUnavailable { .. }));
    }
}
