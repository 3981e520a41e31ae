//! Batch scorer over a loaded ONNX classifier

use crate::error::{ScoreError, ScoreResult};
use crate::models::loader::LoadedModel;
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::sync::RwLock;
use tracing::debug;

/// Applies one immutable trained classifier to feature matrices.
///
/// Stateless with respect to calls: scoring one matrix never affects the
/// next. The session sits behind an `RwLock` because the runtime requires
/// exclusive access to execute a session; callers see a plain `&self` API.
///
/// Every row is shape-checked against the expected column count before the
/// session runs; a silent mismatch would produce plausible-looking but
/// meaningless probabilities.
pub struct Scorer {
    model: RwLock<LoadedModel>,
    name: String,
    expected_features: usize,
}

impl Scorer {
    pub fn new(model: LoadedModel, expected_features: usize) -> Self {
        let name = model.name.clone();
        Self {
            model: RwLock::new(model),
            name,
            expected_features,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expected_features(&self) -> usize {
        self.expected_features
    }

    /// Positive-class probability for every row, in row order.
    pub fn predict_proba(&self, matrix: &[Vec<f32>]) -> ScoreResult<Vec<f64>> {
        self.check_shape(matrix)?;
        if matrix.is_empty() {
            return Ok(Vec::new());
        }

        let n_rows = matrix.len();
        let mut guard = self.lock_model()?;
        let model = &mut *guard;

        let input = self.input_tensor(matrix)?;
        let outputs = model.session.run(ort::inputs![&model.input_name => input])?;

        let probs = Self::probabilities(&outputs, &model.prob_output, n_rows, &self.name)?;
        debug!(model = %self.name, rows = n_rows, "Probabilities extracted");
        Ok(probs)
    }

    /// The classifier's native binary decision for every row, in row order.
    /// Never re-derived from the probability output.
    pub fn predict(&self, matrix: &[Vec<f32>]) -> ScoreResult<Vec<i64>> {
        self.check_shape(matrix)?;
        if matrix.is_empty() {
            return Ok(Vec::new());
        }

        let n_rows = matrix.len();
        let mut guard = self.lock_model()?;
        let model = &mut *guard;

        let input = self.input_tensor(matrix)?;
        let outputs = model.session.run(ort::inputs![&model.input_name => input])?;

        let labels = Self::labels(&outputs, &model.label_output, n_rows, &self.name)?;
        debug!(model = %self.name, rows = n_rows, "Labels extracted");
        Ok(labels)
    }

    fn check_shape(&self, matrix: &[Vec<f32>]) -> ScoreResult<()> {
        check_matrix_shape(&self.name, self.expected_features, matrix)
    }

    fn lock_model(&self) -> ScoreResult<std::sync::RwLockWriteGuard<'_, LoadedModel>> {
        self.model
            .write()
            .map_err(|e| ScoreError::Inference(format!("model lock poisoned: {e}")))
    }

    fn input_tensor(&self, matrix: &[Vec<f32>]) -> ScoreResult<Tensor<f32>> {
        let shape = vec![matrix.len() as i64, self.expected_features as i64];
        let data = matrix.concat();
        Ok(Tensor::from_array((shape, data))?)
    }

    /// Extract per-row positive-class probabilities.
    ///
    /// Handles both tensor outputs (`[N,2]` or `[N,1]` float) and the
    /// `seq(map(int64,float))` shape some exporters emit.
    fn probabilities(
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
        n_rows: usize,
        model_name: &str,
    ) -> ScoreResult<Vec<f64>> {
        if let Some(output) = outputs.get(output_name) {
            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                return Self::probs_from_tensor(&shape, data, n_rows, model_name);
            }

            let dtype = output.dtype();
            if DynSequenceValueType::can_downcast(&dtype) {
                return Self::probs_from_sequence_map(output, n_rows, model_name);
            }
        }

        // Fallback: first non-label output that extracts
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }

            if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
                return Self::probs_from_tensor(&shape, data, n_rows, model_name);
            }

            let dtype = output.dtype();
            if DynSequenceValueType::can_downcast(&dtype) {
                if let Ok(probs) = Self::probs_from_sequence_map(&output, n_rows, model_name) {
                    return Ok(probs);
                }
            }
        }

        Err(ScoreError::Inference(format!(
            "model `{model_name}` returned no probability output"
        )))
    }

    fn probs_from_tensor(
        shape: &ort::tensor::Shape,
        data: &[f32],
        n_rows: usize,
        model_name: &str,
    ) -> ScoreResult<Vec<f64>> {
        let dims: Vec<i64> = shape.iter().copied().collect();

        if dims.len() == 2 && dims[0] as usize == n_rows {
            let n_classes = dims[1] as usize;
            if n_classes >= 2 {
                // [N, n_classes] - positive class is column 1
                return Ok((0..n_rows).map(|i| data[i * n_classes + 1] as f64).collect());
            }
            if n_classes == 1 {
                return Ok(data.iter().map(|&v| v as f64).collect());
            }
        }

        if dims.len() == 1 && dims[0] as usize == n_rows {
            // [N] - one positive-class score per row
            return Ok(data.iter().map(|&v| v as f64).collect());
        }

        Err(ScoreError::Inference(format!(
            "model `{model_name}` returned probability tensor with unexpected shape {dims:?}"
        )))
    }

    /// Extract probabilities from `seq(map(int64,float))` output, one map
    /// per row keyed by class id.
    fn probs_from_sequence_map(
        output: &ort::value::DynValue,
        n_rows: usize,
        model_name: &str,
    ) -> ScoreResult<Vec<f64>> {
        let allocator = Allocator::default();

        let sequence = output
            .downcast_ref::<DynSequenceValueType>()
            .map_err(|e| ScoreError::Inference(format!("failed to downcast to sequence: {e}")))?;

        let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

        if maps.len() != n_rows {
            return Err(ScoreError::Inference(format!(
                "model `{model_name}` returned {} probability maps for {} rows",
                maps.len(),
                n_rows
            )));
        }

        let mut probs = Vec::with_capacity(n_rows);
        for map_value in &maps {
            let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

            let prob = kv_pairs
                .iter()
                .find(|(class_id, _)| *class_id == 1)
                .map(|(_, p)| *p as f64)
                .or_else(|| {
                    kv_pairs
                        .iter()
                        .find(|(class_id, _)| *class_id == 0)
                        .map(|(_, p)| 1.0 - *p as f64)
                })
                .ok_or_else(|| {
                    ScoreError::Inference(format!(
                        "model `{model_name}` returned map without class probabilities"
                    ))
                })?;

            probs.push(prob);
        }

        Ok(probs)
    }

    fn labels(
        outputs: &ort::session::SessionOutputs,
        output_name: &str,
        n_rows: usize,
        model_name: &str,
    ) -> ScoreResult<Vec<i64>> {
        if let Some(output) = outputs.get(output_name) {
            if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
                if data.len() == n_rows {
                    return Ok(data.to_vec());
                }
            }

            // some exporters emit int32 labels
            if let Ok((_, data)) = output.try_extract_tensor::<i32>() {
                if data.len() == n_rows {
                    return Ok(data.iter().map(|&v| v as i64).collect());
                }
            }
        }

        Err(ScoreError::Inference(format!(
            "model `{model_name}` returned no usable label output"
        )))
    }
}

/// Reject a matrix whose rows do not match the model's expected column
/// count, before the session ever runs.
fn check_matrix_shape(model: &str, expected: usize, matrix: &[Vec<f32>]) -> ScoreResult<()> {
    for row in matrix {
        if row.len() != expected {
            return Err(ScoreError::FeatureShape {
                model: model.to_string(),
                expected,
                actual: row.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_shape_accepts_expected_width() {
        let matrix = vec![vec![0.0; 14], vec![1.0; 14]];
        assert!(check_matrix_shape("fraud", 14, &matrix).is_ok());
    }

    #[test]
    fn test_matrix_shape_rejects_missing_column() {
        let matrix = vec![vec![0.0; 14], vec![0.0; 13]];

        let err = check_matrix_shape("fraud", 14, &matrix).unwrap_err();
        assert!(matches!(
            err,
            ScoreError::FeatureShape {
                expected: 14,
                actual: 13,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_matrix_is_well_shaped() {
        assert!(check_matrix_shape("loan", 5, &[]).is_ok());
    }
}
