//! Fraud scoring pipeline: derive, score, assemble.

use crate::error::ScoreResult;
use crate::features::fraud::{FraudFeatureDeriver, FRAUD_FEATURE_COLUMNS};
use crate::models::{LoadedModel, Scorer};
use crate::types::result::FraudScore;
use crate::types::transaction::TransactionRecord;

/// Probability cutoff for the fraud decision, strict: a probability of
/// exactly 0.5 classifies as not fraud. A code constant rather than
/// configuration, since changing it silently changes the published decision
/// contract.
pub const FRAUD_DECISION_THRESHOLD: f64 = 0.5;

/// End-to-end fraud scoring: feature derivation, batch inference, response
/// assembly. Holds the immutable fraud classifier for the process lifetime;
/// shares no state with the loan pipeline.
pub struct FraudPipeline {
    deriver: FraudFeatureDeriver,
    scorer: Scorer,
}

impl FraudPipeline {
    pub fn new(model: LoadedModel) -> Self {
        Self {
            deriver: FraudFeatureDeriver::new(),
            scorer: Scorer::new(model, FRAUD_FEATURE_COLUMNS.len()),
        }
    }

    /// Score a batch of transactions, one result per record, input order
    /// preserved. Fails as a unit: an invalid record or a scoring error
    /// yields no partial results.
    pub fn score_batch(&self, records: &[TransactionRecord]) -> ScoreResult<Vec<FraudScore>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let derived = self.deriver.derive_batch(records)?;

        let matrix: Vec<Vec<f32>> = derived
            .iter()
            .map(|d| self.deriver.feature_vector(d))
            .collect();

        let probabilities = self.scorer.predict_proba(&matrix)?;

        Ok(derived
            .into_iter()
            .zip(probabilities)
            .map(|(input, fraud_probability)| FraudScore {
                is_fraud: decide(fraud_probability),
                fraud_probability,
                input,
            })
            .collect())
    }

    pub fn feature_count(&self) -> usize {
        self.deriver.feature_count()
    }
}

/// Fraud decision policy: strictly above the threshold.
fn decide(probability: f64) -> u8 {
    u8::from(probability > FRAUD_DECISION_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(decide(0.5), 0);
        assert_eq!(decide(0.5 + 1e-9), 1);
        assert_eq!(decide(0.49), 0);
        assert_eq!(decide(1.0), 1);
        assert_eq!(decide(0.0), 0);
    }
}
