//! Loan eligibility pipeline: derive, scale, score, assemble.

use crate::error::ScoreResult;
use crate::features::loan::{LoanFeatureDeriver, LOAN_FEATURE_COLUMNS};
use crate::features::scaler::StandardScaler;
use crate::models::{LoadedModel, Scorer};
use crate::types::loan::LoanRecord;
use crate::types::result::LoanDecision;

/// End-to-end loan eligibility scoring. Holds the immutable loan classifier
/// and the scaler fitted at training time; shares no state with the fraud
/// pipeline.
///
/// The decision is the classifier's native label, not a 0.5 threshold on
/// the probability. The two policies can disagree when the model's internal
/// threshold differs from 0.5; that asymmetry with the fraud pipeline is
/// deliberate.
pub struct LoanPipeline {
    deriver: LoanFeatureDeriver,
    scaler: StandardScaler,
    scorer: Scorer,
}

impl LoanPipeline {
    pub fn new(model: LoadedModel, scaler: StandardScaler) -> Self {
        Self {
            deriver: LoanFeatureDeriver::new(),
            scaler,
            scorer: Scorer::new(model, LOAN_FEATURE_COLUMNS.len()),
        }
    }

    /// Score a single application.
    pub fn score(&self, record: &LoanRecord) -> ScoreResult<LoanDecision> {
        let features = self.deriver.derive(record)?;
        let scaled = self.scaler.transform(&features)?;
        let matrix = vec![scaled];

        let probabilities = self.scorer.predict_proba(&matrix)?;
        let labels = self.scorer.predict(&matrix)?;

        Ok(assemble(labels[0], probabilities[0]))
    }

    pub fn feature_count(&self) -> usize {
        self.deriver.feature_count()
    }
}

/// Assemble the response from the model's native label and the positive
/// class probability. The label is reported as-is, never re-derived.
fn assemble(label: i64, probability: f64) -> LoanDecision {
    LoanDecision {
        eligible: label != 0,
        probability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembler_reports_native_label() {
        // label and 0.5-thresholded probability disagree; the label wins
        let decision = assemble(0, 0.62);
        assert!(!decision.eligible);
        assert_eq!(decision.probability, 0.62);

        let decision = assemble(1, 0.38);
        assert!(decision.eligible);
    }

    #[test]
    fn test_assembler_agreeing_case() {
        let decision = assemble(1, 0.91);
        assert!(decision.eligible);
        assert_eq!(decision.probability, 0.91);
    }
}
