//! Scoring response payloads

use crate::error::ScoreError;
use crate::types::transaction::DerivedTransaction;
use serde::{Deserialize, Serialize};

/// Per-transaction fraud scoring result.
///
/// `input` echoes the original record together with its derived features.
/// `is_fraud` is 1 only when the probability is strictly above the decision
/// threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudScore {
    pub input: DerivedTransaction,
    pub fraud_probability: f64,
    pub is_fraud: u8,
}

/// Response envelope for a fraud batch, results in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudBatchResponse {
    pub results: Vec<FraudScore>,
}

/// Loan eligibility result for a single application.
///
/// `eligible` is the classifier's native label, not re-derived from the
/// probability; the two can disagree when the model's internal threshold
/// differs from 0.5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDecision {
    pub eligible: bool,
    pub probability: f64,
}

/// Error payload sent to the reply subject when scoring fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

impl ErrorResponse {
    pub fn from_score_error(err: &ScoreError) -> Self {
        Self {
            error: err.to_string(),
            kind: err.kind().to_string(),
        }
    }

    pub fn invalid_request(err: impl std::fmt::Display) -> Self {
        Self {
            error: err.to_string(),
            kind: "invalid_request".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_decision_serialization() {
        let decision = LoanDecision {
            eligible: true,
            probability: 0.84,
        };

        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(json, r#"{"eligible":true,"probability":0.84}"#);
    }

    #[test]
    fn test_error_response_carries_kind() {
        let err = ScoreError::FeatureShape {
            model: "fraud".to_string(),
            expected: 14,
            actual: 12,
        };

        let response = ErrorResponse::from_score_error(&err);
        assert_eq!(response.kind, "feature_shape");
        assert!(response.error.contains("14"));
    }
}
