//! Feature derivation: raw request fields to fixed-order model inputs

pub mod fraud;
pub mod loan;
pub mod scaler;

pub use fraud::{FraudFeatureDeriver, FRAUD_FEATURE_COLUMNS};
pub use loan::{LoanFeatureDeriver, LOAN_FEATURE_COLUMNS};
pub use scaler::StandardScaler;

use crate::error::{ScoreError, ScoreResult};

/// Domain check shared by both derivers: model inputs must be finite and
/// non-negative. Runs before any scoring; a violation rejects the batch.
pub(crate) fn require_non_negative(field: &'static str, value: f64) -> ScoreResult<f64> {
    if !value.is_finite() {
        Err(ScoreError::InvalidNumericInput {
            field,
            value,
            reason: "not finite",
        })
    } else if value < 0.0 {
        Err(ScoreError::InvalidNumericInput {
            field,
            value,
            reason: "negative",
        })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_negative() {
        assert_eq!(require_non_negative("amount", 12.5).unwrap(), 12.5);
        assert_eq!(require_non_negative("amount", 0.0).unwrap(), 0.0);

        assert!(require_non_negative("amount", -0.01).is_err());
        assert!(require_non_negative("amount", f64::NAN).is_err());
        assert!(require_non_negative("amount", f64::INFINITY).is_err());
    }
}
