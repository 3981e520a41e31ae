//! Feature derivation for loan eligibility scoring.

use crate::error::ScoreResult;
use crate::features::require_non_negative;
use crate::types::loan::LoanRecord;

/// Column order of the loan feature vector; the fitted scaler and the model
/// both expect exactly this ordering.
pub const LOAN_FEATURE_COLUMNS: [&str; 5] = [
    "income",
    "credit_score",
    "requested_amount",
    "balance",
    "avg_transaction",
];

/// Projects a loan application onto the model's five input columns.
///
/// The identity documents (`pan`, `adhar`) are dropped here and never reach
/// the scaler or the model.
pub struct LoanFeatureDeriver;

impl LoanFeatureDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Validate the numeric fields and build the unscaled feature row,
    /// following [`LOAN_FEATURE_COLUMNS`].
    pub fn derive(&self, record: &LoanRecord) -> ScoreResult<Vec<f32>> {
        Ok(vec![
            require_non_negative("income", record.income)? as f32,
            require_non_negative("credit_score", record.credit_score)? as f32,
            require_non_negative("requested_amount", record.requested_amount)? as f32,
            require_non_negative("balance", record.balance)? as f32,
            require_non_negative("avg_transaction", record.avg_transaction)? as f32,
        ])
    }

    /// Number of columns in the model input.
    pub fn feature_count(&self) -> usize {
        LOAN_FEATURE_COLUMNS.len()
    }
}

impl Default for LoanFeatureDeriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> LoanRecord {
        LoanRecord {
            income: 55000.0,
            pan: "ABCDE1234F".to_string(),
            adhar: "1234-5678-9012".to_string(),
            credit_score: 710.0,
            requested_amount: 20000.0,
            balance: 18000.0,
            avg_transaction: 2500.0,
        }
    }

    #[test]
    fn test_feature_vector_follows_column_order() {
        let deriver = LoanFeatureDeriver::new();
        let vector = deriver.derive(&application()).unwrap();

        assert_eq!(vector.len(), LOAN_FEATURE_COLUMNS.len());
        assert_eq!(vector, vec![55000.0, 710.0, 20000.0, 18000.0, 2500.0]);
    }

    #[test]
    fn test_identity_fields_never_enter_vector() {
        let deriver = LoanFeatureDeriver::new();

        let first = application();
        let mut second = application();
        second.pan = "ZZZZZ9999Z".to_string();
        second.adhar = "0000-0000-0000".to_string();

        assert_eq!(
            deriver.derive(&first).unwrap(),
            deriver.derive(&second).unwrap()
        );
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let deriver = LoanFeatureDeriver::new();

        let mut record = application();
        record.credit_score = -1.0;
        assert!(deriver.derive(&record).is_err());

        let mut record = application();
        record.income = f64::INFINITY;
        assert!(deriver.derive(&record).is_err());
    }
}
