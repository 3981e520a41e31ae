//! Feature derivation for fraud scoring.
//!
//! Mirrors the preprocessing applied when the fraud model was trained; the
//! engineered columns and their order are part of the model contract.

use crate::error::{ScoreError, ScoreResult};
use crate::features::require_non_negative;
use crate::types::transaction::{DerivedTransaction, TransactionRecord};

/// Column order of the fraud feature matrix.
///
/// The model is order-sensitive: any reordering silently corrupts
/// predictions. Deriver and scorer both reference this constant.
pub const FRAUD_FEATURE_COLUMNS: [&str; 14] = [
    "amount",
    "hour",
    "is_foreign",
    "is_high_risk",
    "userId",
    "balance",
    "avg_amount",
    "high_amount",
    "night_transaction",
    "amount_hour_ratio",
    "foreign_high",
    "risk_high",
    "amount_to_avg_ratio",
    "balance_to_avg_ratio",
];

/// Derives the engineered fraud features from raw transactions.
///
/// Pure and per-record: deriving a batch is exactly deriving each record
/// alone, in order. Ratio denominators are offset by +1 so the derivation is
/// total over the validated domain.
pub struct FraudFeatureDeriver;

impl FraudFeatureDeriver {
    pub fn new() -> Self {
        Self
    }

    /// Validate and augment a single record.
    pub fn derive(&self, record: &TransactionRecord) -> ScoreResult<DerivedTransaction> {
        let amount = require_non_negative("amount", record.amount)?;
        let balance = require_non_negative("balance", record.balance)?;
        let avg_amount = require_non_negative("avg_amount", record.avg_amount)?;

        if record.hour > 23 {
            return Err(ScoreError::InvalidNumericInput {
                field: "hour",
                value: record.hour as f64,
                reason: "outside 0..=23",
            });
        }

        let high_amount = u8::from(amount > balance * 1.5);
        let night_transaction = u8::from(record.hour < 6 || record.hour > 22);

        Ok(DerivedTransaction {
            record: record.clone(),
            high_amount,
            night_transaction,
            amount_hour_ratio: amount / (record.hour as f64 + 1.0),
            foreign_high: u8::from(record.is_foreign) * high_amount,
            risk_high: u8::from(record.is_high_risk) * high_amount,
            amount_to_avg_ratio: amount / (avg_amount + 1.0),
            balance_to_avg_ratio: balance / (avg_amount + 1.0),
        })
    }

    /// Derive a whole batch, preserving input order.
    ///
    /// Fails on the first invalid record and returns no partial output: a
    /// batch is scored as a unit or not at all.
    pub fn derive_batch(
        &self,
        records: &[TransactionRecord],
    ) -> ScoreResult<Vec<DerivedTransaction>> {
        records.iter().map(|record| self.derive(record)).collect()
    }

    /// Flatten a derived record into one model input row, following
    /// [`FRAUD_FEATURE_COLUMNS`].
    pub fn feature_vector(&self, derived: &DerivedTransaction) -> Vec<f32> {
        let tx = &derived.record;
        vec![
            tx.amount as f32,
            tx.hour as f32,
            u8::from(tx.is_foreign) as f32,
            u8::from(tx.is_high_risk) as f32,
            tx.user_id as f32,
            tx.balance as f32,
            tx.avg_amount as f32,
            derived.high_amount as f32,
            derived.night_transaction as f32,
            derived.amount_hour_ratio as f32,
            derived.foreign_high as f32,
            derived.risk_high as f32,
            derived.amount_to_avg_ratio as f32,
            derived.balance_to_avg_ratio as f32,
        ]
    }

    /// Number of columns in the model input.
    pub fn feature_count(&self) -> usize {
        FRAUD_FEATURE_COLUMNS.len()
    }
}

impl Default for FraudFeatureDeriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: f64, hour: u32, balance: f64, avg_amount: f64) -> TransactionRecord {
        TransactionRecord {
            amount,
            hour,
            is_foreign: false,
            is_high_risk: false,
            user_id: 1,
            balance,
            avg_amount,
        }
    }

    #[test]
    fn test_derived_fields_concrete() {
        let deriver = FraudFeatureDeriver::new();
        let mut tx = record(600.0, 2, 300.0, 100.0);
        tx.is_foreign = true;
        tx.is_high_risk = true;

        let derived = deriver.derive(&tx).unwrap();

        assert_eq!(derived.high_amount, 1); // 600 > 450
        assert_eq!(derived.night_transaction, 1);
        assert_eq!(derived.amount_hour_ratio, 200.0);
        assert_eq!(derived.foreign_high, 1);
        assert_eq!(derived.risk_high, 1);
        assert!((derived.amount_to_avg_ratio - 600.0 / 101.0).abs() < 1e-12);
        assert!((derived.balance_to_avg_ratio - 300.0 / 101.0).abs() < 1e-12);
    }

    #[test]
    fn test_compound_flags_need_high_amount() {
        let deriver = FraudFeatureDeriver::new();
        let mut tx = record(100.0, 12, 900.0, 100.0);
        tx.is_foreign = true;
        tx.is_high_risk = true;

        let derived = deriver.derive(&tx).unwrap();

        assert_eq!(derived.high_amount, 0);
        assert_eq!(derived.foreign_high, 0);
        assert_eq!(derived.risk_high, 0);
    }

    #[test]
    fn test_night_window_boundaries() {
        let deriver = FraudFeatureDeriver::new();

        for (hour, expected) in [(0, 1), (5, 1), (6, 0), (22, 0), (23, 1)] {
            let derived = deriver.derive(&record(10.0, hour, 100.0, 10.0)).unwrap();
            assert_eq!(derived.night_transaction, expected, "hour {}", hour);
        }
    }

    #[test]
    fn test_batch_matches_singleton() {
        let deriver = FraudFeatureDeriver::new();
        let a = record(600.0, 2, 300.0, 100.0);
        let b = record(25.0, 15, 5000.0, 400.0);

        let alone = deriver.derive(&a).unwrap();
        let batch = deriver.derive_batch(&[a, b]).unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], alone);
    }

    #[test]
    fn test_batch_preserves_order() {
        let deriver = FraudFeatureDeriver::new();
        let records: Vec<TransactionRecord> = (0..5)
            .map(|i| {
                let mut tx = record(10.0 * (i + 1) as f64, 12, 100.0, 10.0);
                tx.user_id = i;
                tx
            })
            .collect();

        let derived = deriver.derive_batch(&records).unwrap();

        for (i, d) in derived.iter().enumerate() {
            assert_eq!(d.record.user_id, i as i64);
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let deriver = FraudFeatureDeriver::new();

        let negative = record(-5.0, 12, 100.0, 10.0);
        assert!(matches!(
            deriver.derive(&negative),
            Err(ScoreError::InvalidNumericInput { field: "amount", .. })
        ));

        let non_finite = record(f64::NAN, 12, 100.0, 10.0);
        assert!(deriver.derive(&non_finite).is_err());

        let bad_hour = record(5.0, 24, 100.0, 10.0);
        assert!(matches!(
            deriver.derive(&bad_hour),
            Err(ScoreError::InvalidNumericInput { field: "hour", .. })
        ));
    }

    #[test]
    fn test_invalid_record_rejects_whole_batch() {
        let deriver = FraudFeatureDeriver::new();
        let good = record(10.0, 12, 100.0, 10.0);
        let bad = record(-1.0, 12, 100.0, 10.0);

        assert!(deriver.derive_batch(&[good, bad]).is_err());
    }

    #[test]
    fn test_feature_vector_follows_column_order() {
        let deriver = FraudFeatureDeriver::new();
        let mut tx = record(600.0, 2, 300.0, 100.0);
        tx.is_foreign = true;
        tx.user_id = 77;

        let derived = deriver.derive(&tx).unwrap();
        let vector = deriver.feature_vector(&derived);

        assert_eq!(vector.len(), FRAUD_FEATURE_COLUMNS.len());
        assert_eq!(vector[0], 600.0); // amount
        assert_eq!(vector[1], 2.0); // hour
        assert_eq!(vector[2], 1.0); // is_foreign
        assert_eq!(vector[3], 0.0); // is_high_risk
        assert_eq!(vector[4], 77.0); // userId
        assert_eq!(vector[7], 1.0); // high_amount
        assert_eq!(vector[9], 200.0); // amount_hour_ratio
    }
}
