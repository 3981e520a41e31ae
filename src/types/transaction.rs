//! Transaction records for the fraud scoring pipeline

use serde::{Deserialize, Serialize};

/// A single transaction submitted for fraud scoring.
///
/// Field names follow the upstream wire format: `userId` is camel-case,
/// everything else snake_case. The record is constructed per request item,
/// never mutated, and dropped once the response is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction amount, non-negative
    pub amount: f64,

    /// Hour of day the transaction occurred (0-23)
    pub hour: u32,

    /// Whether the transaction originated abroad
    #[serde(default)]
    pub is_foreign: bool,

    /// Whether the counterparty is flagged as high risk
    #[serde(default)]
    pub is_high_risk: bool,

    /// User identifier, opaque to scoring
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Current account balance, non-negative
    pub balance: f64,

    /// The user's historical average transaction amount, non-negative
    pub avg_amount: f64,
}

/// Batch scoring request: one or more transactions, scored in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudBatchRequest {
    pub transactions: Vec<TransactionRecord>,
}

/// A transaction augmented with the seven engineered features.
///
/// Serializes flat (base and derived fields side by side) so the `input`
/// echo in the response carries the full derived row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedTransaction {
    #[serde(flatten)]
    pub record: TransactionRecord,

    /// 1 if amount exceeds 1.5x the balance
    pub high_amount: u8,

    /// 1 if the transaction happened before 06:00 or after 22:00
    pub night_transaction: u8,

    /// Amount normalized by the time-of-day bucket
    pub amount_hour_ratio: f64,

    /// Foreign transaction with a spend spike
    pub foreign_high: u8,

    /// High-risk counterparty with a spend spike
    pub risk_high: u8,

    /// Deviation from the user's personal baseline
    pub amount_to_avg_ratio: f64,

    /// Balance relative to the user's personal baseline
    pub balance_to_avg_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TransactionRecord {
        TransactionRecord {
            amount: 120.0,
            hour: 14,
            is_foreign: false,
            is_high_risk: false,
            user_id: 42,
            balance: 900.0,
            avg_amount: 100.0,
        }
    }

    #[test]
    fn test_transaction_serialization() {
        let tx = sample();

        let json = serde_json::to_string(&tx).unwrap();
        let deserialized: TransactionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(tx, deserialized);
        assert!(json.contains("\"userId\":42"));
    }

    #[test]
    fn test_risk_flags_default_false() {
        let json = r#"{"amount": 10.0, "hour": 9, "userId": 7, "balance": 50.0, "avg_amount": 5.0}"#;
        let tx: TransactionRecord = serde_json::from_str(json).unwrap();

        assert!(!tx.is_foreign);
        assert!(!tx.is_high_risk);
    }

    #[test]
    fn test_derived_serializes_flat() {
        let derived = DerivedTransaction {
            record: sample(),
            high_amount: 0,
            night_transaction: 0,
            amount_hour_ratio: 8.0,
            foreign_high: 0,
            risk_high: 0,
            amount_to_avg_ratio: 1.188,
            balance_to_avg_ratio: 8.910,
        };

        let value: serde_json::Value = serde_json::to_value(&derived).unwrap();
        let obj = value.as_object().unwrap();

        // base and derived fields live at the same level
        assert!(obj.contains_key("amount"));
        assert!(obj.contains_key("high_amount"));
        assert!(obj.contains_key("balance_to_avg_ratio"));
        assert!(!obj.contains_key("record"));
    }
}
