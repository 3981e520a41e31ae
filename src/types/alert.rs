//! Fraud alert messages published for flagged transactions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Alert published to the alert subject when a transaction is classified as
/// fraud. Emitted by the serving loop, downstream of response assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudAlert {
    /// Unique alert identifier
    pub alert_id: String,

    /// User the flagged transaction belongs to
    pub user_id: i64,

    /// Transaction amount
    pub amount: f64,

    /// Fraud probability reported by the model
    pub fraud_probability: f64,

    /// Alert generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl FraudAlert {
    pub fn new(user_id: i64, amount: f64, fraud_probability: f64) -> Self {
        Self {
            alert_id: uuid::Uuid::new_v4().to_string(),
            user_id,
            amount,
            fraud_probability,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraud_alert_serialization() {
        let alert = FraudAlert::new(42, 750.0, 0.93);

        let json = serde_json::to_string(&alert).unwrap();
        let deserialized: FraudAlert = serde_json::from_str(&json).unwrap();

        assert_eq!(alert.alert_id, deserialized.alert_id);
        assert_eq!(alert.user_id, 42);
        assert_eq!(alert.fraud_probability, 0.93);
    }
}
