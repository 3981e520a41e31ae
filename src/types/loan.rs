//! Loan application records

use serde::{Deserialize, Serialize};

/// A loan application submitted for eligibility scoring.
///
/// `pan` and `adhar` are identity documents carried through the pipeline but
/// never used as model inputs. Both snake_case and camelCase spellings are
/// accepted for the numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Monthly income, non-negative
    pub income: f64,

    /// PAN document number, opaque
    pub pan: String,

    /// Aadhaar document number, opaque
    pub adhar: String,

    /// Credit score, non-negative
    #[serde(alias = "creditScore")]
    pub credit_score: f64,

    /// Requested loan amount, non-negative
    #[serde(alias = "requestedAmount")]
    pub requested_amount: f64,

    /// Current account balance, non-negative
    pub balance: f64,

    /// Average transaction amount, non-negative
    #[serde(alias = "avgTransaction")]
    pub avg_transaction: f64,
}
