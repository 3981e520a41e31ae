//! The two scoring pipelines.
//!
//! Both follow the same shape (feature deriver, scorer, result assembler,
//! data flowing strictly forward) but hold separate models, separate
//! feature sets and separate decision policies.

pub mod fraud;
pub mod loan;

pub use fraud::{FraudPipeline, FRAUD_DECISION_THRESHOLD};
pub use loan::LoanPipeline;
