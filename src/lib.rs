//! Risk Scoring Service Library
//!
//! Scores payment transactions for fraud risk and loan applications for
//! eligibility using pre-trained tabular classifiers, served over NATS.

pub mod config;
pub mod consumer;
pub mod error;
pub mod features;
pub mod metrics;
pub mod models;
pub mod pipeline;
pub mod producer;
pub mod types;

pub use config::AppConfig;
pub use consumer::RequestConsumer;
pub use error::{ScoreError, ScoreResult};
pub use features::{FraudFeatureDeriver, LoanFeatureDeriver, StandardScaler};
pub use metrics::ScoringMetrics;
pub use models::{ModelLoader, Scorer};
pub use pipeline::{FraudPipeline, LoanPipeline};
pub use producer::{AlertProducer, Responder};
pub use types::{loan::LoanRecord, transaction::TransactionRecord};
