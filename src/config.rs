//! Configuration management for the risk scoring service

use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub nats: NatsConfig,
    pub models: ModelsConfig,
    pub pipeline: PipelineConfig,
    pub logging: LoggingConfig,
}

/// NATS connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    /// NATS server URL
    pub url: String,
    /// Subject answering fraud batch scoring requests
    pub fraud_subject: String,
    /// Subject answering loan eligibility requests
    pub loan_subject: String,
    /// Subject answering liveness probes
    pub health_subject: String,
    /// Subject fraud alerts are published to
    pub alert_subject: String,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Directory containing the model and scaler artifacts
    pub models_dir: String,
    /// Fraud classifier file name
    #[serde(default = "default_fraud_model")]
    pub fraud_model: String,
    /// Loan classifier file name
    #[serde(default = "default_loan_model")]
    pub loan_model: String,
    /// Loan feature scaler file name
    #[serde(default = "default_loan_scaler")]
    pub loan_scaler: String,
    /// Number of threads for ONNX inference per model (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
}

fn default_fraud_model() -> String {
    "fraud_model.onnx".to_string()
}

fn default_loan_model() -> String {
    "loan_model.onnx".to_string()
}

fn default_loan_scaler() -> String {
    "loan_scaler.json".to_string()
}

fn default_onnx_threads() -> usize {
    1
}

impl ModelsConfig {
    pub fn fraud_model_path(&self) -> PathBuf {
        Path::new(&self.models_dir).join(&self.fraud_model)
    }

    pub fn loan_model_path(&self) -> PathBuf {
        Path::new(&self.models_dir).join(&self.loan_model)
    }

    pub fn loan_scaler_path(&self) -> PathBuf {
        Path::new(&self.models_dir).join(&self.loan_scaler)
    }
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Number of requests processed concurrently
    pub workers: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            nats: NatsConfig {
                url: "nats://localhost:4222".to_string(),
                fraud_subject: "risk.fraud.score".to_string(),
                loan_subject: "risk.loan.score".to_string(),
                health_subject: "risk.health".to_string(),
                alert_subject: "risk.fraud.alerts".to_string(),
            },
            models: ModelsConfig {
                models_dir: "models".to_string(),
                fraud_model: default_fraud_model(),
                loan_model: default_loan_model(),
                loan_scaler: default_loan_scaler(),
                onnx_threads: 1,
            },
            pipeline: PipelineConfig { workers: 4 },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.nats.url, "nats://localhost:4222");
        assert_eq!(config.nats.fraud_subject, "risk.fraud.score");
        assert_eq!(config.models.onnx_threads, 1);
        assert_eq!(config.pipeline.workers, 4);
    }

    #[test]
    fn test_artifact_paths() {
        let config = AppConfig::default();
        assert_eq!(
            config.models.fraud_model_path(),
            PathBuf::from("models/fraud_model.onnx")
        );
        assert_eq!(
            config.models.loan_scaler_path(),
            PathBuf::from("models/loan_scaler.json")
        );
    }
}
