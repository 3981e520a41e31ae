//! Scoring Test Client
//!
//! Generates synthetic transactions and loan applications and submits them
//! to the scoring service over NATS request/reply.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Transaction structure matching the service's expected format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Transaction {
    amount: f64,
    hour: u32,
    is_foreign: bool,
    is_high_risk: bool,
    #[serde(rename = "userId")]
    user_id: i64,
    balance: f64,
    avg_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FraudBatchRequest {
    transactions: Vec<Transaction>,
}

/// Loan application structure matching the service's expected format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoanApplication {
    income: f64,
    pan: String,
    adhar: String,
    credit_score: f64,
    requested_amount: f64,
    balance: f64,
    avg_transaction: f64,
}

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }

    /// Generate a transaction that should look legitimate
    fn generate_legitimate(&mut self) -> Transaction {
        let avg_amount = self.rng.gen_range(50.0..400.0);
        Transaction {
            amount: avg_amount * self.rng.gen_range(0.5..1.5),
            hour: self.rng.gen_range(8..20),
            is_foreign: false,
            is_high_risk: false,
            user_id: self.rng.gen_range(0..20_000),
            balance: self.rng.gen_range(800.0..5000.0),
            avg_amount,
        }
    }

    /// Generate a transaction matching the trained fraud patterns
    fn generate_suspicious(&mut self) -> Transaction {
        let avg_amount = self.rng.gen_range(50.0..200.0);
        let balance = self.rng.gen_range(100.0..400.0);
        Transaction {
            amount: balance * self.rng.gen_range(1.6..4.0), // spend spike
            hour: self.rng.gen_range(0..6),                 // night time
            is_foreign: true,
            is_high_risk: self.rng.gen_bool(0.5),
            user_id: self.rng.gen_range(0..20_000),
            balance,
            avg_amount,
        }
    }

    fn generate_loan(&mut self) -> LoanApplication {
        let income = self.rng.gen_range(15000.0..150000.0);
        LoanApplication {
            income,
            pan: format!("PAN{:07}", self.rng.gen_range(0..10_000_000)),
            adhar: format!(
                "{:04}-{:04}-{:04}",
                self.rng.gen_range(0..10_000),
                self.rng.gen_range(0..10_000),
                self.rng.gen_range(0..10_000)
            ),
            credit_score: self.rng.gen_range(300.0..850.0),
            requested_amount: income * self.rng.gen_range(0.2..2.0),
            balance: self.rng.gen_range(0.0..80_000.0),
            avg_transaction: self.rng.gen_range(100.0..15_000.0),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("score_client=info".parse()?),
        )
        .init();

    info!("Starting Scoring Test Client");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("nats://localhost:4222");
    let fraud_subject = args
        .get(2)
        .map(|s| s.as_str())
        .unwrap_or("risk.fraud.score");
    let loan_subject = args.get(3).map(|s| s.as_str()).unwrap_or("risk.loan.score");
    let count: u64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(20);
    let fraud_rate: f64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(0.2);
    let delay_ms: u64 = args.get(6).and_then(|s| s.parse().ok()).unwrap_or(200);

    info!(
        nats_url = %nats_url,
        fraud_subject = %fraud_subject,
        loan_subject = %loan_subject,
        count = count,
        fraud_rate = fraud_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, fraud_rate, delay_ms).await;
        }
    };

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Submitting {} scoring requests...", count);

    for i in 0..count {
        // Alternate fraud batches and loan applications
        if i % 2 == 0 {
            let transactions: Vec<Transaction> = (0..4)
                .map(|_| {
                    if rng.gen_bool(fraud_rate) {
                        generator.generate_suspicious()
                    } else {
                        generator.generate_legitimate()
                    }
                })
                .collect();

            let request = FraudBatchRequest { transactions };
            let payload = serde_json::to_vec(&request)?;

            match client.request(fraud_subject.to_string(), payload.into()).await {
                Ok(response) => {
                    let body = String::from_utf8_lossy(&response.payload);
                    info!(request = i + 1, "Fraud response: {}", body);
                }
                Err(e) => warn!(request = i + 1, error = %e, "Fraud request failed"),
            }
        } else {
            let application = generator.generate_loan();
            let payload = serde_json::to_vec(&application)?;

            match client.request(loan_subject.to_string(), payload.into()).await {
                Ok(response) => {
                    let body = String::from_utf8_lossy(&response.payload);
                    info!(request = i + 1, "Loan response: {}", body);
                }
                Err(e) => warn!(request = i + 1, error = %e, "Loan request failed"),
            }
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!("Completed {} requests", count);

    Ok(())
}

async fn run_dry_mode(count: u64, fraud_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        if i % 2 == 0 {
            let transaction = if rng.gen_bool(fraud_rate) {
                generator.generate_suspicious()
            } else {
                generator.generate_legitimate()
            };
            let json = serde_json::to_string_pretty(&transaction)?;
            info!("Sample transaction {}:\n{}", i + 1, json);
        } else {
            let application = generator.generate_loan();
            let json = serde_json::to_string_pretty(&application)?;
            info!("Sample loan application {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
