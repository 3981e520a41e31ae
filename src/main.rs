//! Risk Scoring Service - Main Entry Point
//!
//! Serves fraud batch scoring and loan eligibility requests over NATS
//! request/reply, publishing alerts for flagged transactions. Requests are
//! processed in parallel against the artifacts loaded once at startup.

use anyhow::Result;
use futures::StreamExt;
use risk_scoring_service::{
    config::AppConfig,
    consumer::RequestConsumer,
    features::StandardScaler,
    metrics::{MetricsReporter, ScoringMetrics},
    models::ModelLoader,
    pipeline::{FraudPipeline, LoanPipeline},
    producer::{AlertProducer, Responder},
    types::alert::FraudAlert,
    types::loan::LoanRecord,
    types::result::{ErrorResponse, FraudBatchResponse},
    types::transaction::FraudBatchRequest,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("risk_scoring_service=info".parse()?),
        )
        .init();

    info!("Starting Risk Scoring Service");

    // Load configuration
    let config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    // Initialize metrics
    let metrics = Arc::new(ScoringMetrics::new());

    // Load model artifacts; absent artifacts are fatal here, before any
    // request is accepted
    let loader = ModelLoader::with_threads(config.models.onnx_threads)?;
    let fraud_model = loader.load_model(config.models.fraud_model_path(), "fraud")?;
    let loan_model = loader.load_model(config.models.loan_model_path(), "loan")?;
    let scaler = StandardScaler::load(config.models.loan_scaler_path())?;

    let fraud_pipeline = Arc::new(FraudPipeline::new(fraud_model));
    info!(
        features = fraud_pipeline.feature_count(),
        "Fraud pipeline initialized"
    );

    let loan_pipeline = Arc::new(LoanPipeline::new(loan_model, scaler));
    info!(
        features = loan_pipeline.feature_count(),
        "Loan pipeline initialized"
    );

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    let responder = Responder::new(client.clone());
    let alerts = AlertProducer::new(client.clone(), &config.nats.alert_subject);

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(config.pipeline.workers));

    // Start metrics reporter (prints summary every 30 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 30);
        reporter.start().await;
    });

    // Health responder
    {
        let health = RequestConsumer::new(client.clone(), &config.nats.health_subject);
        let mut subscription = health.subscribe().await?;
        let responder = responder.clone();
        tokio::spawn(async move {
            while let Some(message) = subscription.next().await {
                if let Some(reply) = message.reply {
                    let payload = serde_json::json!({"status": "ok"});
                    if let Err(e) = responder.respond(reply.to_string(), &payload).await {
                        warn!(error = %e, "Failed to answer health probe");
                    }
                }
            }
        });
    }

    // Loan scoring worker
    {
        let consumer = RequestConsumer::new(client.clone(), &config.nats.loan_subject);
        let mut subscription = consumer.subscribe().await?;
        let pipeline = loan_pipeline.clone();
        let responder = responder.clone();
        let metrics = metrics.clone();
        let semaphore = semaphore.clone();

        tokio::spawn(async move {
            while let Some(message) = subscription.next().await {
                let permit = semaphore.clone().acquire_owned().await.unwrap();
                let pipeline = pipeline.clone();
                let responder = responder.clone();
                let metrics = metrics.clone();

                tokio::spawn(async move {
                    handle_loan(message, &pipeline, &responder, &metrics).await;
                    drop(permit);
                });
            }
        });
    }

    // Fraud scoring loop
    let consumer = RequestConsumer::new(client.clone(), &config.nats.fraud_subject);
    let mut subscription = consumer.subscribe().await?;

    info!(
        fraud = %config.nats.fraud_subject,
        loan = %config.nats.loan_subject,
        workers = config.pipeline.workers,
        "Serving scoring requests"
    );

    while let Some(message) = subscription.next().await {
        let permit = semaphore.clone().acquire_owned().await.unwrap();
        let pipeline = fraud_pipeline.clone();
        let responder = responder.clone();
        let alerts = alerts.clone();
        let metrics = metrics.clone();

        tokio::spawn(async move {
            handle_fraud(message, &pipeline, &responder, &alerts, &metrics).await;
            drop(permit);
        });
    }

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

async fn handle_fraud(
    message: async_nats::Message,
    pipeline: &FraudPipeline,
    responder: &Responder,
    alerts: &AlertProducer,
    metrics: &ScoringMetrics,
) {
    let start_time = Instant::now();
    let reply = message.reply.as_ref().map(|r| r.to_string());

    let request = match serde_json::from_slice::<FraudBatchRequest>(&message.payload) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Failed to deserialize fraud scoring request");
            if let Some(reply) = reply {
                let _ = responder
                    .respond(reply, &ErrorResponse::invalid_request(e))
                    .await;
            }
            return;
        }
    };

    match pipeline.score_batch(&request.transactions) {
        Ok(results) => {
            let processing_time = start_time.elapsed();

            let probabilities: Vec<f64> =
                results.iter().map(|r| r.fraud_probability).collect();
            let flagged: Vec<FraudAlert> = results
                .iter()
                .filter(|r| r.is_fraud == 1)
                .map(|r| {
                    FraudAlert::new(
                        r.input.record.user_id,
                        r.input.record.amount,
                        r.fraud_probability,
                    )
                })
                .collect();

            metrics.record_fraud_batch(processing_time, &probabilities, flagged.len() as u64);

            debug!(
                batch_size = results.len(),
                flagged = flagged.len(),
                processing_time_us = processing_time.as_micros(),
                "Fraud batch scored"
            );

            if let Some(reply) = reply {
                let response = FraudBatchResponse { results };
                if let Err(e) = responder.respond(reply, &response).await {
                    error!(error = %e, "Failed to publish fraud scoring response");
                }
            }

            if let Err(e) = alerts.publish_batch(&flagged).await {
                error!(error = %e, "Failed to publish fraud alerts");
            }
        }
        Err(e) => {
            metrics.record_error();
            error!(error = %e, kind = e.kind(), "Fraud scoring failed");
            if let Some(reply) = reply {
                let _ = responder
                    .respond(reply, &ErrorResponse::from_score_error(&e))
                    .await;
            }
        }
    }
}

async fn handle_loan(
    message: async_nats::Message,
    pipeline: &LoanPipeline,
    responder: &Responder,
    metrics: &ScoringMetrics,
) {
    let start_time = Instant::now();
    let reply = message.reply.as_ref().map(|r| r.to_string());

    let record = match serde_json::from_slice::<LoanRecord>(&message.payload) {
        Ok(record) => record,
        Err(e) => {
            warn!(error = %e, "Failed to deserialize loan scoring request");
            if let Some(reply) = reply {
                let _ = responder
                    .respond(reply, &ErrorResponse::invalid_request(e))
                    .await;
            }
            return;
        }
    };

    match pipeline.score(&record) {
        Ok(decision) => {
            let processing_time = start_time.elapsed();
            metrics.record_loan(processing_time, decision.eligible);

            debug!(
                eligible = decision.eligible,
                probability = decision.probability,
                processing_time_us = processing_time.as_micros(),
                "Loan application scored"
            );

            if let Some(reply) = reply {
                if let Err(e) = responder.respond(reply, &decision).await {
                    error!(error = %e, "Failed to publish loan scoring response");
                }
            }
        }
        Err(e) => {
            metrics.record_error();
            error!(error = %e, kind = e.kind(), "Loan scoring failed");
            if let Some(reply) = reply {
                let _ = responder
                    .respond(reply, &ErrorResponse::from_score_error(&e))
                    .await;
            }
        }
    }
}
