//! NATS publishers for scoring responses and fraud alerts

use crate::types::alert::FraudAlert;
use anyhow::Result;
use async_nats::Client;
use serde::Serialize;
use tracing::{debug, error};

/// Publishes reply payloads back to a request's reply subject.
#[derive(Clone)]
pub struct Responder {
    client: Client,
}

impl Responder {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Serialize and publish a response to the given reply subject.
    pub async fn respond<T: Serialize>(&self, reply: String, payload: &T) -> Result<()> {
        let bytes = serde_json::to_vec(payload)?;

        self.client.publish(reply, bytes.into()).await?;

        Ok(())
    }
}

/// Producer for publishing fraud alerts to NATS
#[derive(Clone)]
pub struct AlertProducer {
    client: Client,
    subject: String,
}

impl AlertProducer {
    /// Create a new alert producer
    pub fn new(client: Client, subject: &str) -> Self {
        Self {
            client,
            subject: subject.to_string(),
        }
    }

    /// Publish a fraud alert
    pub async fn publish(&self, alert: &FraudAlert) -> Result<()> {
        let payload = serde_json::to_vec(alert)?;

        self.client
            .publish(self.subject.clone(), payload.into())
            .await?;

        debug!(
            alert_id = %alert.alert_id,
            user_id = alert.user_id,
            fraud_probability = alert.fraud_probability,
            "Published fraud alert"
        );

        Ok(())
    }

    /// Publish multiple alerts in batch
    pub async fn publish_batch(&self, alerts: &[FraudAlert]) -> Result<()> {
        for alert in alerts {
            if let Err(e) = self.publish(alert).await {
                error!(
                    alert_id = %alert.alert_id,
                    error = %e,
                    "Failed to publish alert"
                );
            }
        }
        Ok(())
    }

    /// Get the subject name
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[cfg(test)]
mod tests {
    // Integration tests would require a running NATS server
}
