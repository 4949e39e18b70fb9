//! Fan-out of the latest firing outcome to subscriber webhooks.

use std::sync::Arc;

use jiff::Timestamp;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use super::recorder::HistoryRecorder;
use crate::external::HttpCallout;
use crate::models::CronJob;

/// Fixed payload shape posted to every subscriber.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub id: Uuid,
    pub job_name: String,
    pub cron_job_id: Uuid,
    pub triggered_at: Timestamp,
    /// The firing's success flag, not the raw upstream status.
    pub status: bool,
    pub response: JsonValue,
}

/// Delivers the latest firing outcome of a job to each subscriber URL.
///
/// Delivery is fire-and-forget and at-most-once per subscriber: a failed
/// delivery is logged and dropped, and never blocks the remaining
/// subscribers or the firing cycle.
pub struct WebhookDispatcher {
    client: Arc<dyn HttpCallout>,
    recorder: Arc<HistoryRecorder>,
}

impl WebhookDispatcher {
    pub fn new(client: Arc<dyn HttpCallout>, recorder: Arc<HistoryRecorder>) -> Self {
        Self { client, recorder }
    }

    pub async fn dispatch(&self, job: &CronJob) {
        for webhook in &job.webhooks {
            let latest = match self.recorder.latest(job.id).await {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    tracing::warn!(job_id = %job.id, webhook = %webhook, "No firing outcome to deliver");
                    continue;
                }
                Err(e) => {
                    tracing::error!(job_id = %job.id, webhook = %webhook, error = %e, "Failed to load latest outcome");
                    continue;
                }
            };

            let payload = WebhookPayload {
                id: latest.id,
                job_name: job.name.clone(),
                cron_job_id: job.id,
                triggered_at: latest.triggered_at,
                status: latest.success,
                response: latest.response,
            };
            let body = match serde_json::to_value(&payload) {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!(job_id = %job.id, error = %e, "Failed to serialize webhook payload");
                    continue;
                }
            };

            let result = self.client.post_json(webhook, &body).await;
            if result.is_delivered() {
                tracing::debug!(job_id = %job.id, webhook = %webhook, "Webhook delivered");
            } else {
                tracing::warn!(
                    job_id = %job.id,
                    webhook = %webhook,
                    status = ?result.status,
                    error = ?result.error,
                    "Webhook delivery failed"
                );
            }
        }
    }
}
