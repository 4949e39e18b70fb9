//! Execution of one job firing against its target URL.

use std::sync::Arc;

use jiff::Timestamp;
use serde_json::{Value as JsonValue, json};

use crate::external::{CalloutResponse, HttpCallout};
use crate::models::{CronJob, NewHistoryEntry};

/// Status codes that count as a successful firing.
pub const SUCCESS_CODES: [u16; 2] = [200, 201];

/// Performs the side-effecting call for one firing and produces the outcome.
pub struct TriggerExecutor {
    client: Arc<dyn HttpCallout>,
}

impl TriggerExecutor {
    pub fn new(client: Arc<dyn HttpCallout>) -> Self {
        Self { client }
    }

    /// Fetches the job's target URL and turns the completion into a firing
    /// outcome. Never fails: a transport error becomes a `success = false`
    /// outcome carrying the error text, so the firing is not lost.
    pub async fn trigger(&self, job: &CronJob) -> NewHistoryEntry {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(api_key) = &job.api_key {
            query.push(("apiKey", api_key.clone()));
        }

        let response = self.client.get(&job.link, &query).await;
        let CalloutResponse {
            status,
            body,
            error,
            duration_ms,
        } = response;

        let success = matches!(status, Some(code) if SUCCESS_CODES.contains(&code));
        if !success {
            tracing::warn!(
                job_id = %job.id,
                name = %job.name,
                status = ?status,
                error = ?error,
                "Trigger call did not succeed"
            );
        }

        let data = body.or_else(|| error.map(JsonValue::String)).unwrap_or(JsonValue::Null);
        NewHistoryEntry {
            cron_job_id: job.id,
            triggered_at: Timestamp::now(),
            response: json!({
                "status": status,
                "data": data,
                "duration_ms": duration_ms,
            }),
            success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::testing::{StubCallout, test_job};

    #[tokio::test]
    async fn status_200_yields_success() {
        let callout = Arc::new(StubCallout::with_status(200));
        let executor = TriggerExecutor::new(callout.clone());
        let job = test_job(Timestamp::now(), "1m", vec![]);

        let outcome = executor.trigger(&job).await;

        assert!(outcome.success);
        assert_eq!(outcome.cron_job_id, job.id);
        assert_eq!(outcome.response["status"], 200);
    }

    #[tokio::test]
    async fn status_201_yields_success() {
        let executor = TriggerExecutor::new(Arc::new(StubCallout::with_status(201)));
        let outcome = executor.trigger(&test_job(Timestamp::now(), "1m", vec![])).await;
        assert!(outcome.success);
    }

    #[tokio::test]
    async fn non_success_status_yields_failure_outcome() {
        let executor = TriggerExecutor::new(Arc::new(StubCallout::with_status(500)));
        let outcome = executor.trigger(&test_job(Timestamp::now(), "1m", vec![])).await;
        assert!(!outcome.success);
        assert_eq!(outcome.response["status"], 500);
    }

    #[tokio::test]
    async fn transport_failure_yields_deterministic_failure_outcome() {
        let executor = TriggerExecutor::new(Arc::new(StubCallout::failing()));
        let outcome = executor.trigger(&test_job(Timestamp::now(), "1m", vec![])).await;

        assert!(!outcome.success);
        assert_eq!(outcome.response["status"], JsonValue::Null);
        assert_eq!(outcome.response["data"], "connection refused");
    }

    #[tokio::test]
    async fn api_key_is_appended_as_query_parameter() {
        let callout = Arc::new(StubCallout::with_status(200));
        let executor = TriggerExecutor::new(callout.clone());
        let mut job = test_job(Timestamp::now(), "1m", vec![]);
        job.api_key = Some("secret".to_string());

        executor.trigger(&job).await;

        let gets = callout.gets.lock().unwrap();
        assert_eq!(gets.len(), 1);
        assert_eq!(gets[0].1, vec![("apiKey".to_string(), "secret".to_string())]);
    }
}
