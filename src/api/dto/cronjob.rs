//! Cron-job DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{CronJob, HistoryEntry, JobSubmission, WebhookIngest};

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for registering a new cron job.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "name": "nightly-report",
    "link": "https://api.example.com/reports/run",
    "api_key": "s3cret",
    "schedule": "30m",
    "start_date": "15-01-2026",
    "webhooks": ["https://hooks.example.com/reports"]
}))]
pub struct CreateCronJobRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    #[schema(example = "nightly-report")]
    pub name: String,

    #[validate(length(min = 1, max = 2048, message = "Link must be between 1 and 2048 characters"))]
    #[schema(example = "https://api.example.com/reports/run")]
    pub link: String,

    #[schema(example = "s3cret")]
    pub api_key: Option<String>,

    /// Compact schedule (`30m`, `2h`, `5d`, `weekly`, `monthly`) or a cron
    /// rule used as-is.
    #[validate(length(min = 1, max = 64, message = "Schedule must be between 1 and 64 characters"))]
    #[schema(example = "30m")]
    pub schedule: String,

    /// Day-month-year, e.g. `15-01-2026`.
    #[validate(length(min = 1, message = "Start date is required"))]
    #[schema(example = "15-01-2026")]
    pub start_date: String,

    /// Subscriber URLs receiving the latest firing outcome.
    #[serde(default)]
    pub webhooks: Vec<String>,
}

impl CreateCronJobRequest {
    pub fn into_submission(self) -> JobSubmission {
        JobSubmission {
            name: self.name,
            link: self.link,
            api_key: self.api_key,
            schedule: self.schedule,
            start_date: self.start_date,
            webhooks: self.webhooks,
        }
    }
}

/// Request body for updating a cron job. The full schedule-relevant field set
/// is replaced and the job is re-armed, even when nothing changed.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateCronJobRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 2048, message = "Link must be between 1 and 2048 characters"))]
    pub link: String,

    pub api_key: Option<String>,

    #[validate(length(min = 1, max = 64, message = "Schedule must be between 1 and 64 characters"))]
    pub schedule: String,

    /// Day-month-year, re-validated on every update.
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,

    #[serde(default)]
    pub webhooks: Vec<String>,
}

impl UpdateCronJobRequest {
    pub fn into_submission(self) -> JobSubmission {
        JobSubmission {
            name: self.name,
            link: self.link,
            api_key: self.api_key,
            schedule: self.schedule,
            start_date: self.start_date,
            webhooks: self.webhooks,
        }
    }
}

/// Request body for recording an externally produced outcome against a job.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct WebhookIngestRequest {
    pub cron_job_id: Uuid,

    #[schema(value_type = Option<Object>)]
    pub data: Option<JsonValue>,

    /// Upstream status code; 200 or 201 marks the entry successful.
    pub status: Option<u16>,
}

impl WebhookIngestRequest {
    pub fn into_ingest(self) -> WebhookIngest {
        WebhookIngest {
            cron_job_id: self.cron_job_id,
            data: self.data,
            status: self.status,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Response body for cron job data.
#[derive(Debug, Serialize, ToSchema)]
pub struct CronJobResponse {
    pub id: Uuid,
    pub name: String,
    pub link: String,
    pub api_key: Option<String>,
    pub schedule: String,
    #[schema(value_type = String, format = DateTime)]
    pub start_date: String,
    pub webhooks: Vec<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

impl From<CronJob> for CronJobResponse {
    fn from(job: CronJob) -> Self {
        Self {
            id: job.id,
            name: job.name,
            link: job.link,
            api_key: job.api_key,
            schedule: job.schedule,
            start_date: job.start_date.to_string(),
            webhooks: job.webhooks,
            created_at: job.created_at.to_string(),
            updated_at: job.updated_at.to_string(),
        }
    }
}

/// Response body for one recorded firing.
#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryEntryResponse {
    pub id: Uuid,
    pub cron_job_id: Uuid,
    #[schema(value_type = String, format = DateTime)]
    pub triggered_at: String,
    #[schema(value_type = Object)]
    pub response: JsonValue,
    pub success: bool,
}

impl From<HistoryEntry> for HistoryEntryResponse {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            id: entry.id,
            cron_job_id: entry.cron_job_id,
            triggered_at: entry.triggered_at.to_string(),
            response: entry.response,
            success: entry.success,
        }
    }
}

/// Plain confirmation message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;

    #[test]
    fn response_formats_timestamps_as_rfc3339() {
        let now = Timestamp::now();
        let job = CronJob {
            id: Uuid::new_v4(),
            name: "n".to_string(),
            link: "https://example.com".to_string(),
            api_key: None,
            schedule: "1m".to_string(),
            start_date: now,
            webhooks: vec![],
            created_at: now,
            updated_at: now,
        };

        let response = CronJobResponse::from(job);
        assert!(response.start_date.ends_with('Z'));
    }

    #[test]
    fn create_request_validation_rejects_empty_name() {
        let request = CreateCronJobRequest {
            name: String::new(),
            link: "https://example.com".to_string(),
            api_key: None,
            schedule: "1m".to_string(),
            start_date: "01-01-2026".to_string(),
            webhooks: vec![],
        };
        assert!(request.validate().is_err());
    }
}
