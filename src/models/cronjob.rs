//! Cron job domain models.

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

/// A persisted cron job definition.
///
/// Each job targets a URL that is fetched on the job's schedule. The raw
/// `schedule` expression is kept verbatim; translation to a cron rule happens
/// at arming time so an update never has to migrate stored data.
#[derive(Debug, Clone, Serialize)]
pub struct CronJob {
    pub id: Uuid,
    pub name: String,
    /// Target URL fetched on every firing.
    pub link: String,
    /// Optional credential appended to the target URL as `apiKey=<value>`.
    pub api_key: Option<String>,
    /// Raw recurrence expression, e.g. `"30m"`, `"weekly"` or a cron rule.
    pub schedule: String,
    /// First instant the job is eligible to run. A future start defers the
    /// first firing; a past or present start makes the job run immediately.
    pub start_date: Timestamp,
    /// Subscriber URLs that receive the latest firing outcome.
    pub webhooks: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Store-facing input for creating or replacing a job definition.
///
/// The same shape is used for create and update: an update replaces all
/// schedule-relevant fields at once.
#[derive(Debug, Clone)]
pub struct CronJobInput {
    pub name: String,
    pub link: String,
    pub api_key: Option<String>,
    pub schedule: String,
    pub start_date: Timestamp,
    pub webhooks: Vec<String>,
}

/// A job definition as submitted by an operator, before the start date has
/// been validated. `start_date` is the raw day-month-year string.
#[derive(Debug, Clone)]
pub struct JobSubmission {
    pub name: String,
    pub link: String,
    pub api_key: Option<String>,
    pub schedule: String,
    pub start_date: String,
    pub webhooks: Vec<String>,
}

/// Outcome of a delete request. An unknown id is reported, not treated as a
/// failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

impl DeleteOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "Cron job deleted successfully",
            DeleteOutcome::NotFound => "Cron job does not exist",
        }
    }
}
