//! Firing history models.

use jiff::Timestamp;
use serde::Serialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// One recorded firing of a cron job.
///
/// Entries are append-only and immutable once written. `success` is the flag
/// downstream consumers see; the raw upstream status lives inside `response`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub cron_job_id: Uuid,
    pub triggered_at: Timestamp,
    /// Raw outcome payload: upstream status plus the response body (or the
    /// transport error text when the call never completed).
    pub response: JsonValue,
    /// True iff the triggered call returned 200 or 201.
    pub success: bool,
}

/// A firing outcome waiting to be recorded.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub cron_job_id: Uuid,
    pub triggered_at: Timestamp,
    pub response: JsonValue,
    pub success: bool,
}

/// An externally produced outcome submitted through the webhook ingest
/// endpoint, recorded as history on behalf of a job.
#[derive(Debug, Clone)]
pub struct WebhookIngest {
    pub cron_job_id: Uuid,
    pub data: Option<JsonValue>,
    pub status: Option<u16>,
}
