//! Persistence of firing outcomes.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{HistoryEntry, NewHistoryEntry};
use crate::repositories::HistoryStore;

/// Records firing outcomes and serves the latest one per job.
#[derive(Clone)]
pub struct HistoryRecorder {
    store: Arc<dyn HistoryStore>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store }
    }

    /// Appends one outcome. Outcomes are immutable once recorded.
    pub async fn record(&self, outcome: NewHistoryEntry) -> AppResult<HistoryEntry> {
        self.store.append(outcome).await
    }

    /// The most recent outcome for a job, reflecting any `record` made
    /// earlier in the same process.
    pub async fn latest(&self, cron_job_id: Uuid) -> AppResult<Option<HistoryEntry>> {
        self.store.latest_by_job(cron_job_id).await
    }

    /// Full history for a job, most recent first. The store makes no ordering
    /// promise, so entries are re-sorted here.
    pub async fn history(&self, cron_job_id: Uuid) -> AppResult<Vec<HistoryEntry>> {
        let mut entries = self.store.find_by_job(cron_job_id).await?;
        entries.sort_by(|a, b| b.triggered_at.cmp(&a.triggered_at));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemoryHistoryStore;
    use jiff::{Timestamp, ToSpan};
    use serde_json::json;

    fn outcome_at(job_id: Uuid, triggered_at: Timestamp) -> NewHistoryEntry {
        NewHistoryEntry {
            cron_job_id: job_id,
            triggered_at,
            response: json!({"status": 200, "data": null}),
            success: true,
        }
    }

    #[tokio::test]
    async fn latest_sees_outcome_recorded_in_same_cycle() {
        let recorder = HistoryRecorder::new(Arc::new(MemoryHistoryStore::new()));
        let job_id = Uuid::new_v4();

        let recorded = recorder.record(outcome_at(job_id, Timestamp::now())).await.unwrap();
        let latest = recorder.latest(job_id).await.unwrap().unwrap();

        assert_eq!(latest.id, recorded.id);
    }

    #[tokio::test]
    async fn history_is_most_recent_first() {
        let recorder = HistoryRecorder::new(Arc::new(MemoryHistoryStore::new()));
        let job_id = Uuid::new_v4();
        let now = Timestamp::now();

        recorder.record(outcome_at(job_id, now - 2.hours())).await.unwrap();
        recorder.record(outcome_at(job_id, now)).await.unwrap();
        recorder.record(outcome_at(job_id, now - 1.hour())).await.unwrap();

        let history = recorder.history(job_id).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].triggered_at, now);
        assert_eq!(history[2].triggered_at, now - 2.hours());
    }
}
