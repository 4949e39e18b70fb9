//! History store seam and its in-memory reference implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{HistoryEntry, NewHistoryEntry};

/// Append-only store of firing outcomes.
///
/// `find_by_job` makes no ordering promise; callers re-sort. `latest_by_job`
/// must reflect an `append` made earlier in the same process (read-after-write
/// within one firing cycle).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, entry: NewHistoryEntry) -> AppResult<HistoryEntry>;

    async fn find_by_job(&self, cron_job_id: Uuid) -> AppResult<Vec<HistoryEntry>>;

    async fn latest_by_job(&self, cron_job_id: Uuid) -> AppResult<Option<HistoryEntry>>;
}

/// Process-local [`HistoryStore`] keyed by job id, insertion-ordered per job.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: DashMap<Uuid, Vec<HistoryEntry>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn append(&self, entry: NewHistoryEntry) -> AppResult<HistoryEntry> {
        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            cron_job_id: entry.cron_job_id,
            triggered_at: entry.triggered_at,
            response: entry.response,
            success: entry.success,
        };
        self.entries
            .entry(entry.cron_job_id)
            .or_default()
            .push(entry.clone());
        Ok(entry)
    }

    async fn find_by_job(&self, cron_job_id: Uuid) -> AppResult<Vec<HistoryEntry>> {
        Ok(self
            .entries
            .get(&cron_job_id)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }

    async fn latest_by_job(&self, cron_job_id: Uuid) -> AppResult<Option<HistoryEntry>> {
        Ok(self
            .entries
            .get(&cron_job_id)
            .and_then(|entries| entries.last().cloned()))
    }
}
