//! Job store seam and its in-memory reference implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{CronJob, CronJobInput};

/// Durable job definition store consumed by the scheduling core.
///
/// The store serializes its own writes; the core applies no concurrency
/// control over job definitions beyond last-update-wins.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// All jobs, newest first.
    async fn find_all(&self) -> AppResult<Vec<CronJob>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CronJob>>;

    async fn create(&self, input: CronJobInput) -> AppResult<CronJob>;

    /// Replaces the schedule-relevant fields of a job. Returns `None` when no
    /// job matches the id.
    async fn update_by_id(&self, id: Uuid, input: CronJobInput) -> AppResult<Option<CronJob>>;

    /// Returns whether a stored job was actually removed.
    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool>;
}

/// Process-local [`JobStore`] backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: DashMap<Uuid, CronJob>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find_all(&self) -> AppResult<Vec<CronJob>> {
        let mut jobs: Vec<CronJob> = self.jobs.iter().map(|entry| entry.value().clone()).collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<CronJob>> {
        Ok(self.jobs.get(&id).map(|entry| entry.value().clone()))
    }

    async fn create(&self, input: CronJobInput) -> AppResult<CronJob> {
        let now = Timestamp::now();
        let job = CronJob {
            id: Uuid::new_v4(),
            name: input.name,
            link: input.link,
            api_key: input.api_key,
            schedule: input.schedule,
            start_date: input.start_date,
            webhooks: input.webhooks,
            created_at: now,
            updated_at: now,
        };
        self.jobs.insert(job.id, job.clone());
        Ok(job)
    }

    async fn update_by_id(&self, id: Uuid, input: CronJobInput) -> AppResult<Option<CronJob>> {
        match self.jobs.get_mut(&id) {
            Some(mut entry) => {
                let job = entry.value_mut();
                job.name = input.name;
                job.link = input.link;
                job.api_key = input.api_key;
                job.schedule = input.schedule;
                job.start_date = input.start_date;
                job.webhooks = input.webhooks;
                job.updated_at = Timestamp::now();
                Ok(Some(job.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.jobs.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> CronJobInput {
        CronJobInput {
            name: name.to_string(),
            link: "https://example.com/ping".to_string(),
            api_key: None,
            schedule: "30m".to_string(),
            start_date: Timestamp::now(),
            webhooks: vec![],
        }
    }

    #[tokio::test]
    async fn create_and_find_round_trip() {
        let store = MemoryJobStore::new();
        let job = store.create(input("ping")).await.unwrap();

        let found = store.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(found.name, "ping");
        assert_eq!(found.schedule, "30m");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_bumps_updated_at() {
        let store = MemoryJobStore::new();
        let job = store.create(input("before")).await.unwrap();

        let mut changed = input("after");
        changed.schedule = "2h".to_string();
        let updated = store.update_by_id(job.id, changed).await.unwrap().unwrap();

        assert_eq!(updated.name, "after");
        assert_eq!(updated.schedule, "2h");
        assert_eq!(updated.created_at, job.created_at);
        assert!(updated.updated_at >= job.updated_at);
    }

    #[tokio::test]
    async fn update_unknown_id_returns_none() {
        let store = MemoryJobStore::new();
        let result = store.update_by_id(Uuid::new_v4(), input("ghost")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_job_existed() {
        let store = MemoryJobStore::new();
        let job = store.create(input("doomed")).await.unwrap();

        assert!(store.delete_by_id(job.id).await.unwrap());
        assert!(!store.delete_by_id(job.id).await.unwrap());
        assert!(store.find_by_id(job.id).await.unwrap().is_none());
    }
}
