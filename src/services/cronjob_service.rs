//! Cron job lifecycle: the orchestration layer between the HTTP API, the
//! store, and the timer registry.

use std::sync::Arc;

use jiff::Timestamp;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::jobs::{HistoryRecorder, JobScheduler};
use crate::models::{
    CronJob, CronJobInput, DeleteOutcome, HistoryEntry, JobSubmission, NewHistoryEntry,
    WebhookIngest,
};
use crate::repositories::JobStore;
use crate::utils::date::parse_start_date;

/// Orchestrates create/update/delete/restore for cron jobs.
///
/// Every mutation validates first, persists second, and touches timers last,
/// so a rejected request never leaves a half-armed job behind.
#[derive(Clone)]
pub struct CronJobService {
    jobs: Arc<dyn JobStore>,
    recorder: Arc<HistoryRecorder>,
    scheduler: Arc<JobScheduler>,
}

impl CronJobService {
    pub fn new(
        jobs: Arc<dyn JobStore>,
        recorder: Arc<HistoryRecorder>,
        scheduler: Arc<JobScheduler>,
    ) -> Self {
        Self {
            jobs,
            recorder,
            scheduler,
        }
    }

    /// Re-arms persisted jobs at startup. Only jobs whose start date has
    /// already passed are resumed; a job still waiting on a future start is
    /// not restored as pending. Returns the number of jobs armed.
    pub async fn restore(&self) -> AppResult<usize> {
        let jobs = self.jobs.find_all().await?;
        let now = Timestamp::now();
        let mut armed = 0;

        for job in jobs {
            if job.start_date > now {
                tracing::warn!(
                    job_id = %job.id,
                    name = %job.name,
                    start_date = %job.start_date,
                    "Job start date has not passed, not restored"
                );
                continue;
            }
            // one job failing to arm must not keep the rest down
            match self.scheduler.arm(&job).await {
                Ok(()) => armed += 1,
                Err(e) => {
                    tracing::error!(job_id = %job.id, name = %job.name, error = %e, "Failed to re-arm job at startup");
                }
            }
        }

        tracing::info!(armed, "Restored persisted cron jobs");
        Ok(armed)
    }

    /// Validates, persists, and arms a new job.
    pub async fn create(&self, submission: JobSubmission) -> AppResult<CronJob> {
        let input = self.validated_input(submission)?;
        let job = self.jobs.create(input).await?;
        self.scheduler.arm(&job).await?;
        tracing::info!(job_id = %job.id, name = %job.name, "Cron job created");
        Ok(job)
    }

    /// Replaces a job's definition and unconditionally re-arms it, even when
    /// the schedule string is unchanged.
    pub async fn update(&self, id: Uuid, submission: JobSubmission) -> AppResult<CronJob> {
        let input = self.validated_input(submission)?;
        let job = self
            .jobs
            .update_by_id(id, input)
            .await?
            .ok_or_else(|| not_found(id))?;
        self.scheduler.arm(&job).await?;
        tracing::info!(job_id = %job.id, name = %job.name, "Cron job updated and re-armed");
        Ok(job)
    }

    /// Cancels the job's timer, then deletes the stored definition. Deleting
    /// an unknown id is reported, not raised.
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome> {
        self.scheduler.cancel(id).await?;
        if self.jobs.delete_by_id(id).await? {
            tracing::info!(job_id = %id, "Cron job deleted");
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::NotFound)
        }
    }

    /// All jobs, newest first.
    pub async fn list(&self) -> AppResult<Vec<CronJob>> {
        self.jobs.find_all().await
    }

    /// Firing history for one job, most recent first.
    pub async fn history(&self, id: Uuid) -> AppResult<Vec<HistoryEntry>> {
        self.recorder.history(id).await
    }

    /// Records an externally produced outcome as history for a job. The
    /// provided status decides the success flag by the same 200/201 rule as a
    /// real firing; an absent status counts as failure.
    pub async fn ingest_webhook(&self, ingest: WebhookIngest) -> AppResult<HistoryEntry> {
        let job = self
            .jobs
            .find_by_id(ingest.cron_job_id)
            .await?
            .ok_or_else(|| not_found(ingest.cron_job_id))?;

        let success = matches!(ingest.status, Some(200) | Some(201));
        let entry = NewHistoryEntry {
            cron_job_id: job.id,
            triggered_at: Timestamp::now(),
            response: ingest.data.unwrap_or(serde_json::Value::Null),
            success,
        };
        self.recorder.record(entry).await
    }

    /// Number of jobs with a live timer, for health reporting.
    pub async fn armed_jobs(&self) -> usize {
        self.scheduler.armed_count().await
    }

    fn validated_input(&self, submission: JobSubmission) -> AppResult<CronJobInput> {
        let start_date = parse_start_date(&submission.start_date)?;
        Ok(CronJobInput {
            name: submission.name,
            link: submission.link,
            api_key: submission.api_key,
            schedule: submission.schedule,
            start_date,
            webhooks: submission.webhooks,
        })
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound {
        entity: "CronJob".to_string(),
        field: "id".to_string(),
        value: id.to_string(),
    }
}
