//! Timer registry: one live timer per job, pending or recurring.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler as TokioCronScheduler};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::recorder::HistoryRecorder;
use super::translate::{to_scheduler_expression, translate};
use super::trigger::TriggerExecutor;
use super::webhook::WebhookDispatcher;
use crate::error::{AppError, AppResult};
use crate::models::CronJob;

/// Which kind of timer is currently armed for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// One-shot delayed timer counting down to a future start date.
    Pending,
    /// Recurring cron timer firing per the job's rule.
    Recurring,
}

/// Live timer handle. The variant itself encodes the job's state; there is
/// never more than one entry per job id.
enum TimerEntry {
    Pending(CancellationToken),
    Recurring(Uuid),
}

impl TimerEntry {
    fn kind(&self) -> TimerKind {
        match self {
            TimerEntry::Pending(_) => TimerKind::Pending,
            TimerEntry::Recurring(_) => TimerKind::Recurring,
        }
    }
}

/// Wrapper around tokio-cron-scheduler owning every live timer.
///
/// All timer mutations go through the `timers` lock, so arm and cancel are
/// mutually exclusive per job and an update can never leave two live timers
/// behind. Cancellation is immediate for future firings; a firing already in
/// flight is left to finish.
pub struct JobScheduler {
    scheduler: Mutex<TokioCronScheduler>,
    timers: Mutex<HashMap<Uuid, TimerEntry>>,
    executor: Arc<TriggerExecutor>,
    recorder: Arc<HistoryRecorder>,
    dispatcher: Arc<WebhookDispatcher>,
}

impl JobScheduler {
    pub async fn new(
        executor: Arc<TriggerExecutor>,
        recorder: Arc<HistoryRecorder>,
        dispatcher: Arc<WebhookDispatcher>,
    ) -> AppResult<Self> {
        let scheduler = TokioCronScheduler::new()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })?;

        Ok(Self {
            scheduler: Mutex::new(scheduler),
            timers: Mutex::new(HashMap::new()),
            executor,
            recorder,
            dispatcher,
        })
    }

    /// Start ticking recurring timers.
    pub async fn start(&self) -> AppResult<()> {
        self.scheduler
            .lock()
            .await
            .start()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })
    }

    /// Stop the underlying scheduler gracefully.
    pub async fn shutdown(&self) -> AppResult<()> {
        self.scheduler
            .lock()
            .await
            .shutdown()
            .await
            .map_err(|e| AppError::Internal {
                source: anyhow::Error::from(e),
            })
    }

    /// Installs the timer for a job, superseding any existing one.
    ///
    /// A future start date arms a one-shot delayed timer that promotes the
    /// job to its recurring timer once the start date arrives; otherwise the
    /// recurring timer is armed right away.
    pub async fn arm(self: &Arc<Self>, job: &CronJob) -> AppResult<()> {
        let mut timers = self.timers.lock().await;
        self.remove_timer(&mut timers, job.id).await?;

        if job.start_date > Timestamp::now() {
            self.arm_pending(&mut timers, job)
        } else {
            self.arm_recurring(&mut timers, job).await
        }
    }

    /// Stops and removes whichever timer is armed for the job id. Unarmed ids
    /// are a no-op.
    pub async fn cancel(&self, job_id: Uuid) -> AppResult<()> {
        let mut timers = self.timers.lock().await;
        self.remove_timer(&mut timers, job_id).await
    }

    pub async fn is_armed(&self, job_id: Uuid) -> bool {
        self.timers.lock().await.contains_key(&job_id)
    }

    pub async fn armed_kind(&self, job_id: Uuid) -> Option<TimerKind> {
        self.timers.lock().await.get(&job_id).map(TimerEntry::kind)
    }

    pub async fn armed_count(&self) -> usize {
        self.timers.lock().await.len()
    }

    async fn remove_timer(
        &self,
        timers: &mut HashMap<Uuid, TimerEntry>,
        job_id: Uuid,
    ) -> AppResult<()> {
        match timers.get(&job_id) {
            Some(TimerEntry::Pending(token)) => {
                token.cancel();
                timers.remove(&job_id);
                Ok(())
            }
            Some(TimerEntry::Recurring(cron_id)) => {
                let cron_id = *cron_id;
                // stop the cron job first; on failure the entry stays as-is
                self.scheduler
                    .lock()
                    .await
                    .remove(&cron_id)
                    .await
                    .map_err(|e| AppError::Scheduler {
                        job_id,
                        operation: "cancel",
                        source: anyhow::Error::from(e),
                    })?;
                timers.remove(&job_id);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn arm_pending(
        self: &Arc<Self>,
        timers: &mut HashMap<Uuid, TimerEntry>,
        job: &CronJob,
    ) -> AppResult<()> {
        let wait_ms =
            (job.start_date.as_millisecond() - Timestamp::now().as_millisecond()).max(0) as u64;
        let token = CancellationToken::new();
        timers.insert(job.id, TimerEntry::Pending(token.clone()));

        tracing::info!(
            job_id = %job.id,
            name = %job.name,
            start_date = %job.start_date,
            wait_ms,
            "Start date is in the future, arming delayed timer"
        );

        let this = Arc::clone(self);
        let job = job.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(Duration::from_millis(wait_ms)) => {
                    tracing::info!(job_id = %job.id, name = %job.name, "Start date reached, promoting to recurring");
                    if let Err(e) = this.promote(&job, &token).await {
                        tracing::error!(job_id = %job.id, error = %e, "Failed to promote job to recurring");
                    }
                }
            }
        });

        Ok(())
    }

    /// Swaps a fired delayed timer for the job's recurring timer.
    async fn promote(self: &Arc<Self>, job: &CronJob, token: &CancellationToken) -> AppResult<()> {
        let mut timers = self.timers.lock().await;
        // a cancel or re-arm racing the wakeup cancels the token before
        // touching the table; this wakeup is then stale
        if token.is_cancelled() {
            return Ok(());
        }
        timers.remove(&job.id);
        self.arm_recurring(&mut timers, job).await
    }

    async fn arm_recurring(
        &self,
        timers: &mut HashMap<Uuid, TimerEntry>,
        job: &CronJob,
    ) -> AppResult<()> {
        let rule = translate(&job.schedule);
        let expression = to_scheduler_expression(&rule);

        tracing::info!(
            job_id = %job.id,
            name = %job.name,
            schedule = %job.schedule,
            rule = %expression,
            "Arming recurring timer"
        );

        let executor = Arc::clone(&self.executor);
        let recorder = Arc::clone(&self.recorder);
        let dispatcher = Arc::clone(&self.dispatcher);
        let job_clone = job.clone();

        let cron_job = Job::new_async(expression.as_str(), move |_uuid, _lock| {
            let executor = Arc::clone(&executor);
            let recorder = Arc::clone(&recorder);
            let dispatcher = Arc::clone(&dispatcher);
            let job = job_clone.clone();

            Box::pin(async move {
                run_firing_cycle(&job, &executor, &recorder, &dispatcher).await;
            })
        })
        .map_err(|e| AppError::Scheduler {
            job_id: job.id,
            operation: "arm",
            source: anyhow::Error::from(e),
        })?;

        let cron_id = self
            .scheduler
            .lock()
            .await
            .add(cron_job)
            .await
            .map_err(|e| AppError::Scheduler {
                job_id: job.id,
                operation: "arm",
                source: anyhow::Error::from(e),
            })?;

        timers.insert(job.id, TimerEntry::Recurring(cron_id));
        Ok(())
    }
}

/// One firing cycle: trigger, record, dispatch, in that order. Failures stay
/// inside the cycle; nothing propagates back into the scheduler loop.
pub(crate) async fn run_firing_cycle(
    job: &CronJob,
    executor: &TriggerExecutor,
    recorder: &HistoryRecorder,
    dispatcher: &WebhookDispatcher,
) {
    tracing::info!(job_id = %job.id, name = %job.name, "Executing cron job");

    let outcome = executor.trigger(job).await;
    match recorder.record(outcome).await {
        Ok(entry) => {
            tracing::debug!(
                job_id = %job.id,
                history_id = %entry.id,
                success = entry.success,
                "Firing outcome recorded"
            );
            dispatcher.dispatch(job).await;
        }
        Err(e) => {
            // dispatch must observe the outcome just recorded; skip it when
            // the write failed
            tracing::error!(job_id = %job.id, error = %e, "Failed to record firing outcome, skipping dispatch");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::testing::{StubCallout, test_job};
    use crate::repositories::MemoryHistoryStore;
    use jiff::ToSpan;

    async fn rig_with(callout: Arc<StubCallout>) -> (Arc<JobScheduler>, Arc<HistoryRecorder>) {
        let recorder = Arc::new(HistoryRecorder::new(Arc::new(MemoryHistoryStore::new())));
        let executor = Arc::new(TriggerExecutor::new(callout.clone()));
        let dispatcher = Arc::new(WebhookDispatcher::new(callout, Arc::clone(&recorder)));
        let scheduler = JobScheduler::new(executor, Arc::clone(&recorder), dispatcher)
            .await
            .unwrap();
        (Arc::new(scheduler), recorder)
    }

    async fn rig() -> (Arc<JobScheduler>, Arc<HistoryRecorder>) {
        rig_with(Arc::new(StubCallout::with_status(200))).await
    }

    #[tokio::test]
    async fn past_start_arms_exactly_one_recurring_timer() {
        let (scheduler, _) = rig().await;
        let job = test_job(Timestamp::now() - 24.hours(), "1m", vec![]);

        scheduler.arm(&job).await.unwrap();

        assert_eq!(scheduler.armed_kind(job.id).await, Some(TimerKind::Recurring));
        assert_eq!(scheduler.armed_count().await, 1);
    }

    #[tokio::test]
    async fn present_start_arms_recurring_timer() {
        let (scheduler, _) = rig().await;
        let job = test_job(Timestamp::now(), "30m", vec![]);

        scheduler.arm(&job).await.unwrap();

        assert_eq!(scheduler.armed_kind(job.id).await, Some(TimerKind::Recurring));
    }

    #[tokio::test]
    async fn future_start_arms_delayed_timer() {
        let (scheduler, _) = rig().await;
        let job = test_job(Timestamp::now() + 1.hour(), "1m", vec![]);

        scheduler.arm(&job).await.unwrap();

        assert_eq!(scheduler.armed_kind(job.id).await, Some(TimerKind::Pending));
        assert_eq!(scheduler.armed_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_timer_promotes_to_recurring_after_start_date() {
        let (scheduler, _) = rig().await;
        let job = test_job(Timestamp::now() + 1.hour(), "1m", vec![]);

        scheduler.arm(&job).await.unwrap();
        assert_eq!(scheduler.armed_kind(job.id).await, Some(TimerKind::Pending));

        tokio::time::sleep(Duration::from_secs(3605)).await;

        assert_eq!(scheduler.armed_kind(job.id).await, Some(TimerKind::Recurring));
        assert_eq!(scheduler.armed_count().await, 1, "never two timers for one job");
    }

    #[tokio::test]
    async fn rearming_leaves_exactly_one_timer() {
        let (scheduler, _) = rig().await;
        let job = test_job(Timestamp::now() - 1.hour(), "1m", vec![]);

        scheduler.arm(&job).await.unwrap();
        scheduler.arm(&job).await.unwrap();

        assert_eq!(scheduler.armed_count().await, 1);
        assert_eq!(scheduler.armed_kind(job.id).await, Some(TimerKind::Recurring));
    }

    #[tokio::test]
    async fn rearming_with_future_start_supersedes_recurring_timer() {
        let (scheduler, _) = rig().await;
        let mut job = test_job(Timestamp::now() - 1.hour(), "1m", vec![]);

        scheduler.arm(&job).await.unwrap();
        job.start_date = Timestamp::now() + 1.hour();
        scheduler.arm(&job).await.unwrap();

        assert_eq!(scheduler.armed_kind(job.id).await, Some(TimerKind::Pending));
        assert_eq!(scheduler.armed_count().await, 1);
    }

    #[tokio::test]
    async fn cancel_of_unarmed_id_is_a_noop() {
        let (scheduler, _) = rig().await;

        scheduler.cancel(Uuid::new_v4()).await.unwrap();

        assert_eq!(scheduler.armed_count().await, 0);
    }

    #[tokio::test]
    async fn cancel_removes_recurring_timer() {
        let (scheduler, _) = rig().await;
        let job = test_job(Timestamp::now() - 1.hour(), "1m", vec![]);

        scheduler.arm(&job).await.unwrap();
        scheduler.cancel(job.id).await.unwrap();

        assert!(!scheduler.is_armed(job.id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_delayed_timer_never_promotes() {
        let (scheduler, _) = rig().await;
        let job = test_job(Timestamp::now() + 1.hour(), "1m", vec![]);

        scheduler.arm(&job).await.unwrap();
        scheduler.cancel(job.id).await.unwrap();

        tokio::time::sleep(Duration::from_secs(7200)).await;

        assert!(!scheduler.is_armed(job.id).await);
        assert_eq!(scheduler.armed_count().await, 0);
    }

    #[tokio::test]
    async fn cancel_of_one_job_leaves_others_armed() {
        let (scheduler, _) = rig().await;
        let keep = test_job(Timestamp::now() - 1.hour(), "1m", vec![]);
        let doomed = test_job(Timestamp::now() - 1.hour(), "2h", vec![]);

        scheduler.arm(&keep).await.unwrap();
        scheduler.arm(&doomed).await.unwrap();
        scheduler.cancel(doomed.id).await.unwrap();

        assert!(scheduler.is_armed(keep.id).await);
        assert!(!scheduler.is_armed(doomed.id).await);
    }

    #[tokio::test]
    async fn firing_cycle_records_success_and_dispatches() {
        let callout = Arc::new(StubCallout::with_status(200));
        let (scheduler, recorder) = rig_with(Arc::clone(&callout)).await;
        let job = test_job(
            Timestamp::now() - 1.hour(),
            "1m",
            vec!["https://subscriber.example/hook".into()],
        );
        scheduler.arm(&job).await.unwrap();

        run_firing_cycle(&job, &scheduler.executor, &recorder, &scheduler.dispatcher).await;

        let latest = recorder.latest(job.id).await.unwrap().unwrap();
        assert!(latest.success);
        assert_eq!(latest.response["status"], 200);
        assert_eq!(callout.posts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn firing_cycle_survives_trigger_transport_failure() {
        let callout = Arc::new(StubCallout::failing());
        let (scheduler, recorder) = rig_with(Arc::clone(&callout)).await;
        let job = test_job(Timestamp::now() - 1.hour(), "1m", vec![]);
        scheduler.arm(&job).await.unwrap();

        run_firing_cycle(&job, &scheduler.executor, &recorder, &scheduler.dispatcher).await;

        let latest = recorder.latest(job.id).await.unwrap().unwrap();
        assert!(!latest.success, "failed call still yields a recorded outcome");
        assert!(scheduler.is_armed(job.id).await, "timer survives a failed firing");
    }
}
