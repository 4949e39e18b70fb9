//! Domain models shared across the application.

mod cronjob;
mod history;

pub use cronjob::{CronJob, CronJobInput, DeleteOutcome, JobSubmission};
pub use history::{HistoryEntry, NewHistoryEntry, WebhookIngest};
