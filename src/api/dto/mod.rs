//! Data Transfer Objects for API requests and responses.

mod cronjob;
mod error;

pub use cronjob::{
    CreateCronJobRequest, CronJobResponse, HistoryEntryResponse, MessageResponse,
    UpdateCronJobRequest, WebhookIngestRequest,
};
pub use error::ErrorResponse;
