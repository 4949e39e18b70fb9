//! Service layer for business logic operations.

mod cronjob_service;

pub use cronjob_service::CronJobService;

/// Aggregates all services for convenient access from Axum state.
#[derive(Clone)]
pub struct Services {
    pub cronjobs: CronJobService,
}

impl Services {
    pub fn new(cronjobs: CronJobService) -> Self {
        Self { cronjobs }
    }
}
