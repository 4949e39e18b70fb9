//! Application state for the Axum web framework.

use std::sync::Arc;

use crate::jobs::JobScheduler;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// The timer registry, exposed for health reporting
    pub scheduler: Arc<JobScheduler>,
}

impl AppState {
    pub fn new(services: Services, scheduler: Arc<JobScheduler>) -> Self {
        Self {
            services,
            scheduler,
        }
    }
}
