//! Server module for managing HTTP server lifecycle.
//!
//! Wires the stores, the scheduling core, and the HTTP transport together,
//! restores persisted jobs, and runs until a shutdown signal arrives.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::Settings;
use crate::external::ReqwestCallout;
use crate::jobs::{HistoryRecorder, JobScheduler, TriggerExecutor, WebhookDispatcher};
use crate::repositories::{MemoryHistoryStore, MemoryJobStore};
use crate::services::{CronJobService, Services};
use crate::state::AppState;

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            version = %env!("CARGO_PKG_VERSION"),
            "Application starting"
        );
        tracing::info!(
            host = %self.settings.server.host,
            port = %self.settings.server.port,
            "Server configuration loaded"
        );

        // Stores and the outbound HTTP seam
        let job_store = Arc::new(MemoryJobStore::new());
        let history_store = Arc::new(MemoryHistoryStore::new());
        let callout = Arc::new(ReqwestCallout::new());

        // The scheduling core: trigger -> record -> dispatch
        let recorder = Arc::new(HistoryRecorder::new(history_store));
        let executor = Arc::new(TriggerExecutor::new(callout.clone()));
        let dispatcher = Arc::new(WebhookDispatcher::new(callout, Arc::clone(&recorder)));
        let scheduler = Arc::new(
            JobScheduler::new(executor, Arc::clone(&recorder), dispatcher).await?,
        );

        let cronjobs = CronJobService::new(job_store, recorder, Arc::clone(&scheduler));

        // Re-arm persisted jobs whose start date has passed, then start ticking
        cronjobs.restore().await?;
        scheduler.start().await?;
        tracing::info!("Scheduler started");

        let state = AppState::new(Services::new(cronjobs), Arc::clone(&scheduler));
        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;
        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler did not shut down cleanly");
        }
        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
