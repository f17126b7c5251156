//! Server implementation
//!
//! HTTP serve loop plus the background worker lifecycle.

use crate::api;
use crate::checkin::OfflineSyncWorker;
use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
use crate::utils::AppError;

/// HTTP server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server around already-initialized state (tests, tooling)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> Result<(), AppError> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        // Background workers share one shutdown token
        let mut tasks = BackgroundTasks::new();
        let sync_worker = OfflineSyncWorker::new(state.clone(), tasks.shutdown_token());
        tasks.spawn("offline_sync", TaskKind::Worker, sync_worker.run());

        let app = api::router::build_app(state.clone());

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        tracing::info!("Flock check-in station listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
            })
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        tasks.shutdown().await;
        Ok(())
    }
}
