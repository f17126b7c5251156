//! OfflineSyncWorker — drains the offline queue on connectivity events
//!
//! Registered as a background worker at startup. Drains once if the
//! station comes up online with a backlog, then reacts to every transition
//! from offline to online. No backoff: a failed item stays queued and the
//! next connectivity event retries it.

use tokio_util::sync::CancellationToken;

use crate::core::ServerState;

pub struct OfflineSyncWorker {
    state: ServerState,
    shutdown: CancellationToken,
}

impl OfflineSyncWorker {
    pub fn new(state: ServerState, shutdown: CancellationToken) -> Self {
        Self { state, shutdown }
    }

    pub async fn run(self) {
        tracing::info!("Offline sync worker started");

        let mut connectivity_rx = self.state.connectivity.subscribe();

        // Catch up on anything left over from a previous run
        if self.state.connectivity.is_online() {
            self.drain().await;
        }

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Offline sync worker shutting down");
                    break;
                }

                result = connectivity_rx.changed() => {
                    if result.is_err() {
                        tracing::info!("Connectivity channel closed, sync worker stopping");
                        break;
                    }
                    let online = *connectivity_rx.borrow_and_update();
                    if online {
                        self.drain().await;
                    }
                }
            }
        }

        tracing::info!("Offline sync worker stopped");
    }

    async fn drain(&self) {
        let pending = match self.state.offline_queue.pending_count() {
            Ok(n) => n,
            Err(e) => {
                tracing::error!("Failed to read offline queue: {e}");
                return;
            }
        };
        if pending == 0 {
            return;
        }

        tracing::info!(pending, "Draining offline attendance queue");
        match self.state.offline_queue.drain(&self.state.pool).await {
            Ok(report) => {
                tracing::info!(
                    synced = report.synced,
                    duplicates_dropped = report.duplicates_dropped,
                    failed = report.failed,
                    "Offline queue drain finished"
                );
            }
            Err(e) => {
                tracing::error!("Offline queue drain failed: {e}");
            }
        }
    }
}
