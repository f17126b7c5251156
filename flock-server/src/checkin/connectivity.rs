//! Connectivity signal
//!
//! The station's equivalent of the browser's online/offline events: a
//! watch channel the recorder reads synchronously and the sync worker
//! subscribes to. The flag is toggled through the system API (operator or
//! an external probe) and by the sync worker itself when a drain fails.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct ConnectivityState {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivityState {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Flip the flag; transitions are logged, repeats are silent
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            if online {
                tracing::info!("Connectivity restored");
            } else {
                tracing::warn!("Connectivity lost, attendance writes will be queued");
            }
        }
    }

    /// Subscribe to transitions (used by the sync worker)
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityState {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let state = ConnectivityState::new(false);
        let mut rx = state.subscribe();
        assert!(!state.is_online());

        state.set_online(true);
        rx.changed().await.expect("sender alive");
        assert!(*rx.borrow());
    }

    #[test]
    fn repeated_set_is_idempotent() {
        let state = ConnectivityState::new(true);
        state.set_online(true);
        assert!(state.is_online());
        state.set_online(false);
        state.set_online(false);
        assert!(!state.is_online());
    }
}
