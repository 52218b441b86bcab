//! Background refresh ticker
//!
//! Periodically nudges the main application to reload the forecast for the
//! selected place, using a tokio channel so the TUI loop can poll for due
//! refreshes without blocking. The reload itself (and its cache-first logic)
//! stays in the app; this module only keeps time.

use std::time::Duration;
use tokio::sync::mpsc;

/// How often the forecast is reconsidered for the selected place
const REFRESH_INTERVAL_SECS: u64 = 600;

/// Messages sent from the background ticker to the main app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMessage {
    /// The refresh interval elapsed; the forecast should be reloaded
    RefreshDue,
}

/// Configuration for the refresh ticker
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between refresh prompts
    pub interval: Duration,
    /// Whether auto-refresh is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            enabled: true,
        }
    }
}

/// Handle for the background refresh ticker
pub struct RefreshHandle {
    /// Channel on which due refreshes arrive
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Spawns the ticker task and returns its handle
    ///
    /// With `enabled = false` no task is spawned and the channel stays
    /// silent.
    pub fn spawn(config: RefreshConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(8);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            if msg_tx.send(RefreshMessage::RefreshDue).await.is_err() {
                                break;
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Shuts down the background ticker
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Checks for a pending refresh message without blocking
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}
