//! Background removal of idle sessions.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::store::SessionStore;

/// Handle to the running reaper task.
///
/// The task runs [`SessionStore::reap_expired`] every
/// `reap_interval` until its token is cancelled. It holds its own
/// reference to the store, so the store outlives the task.
#[must_use = "dropping the handle leaves the reaper running until its token is cancelled"]
pub struct Reaper {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl Reaper {
    /// Spawn the reaper on the current tokio runtime.
    ///
    /// The first pass happens one full interval after spawning.
    /// Cancelling `token` (or calling [`Reaper::shutdown`]) stops it.
    pub fn spawn<C: Clock>(store: Arc<SessionStore<C>>, token: CancellationToken) -> Self {
        let handle = tokio::spawn(run(store, token.clone()));
        Self { token, handle }
    }

    /// Stop the reaper and wait for the task to finish.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!(error = %e, "session reaper task failed");
        }
    }
}

async fn run<C: Clock>(store: Arc<SessionStore<C>>, token: CancellationToken) {
    let config = *store.config();
    let mut ticker = interval(config.reap_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    tracing::info!(
        interval_secs = config.reap_interval.as_secs(),
        idle_timeout_secs = config.idle_timeout.as_secs(),
        "session reaper started"
    );

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {
                let removed = store.reap_expired().await;
                if removed > 0 {
                    let remaining = store.len().await;
                    tracing::info!(
                        removed,
                        remaining,
                        "reaped idle sessions"
                    );
                } else {
                    tracing::debug!("reaper pass found no idle sessions");
                }
            }
        }
    }

    tracing::info!("session reaper stopped");
}
