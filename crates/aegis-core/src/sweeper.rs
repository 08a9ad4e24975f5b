//! Background expiry sweep.

use crate::cascade::destroy_session_tree;
use aegis_session::{ExpirationPolicy, LogoutNotifier, SessionStorage, StorageError};
use std::sync::Arc;
use std::time::Duration;

/// Periodically destroys sessions that expired or were left invalidated
/// by a cascade.
///
/// Expiration itself is passive — [`Session::is_valid`](aegis_session::Session::is_valid)
/// already answers `false` for an expired session — so the sweep exists
/// to reclaim storage and fire the remaining single-logout
/// notifications, not to enforce anything.
pub struct ExpirationSweeper {
    storage: Arc<dyn SessionStorage>,
    policy: Arc<dyn ExpirationPolicy>,
    notifier: Arc<dyn LogoutNotifier>,
    interval: Duration,
}

impl ExpirationSweeper {
    /// Creates a sweeper over the given store.
    #[must_use]
    pub fn new(
        storage: Arc<dyn SessionStorage>,
        policy: Arc<dyn ExpirationPolicy>,
        notifier: Arc<dyn LogoutNotifier>,
        interval: Duration,
    ) -> Self {
        Self {
            storage,
            policy,
            notifier,
            interval,
        }
    }

    /// One sweep pass. Returns the number of sessions destroyed
    /// (including cascaded children).
    ///
    /// # Errors
    ///
    /// Propagates [`StorageError`] from the enumeration; per-session
    /// destroy errors abort the pass.
    pub fn sweep_once(&self) -> Result<usize, StorageError> {
        let mut destroyed = 0;
        for id in self.storage.session_ids()? {
            let Some(handle) = self.storage.find_session_by_session_id(&id)? else {
                continue;
            };
            let dead = {
                let session = handle.read();
                session.is_invalidated() || self.policy.is_expired(&session)
            };
            if dead {
                destroyed +=
                    destroy_session_tree(self.storage.as_ref(), self.notifier.as_ref(), &id)?
                        .len();
            }
        }
        if destroyed > 0 {
            tracing::info!(destroyed, "expiry sweep reclaimed sessions");
        }
        Ok(destroyed)
    }

    /// Runs the sweep on its interval until the task is aborted.
    #[must_use]
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            // tokio rejects a zero period; the first tick is immediate
            // either way.
            let period = self.interval.max(Duration::from_millis(1));
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = self.sweep_once() {
                    tracing::warn!(error = %err, "expiry sweep failed; will retry");
                }
            }
        })
    }
}
