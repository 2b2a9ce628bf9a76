//! Background purge of long-expired shares.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{error, info};

use sharelink_core::result::AppResult;
use sharelink_database::ShareRepository;

/// Periodically deletes shares that expired more than a retention window ago.
#[derive(Debug, Clone)]
pub struct ShareCleanup {
    /// Share repository.
    share_repo: Arc<ShareRepository>,
    /// Time between purges.
    interval: Duration,
    /// How long an expired share is kept.
    retention: chrono::Duration,
}

impl ShareCleanup {
    /// Creates a new cleanup task.
    pub fn new(share_repo: Arc<ShareRepository>, interval: Duration, retention: chrono::Duration) -> Self {
        Self {
            share_repo,
            interval,
            retention,
        }
    }

    /// Deletes shares whose expiry lies before `now - retention`.
    pub async fn purge_once(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let removed = self
            .share_repo
            .delete_expired_before(now - self.retention)
            .await?;
        if removed > 0 {
            info!(removed, "Purged expired shares");
        }
        Ok(removed)
    }

    /// Runs purges on the configured interval until shutdown is signalled.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            retention_hours = self.retention.num_hours(),
            "Share cleanup started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.purge_once(Utc::now()).await {
                        error!(error = %e, "Share cleanup failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Share cleanup stopped");
    }
}
