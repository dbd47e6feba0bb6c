//! Periodic eviction of idle wizard sessions.
//!
//! A wizard whose dialog was dismissed without a `DELETE` stays in the
//! registry with its catalog snapshot and results. This loop closes every
//! session that has seen no request for the configured idle period.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::sessions::WizardSessions;

/// Run the idle-session sweep until `cancel` is triggered.
pub async fn run(
    sessions: Arc<WizardSessions>,
    idle_ttl: Duration,
    every: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        idle_ttl_secs = idle_ttl.as_secs(),
        interval_secs = every.as_secs(),
        "Session sweep started"
    );

    let mut interval = tokio::time::interval(every);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Session sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let closed = sessions.close_idle(idle_ttl).await;
                if closed > 0 {
                    tracing::info!(closed, "Session sweep: closed idle sessions");
                } else {
                    tracing::debug!("Session sweep: nothing idle");
                }
            }
        }
    }
}
