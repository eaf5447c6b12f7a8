//! Maintenance Task
//!
//! Background task that periodically sweeps expired cache entries and runs
//! an advisory memory check.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::EstimateSize;
use crate::service::PerfService;

/// Spawns a background task running periodic cache maintenance.
///
/// Each tick removes expired entries and runs one memory-monitor pass.
/// Both operations are advisory: a tick never fails, it only reclaims.
///
/// # Arguments
/// * `service` - Shared service handle
/// * `interval_secs` - Interval in seconds between maintenance runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_maintenance_task<V>(
    service: PerfService<V>,
    interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + EstimateSize + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting maintenance task with interval of {} seconds",
            interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let swept = service.sweep_expired().await;
            let outcome = service.check_and_optimize().await;

            if swept > 0 || outcome.evicted > 0 {
                info!(
                    swept,
                    evicted = outcome.evicted,
                    "maintenance reclaimed cache entries"
                );
            } else {
                debug!("maintenance tick: nothing to reclaim");
            }
        }
    })
}
