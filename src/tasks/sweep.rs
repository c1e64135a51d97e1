//! Expiry Sweep Task
//!
//! Background ticker that periodically removes expired cache entries, with
//! an explicit start/stop lifecycle owned by the composition root.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::cache::SharedCache;

/// Runs one expiry sweep immediately and returns the number of entries removed.
pub async fn sweep_now(cache: &SharedCache) -> usize {
    let removed = cache.write().await.sweep_expired();

    if removed > 0 {
        info!("Cache sweep: removed {} expired entries", removed);
    } else {
        debug!("Cache sweep: no expired entries found");
    }
    removed
}

/// Handle to a running sweep task.
///
/// # Example
/// ```ignore
/// let sweeper = SweepTask::start(cache.clone(), Duration::from_secs(600));
/// // Later, during shutdown:
/// sweeper.stop().await;
/// ```
#[derive(Debug)]
pub struct SweepTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl SweepTask {
    /// Spawns the sweep loop. The first sweep runs one `interval` after start.
    ///
    /// A zero interval is raised to one millisecond.
    pub fn start(cache: SharedCache, interval: Duration) -> Self {
        let period = interval.max(Duration::from_millis(1));
        let (shutdown, mut stop_signal) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            info!("Starting cache sweep task with interval of {:?}", period);

            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_signal => {
                        debug!("Cache sweep task received stop signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        sweep_now(&cache).await;
                    }
                }
            }
        });

        Self { shutdown, handle }
    }

    /// Signals the loop to exit and waits for it to finish.
    pub async fn stop(self) {
        // The receiver is gone only if the task already ended
        let _ = self.shutdown.send(());

        if let Err(e) = self.handle.await {
            warn!("Cache sweep task ended abnormally: {}", e);
        } else {
            info!("Cache sweep task stopped");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
