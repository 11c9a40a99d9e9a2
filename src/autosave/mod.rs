//! Periodic session saving.
//!
//! The scheduler runs a tokio interval on the current runtime and calls the
//! same save entry point as the explicit and close-time paths. It does not
//! look at the startup policy: only restore is gated by it.

use crate::env;
use crate::integration::SharedWorkbench;
use crate::settings::SettingsStore;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info};

/// Handle to a running autosave task. Dropping it stops the task.
pub struct AutosaveScheduler {
    handle: JoinHandle<()>,
    period: Duration,
}

impl AutosaveScheduler {
    /// Default cadence between two saves
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(env::autosave::DEFAULT_INTERVAL_MS);

    /// Spawn the autosave loop. The first save happens one `period` after start.
    ///
    /// # Panics
    ///
    /// Panics if `period` is zero or if called outside a tokio runtime.
    pub fn start<S>(workbench: SharedWorkbench<S>, period: Duration) -> Self
    where
        S: SettingsStore + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval_timer = interval_at(Instant::now() + period, period);
            interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval_timer.tick().await;

                let workbench = workbench.lock().await;
                match workbench.save_session() {
                    Ok(report) => debug!(
                        "Auto-save completed: {} tabs written",
                        report.tabs_written
                    ),
                    Err(e) => error!("Auto-save failed: {}", e),
                }
            }
        });

        info!("Auto-save started with interval: {}ms", period.as_millis());
        Self { handle, period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether the loop is still scheduled
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(&self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            info!("Auto-save stopped");
        }
    }
}

impl Drop for AutosaveScheduler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
