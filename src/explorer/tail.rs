//! Live-tail polling.
//!
//! While "now" mode is active a single recurring task refreshes the
//! histogram and fetches everything past the tail cursor. Exactly one task
//! handle may exist at a time; arming a new one always cancels the previous
//! handle first so polling never duplicates.

use anyhow::Result;
use chrono::Utc;
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::core::bus::ExplorerEvent;

use super::LogExplorer;

pub const DEFAULT_TAIL_CHUNK_PERIOD: Duration = Duration::from_millis(5_000);

/// Owner of the recurring tail task.
#[derive(Clone)]
pub struct TailHandle {
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TailHandle {
    pub fn new() -> Self {
        Self {
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Install a new task, cancelling any existing one first.
    pub fn arm(&self, task: JoinHandle<()>) {
        let mut guard = self.handle.lock();
        if let Some(old) = guard.take() {
            old.abort();
        }
        *guard = Some(task);
    }

    pub fn cancel(&self) {
        if let Some(task) = self.handle.lock().take() {
            task.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }
}

impl Default for TailHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl LogExplorer {
    /// Arm the tail polling task. The tail cursor resets to the current
    /// instant so the first tick fetches from the moment live mode was
    /// armed.
    pub fn start_live_tail(&self) {
        self.state.write(|s| {
            s.next_tail_lower_bound = Some(Utc::now());
            s.live_updating = true;
        });
        log::info!("[TAIL] live tail armed, period {:?}", self.tail_period);

        let explorer = self.clone();
        let period = self.tail_period;
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; a full period
            // must elapse before the first poll.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(err) = explorer.tail_tick().await {
                    log::warn!("[TAIL] polling cycle failed: {err:#}");
                    explorer
                        .bus
                        .publish(ExplorerEvent::Error(err.to_string()));
                }
            }
        });
        self.tail.arm(task);
        self.refresh_props();
    }

    /// Cancel the tail task and leave live mode.
    pub fn stop_live_tail(&self) {
        self.tail.cancel();
        let was_live = self.state.write(|s| std::mem::replace(&mut s.live_updating, false));
        if was_live {
            log::info!("[TAIL] live tail stopped");
        }
        self.refresh_props();
    }

    /// Whether the recurring task is currently armed.
    pub fn live_tail_armed(&self) -> bool {
        self.tail.is_armed()
    }

    async fn tail_tick(&self) -> Result<()> {
        if self.state.read(|s| s.search_status.blocks_fetching()) {
            return Ok(());
        }
        self.execute_histogram_query().await?;
        self.fetch_tail_chunk().await?;
        self.bus.publish(ExplorerEvent::Tick);
        Ok(())
    }
}
