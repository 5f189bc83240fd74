// src/engine/scheduler.rs
//! Fixed-rate tick driver on the tokio runtime

use super::snapshot::{EngineSnapshot, SnapshotStore};
use super::state::EngineState;
use crate::error::{EngineError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// Spawns the repeating tick task
pub struct TickScheduler;

impl TickScheduler {
    /// Start ticking `state` at its configured interval.
    ///
    /// Must be called from within a tokio runtime. The first tick runs
    /// immediately.
    pub fn start(state: EngineState) -> EngineHandle {
        let store = Arc::new(SnapshotStore::with_snapshot(state.snapshot()));
        Self::start_with_store(state, store)
    }

    /// Start ticking and publish snapshots into an existing store
    pub fn start_with_store(state: EngineState, store: Arc<SnapshotStore>) -> EngineHandle {
        let stop_requested = Arc::new(AtomicBool::new(false));
        let (stop_tx, stop_rx) = oneshot::channel();

        info!(
            tick_interval_ms = state.config().engine.tick_interval_ms,
            start_tick = state.tick_index(),
            "Tick scheduler started"
        );

        let task = tokio::spawn(run_ticks(
            state,
            Arc::clone(&store),
            Arc::clone(&stop_requested),
            stop_rx,
        ));

        EngineHandle {
            store,
            stop_requested,
            stop_tx: Some(stop_tx),
            task: Some(task),
        }
    }
}

async fn run_ticks(
    mut state: EngineState,
    store: Arc<SnapshotStore>,
    stop_requested: Arc<AtomicBool>,
    mut stop_rx: oneshot::Receiver<()>,
) -> EngineState {
    let mut ticker = interval(state.config().tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            _ = &mut stop_rx => {
                debug!("Stop signal received");
                break;
            }

            _ = ticker.tick() => {
                if stop_requested.load(Ordering::Acquire) {
                    break;
                }
                state.tick();
                store.publish(state.snapshot());
            }
        }
    }

    info!(ticks = state.tick_index(), artifacts = state.artifact_total(), "Tick scheduler stopped");
    state
}

/// Owner-side control of a running engine
pub struct EngineHandle {
    store: Arc<SnapshotStore>,
    stop_requested: Arc<AtomicBool>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<EngineState>>,
}

impl EngineHandle {
    /// Latest published snapshot
    pub fn snapshot(&self) -> Arc<EngineSnapshot> {
        self.store.latest()
    }

    /// Shared store for readers that outlive a borrow of the handle
    pub fn store(&self) -> Arc<SnapshotStore> {
        Arc::clone(&self.store)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop ticking and hand back the final state.
    ///
    /// A tick already in progress completes first. Returns `Ok(None)` if
    /// the engine was already stopped.
    pub async fn stop(&mut self) -> Result<Option<EngineState>> {
        let Some(task) = self.task.take() else {
            return Ok(None);
        };

        self.signal_stop();
        let state = task.await.map_err(|e| EngineError::Scheduler(e.to_string()))?;
        Ok(Some(state))
    }

    fn signal_stop(&mut self) {
        self.stop_requested.store(true, Ordering::Release);
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.signal_stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use std::time::Duration;

    fn engine() -> EngineState {
        EngineState::new(EngineConfig::default()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_at_configured_rate() {
        let interval_ms = EngineConfig::default().engine.tick_interval_ms;
        let mut handle = TickScheduler::start(engine());

        tokio::time::sleep(Duration::from_millis(interval_ms * 10 + interval_ms / 2)).await;
        let state = handle.stop().await.unwrap().unwrap();

        // Ticks at 0, 1, ..., 10 intervals
        assert_eq!(state.tick_index(), 11);
        assert_eq!(handle.snapshot().tick_index, 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_stop_is_noop() {
        let mut handle = TickScheduler::start(engine());
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(handle.stop().await.unwrap().is_some());
        assert!(handle.stop().await.unwrap().is_none());
        assert!(!handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_ticks_after_stop() {
        let mut handle = TickScheduler::start(engine());
        tokio::time::sleep(Duration::from_millis(200)).await;

        let state = handle.stop().await.unwrap().unwrap();
        let stopped_at = handle.snapshot().tick_index;
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(handle.snapshot().tick_index, stopped_at);
        assert_eq!(state.tick_index(), stopped_at);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let handle = TickScheduler::start(engine());
        let store = handle.store();
        tokio::time::sleep(Duration::from_millis(100)).await;

        drop(handle);
        tokio::task::yield_now().await;
        let after_drop = store.latest().tick_index;
        tokio::time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(store.latest().tick_index, after_drop);
    }
}
