// src/engine/mod.rs
//! Simulation engine: state, snapshots and the tick scheduler

#[cfg(feature = "runtime")]
pub mod scheduler;
pub mod snapshot;
pub mod state;

#[cfg(feature = "runtime")]
pub use scheduler::{EngineHandle, TickScheduler};
pub use snapshot::{EngineSnapshot, SnapshotStore};
pub use state::EngineState;

/// Advance an owned state by one tick and hand it back
pub fn step(mut state: EngineState) -> EngineState {
    state.tick();
    state
}
