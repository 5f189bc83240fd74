// src/engine/snapshot.rs
//! Read-only views of the engine published between ticks

use crate::types::{Metrics, Sample};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Frozen copy of the sample window and metrics after a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// Ticks completed when the snapshot was taken
    pub tick_index: u64,
    /// Retained samples, oldest first
    pub samples: Vec<Sample>,
    pub metrics: Metrics,
}

impl EngineSnapshot {
    pub fn latest_sample(&self) -> Option<&Sample> {
        self.samples.last()
    }
}

/// Latest published snapshot, shared between the tick task and readers.
///
/// Writers swap the whole `Arc`, so a reader holding an older snapshot is
/// never affected by later ticks.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: RwLock<Arc<EngineSnapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: EngineSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Replace the published snapshot
    pub fn publish(&self, snapshot: EngineSnapshot) {
        *self.current.write() = Arc::new(snapshot);
    }

    pub fn latest(&self) -> Arc<EngineSnapshot> {
        Arc::clone(&self.current.read())
    }
}
