// src/fusion/mod.rs
//! Multi-channel fusion

pub mod weighting;

pub use weighting::{FusionEngine, FusionOutput};
