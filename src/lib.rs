//! BioFusion-Core: real-time synthetic biosignal generation and fusion-quality engine
//!
//! The engine synthesizes three physiological-looking channels (ECG, EEG and
//! EMG), contaminates them with drift and transient artifacts, fuses them
//! into a single quality-weighted value and keeps a bounded window of recent
//! samples from which it derives four quality indicators:
//!
//! - signal-to-noise ratio (dB)
//! - artifact score
//! - drift score
//! - fusion confidence
//!
//! Every run is reproducible from its configured seed.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use biofusion_core::config::EngineConfig;
//! use biofusion_core::engine::{EngineState, TickScheduler};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = EngineState::new(EngineConfig::default())?;
//!     let mut handle = TickScheduler::start(state);
//!
//!     tokio::time::sleep(Duration::from_secs(2)).await;
//!     println!("Metrics: {:?}", handle.snapshot().metrics);
//!
//!     if let Some(state) = handle.stop().await? {
//!         println!("Ran {} ticks", state.tick_index());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod acquisition;
pub mod config;
pub mod engine;
pub mod error;
pub mod fusion;
pub mod quality;
pub mod simulation;
pub mod types;
pub mod view;

// Re-export commonly used types for convenience
pub use config::{ConfigError, ConfigLoader, EngineConfig, ValidationError};
pub use engine::{step, EngineSnapshot, EngineState, SnapshotStore};
#[cfg(feature = "runtime")]
pub use engine::{EngineHandle, TickScheduler};
pub use error::{EngineError, Result};
pub use types::{Metrics, Modality, Sample, TickRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Real-time synthetic biosignal generation and fusion-quality engine".to_string(),
        features: vec![
            "Seeded cardiac, cortical and muscular waveform synthesis".to_string(),
            "Drift and artifact injection".to_string(),
            "Quality-weighted channel fusion".to_string(),
            "Windowed quality metrics".to_string(),
            "Fixed-rate tick scheduling".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
