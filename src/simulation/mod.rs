//! Synthetic waveform generation and contamination
//! Location: src/simulation/mod.rs

pub mod artifact_injection;
pub mod noise_models;
pub mod signal_generator;

pub use artifact_injection::{ArtifactInjector, Contamination};
pub use noise_models::{ColoredNoise, GaussianSource};
pub use signal_generator::{
    CardiacGenerator, CorticalGenerator, MuscularGenerator, SignalGenerator, WaveformGenerator,
};
