// src/engine/state.rs
//! Explicit engine state advanced one tick at a time

use super::snapshot::EngineSnapshot;
use crate::acquisition::SlidingWindow;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::fusion::FusionEngine;
use crate::quality::MetricsCalculator;
use crate::simulation::{ArtifactInjector, SignalGenerator};
use crate::types::{Metrics, Modality, Sample, TickRecord, MODALITY_COUNT};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, trace};

/// Everything one simulation session owns.
///
/// State changes only inside [`tick`](Self::tick). Readers take
/// [`snapshot`](Self::snapshot) copies between ticks.
#[derive(Debug)]
pub struct EngineState {
    config: EngineConfig,
    tick_index: u64,
    rng: StdRng,
    generator: SignalGenerator,
    injectors: [ArtifactInjector; MODALITY_COUNT],
    fusion: FusionEngine,
    calculator: MetricsCalculator,
    window: SlidingWindow<TickRecord>,
    metrics: Metrics,
    artifact_total: u64,
    last_artifact_tick: Option<u64>,
}

impl EngineState {
    /// Validate the configuration and build a fresh, seeded engine
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let state = Self {
            rng: StdRng::seed_from_u64(config.engine.seed),
            generator: SignalGenerator::new(&config),
            injectors: ArtifactInjector::for_all(&config),
            fusion: FusionEngine::new(&config)?,
            calculator: MetricsCalculator::new(&config),
            window: SlidingWindow::new(config.engine.buffer_capacity)?,
            metrics: Metrics::default(),
            tick_index: 0,
            artifact_total: 0,
            last_artifact_tick: None,
            config,
        };

        info!(
            seed = state.config.engine.seed,
            capacity = state.config.engine.buffer_capacity,
            tick_interval_ms = state.config.engine.tick_interval_ms,
            "Simulation engine created"
        );

        Ok(state)
    }

    /// Run one generate, contaminate, fuse, append, measure cycle
    pub fn tick(&mut self) -> Sample {
        let dt = self.config.tick_interval_s();
        let t = self.timestamp_at(self.tick_index);
        let clean = self.generator.generate(dt, &mut self.rng);

        let mut values = [0.0; MODALITY_COUNT];
        let mut drift = [0.0; MODALITY_COUNT];
        let mut artifact_onsets = [false; MODALITY_COUNT];
        for (i, injector) in self.injectors.iter_mut().enumerate() {
            let contamination = injector.contaminate(clean[i], &mut self.rng);
            values[i] = contamination.value;
            drift[i] = contamination.drift;
            artifact_onsets[i] = contamination.artifact_onset;
        }

        let fusion = self.fusion.fuse(values, drift);
        let sample = Sample {
            t,
            ecg: values[0],
            eeg: values[1],
            emg: values[2],
            fused: fusion.fused,
        };
        let record = TickRecord {
            sample,
            clean,
            weights: fusion.weights,
            drift,
            artifact_onsets,
        };

        let onsets = record.onset_count() as u64;
        if onsets > 0 {
            self.artifact_total += onsets;
            self.last_artifact_tick = Some(self.tick_index);
        }

        self.window.push(record);
        self.metrics = self.calculator.compute(&self.window);

        trace!(tick = self.tick_index, t, fused = sample.fused, "Tick complete");
        self.tick_index += 1;

        sample
    }

    /// Rewind to tick zero with the configured seed, dropping all retained samples
    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.config.engine.seed);
        self.generator.reset();
        for injector in self.injectors.iter_mut() {
            injector.reset();
        }
        self.fusion.reset();
        self.window.clear();
        self.metrics = Metrics::default();
        self.tick_index = 0;
        self.artifact_total = 0;
        self.last_artifact_tick = None;

        info!(seed = self.config.engine.seed, "Simulation engine reset");
    }

    /// Advance `ticks` ticks synchronously
    pub fn run_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Timestamp assigned to a given tick index
    pub fn timestamp_at(&self, tick_index: u64) -> f64 {
        self.config.engine.initial_timestamp_s + tick_index as f64 * self.config.tick_interval_s()
    }

    /// Start a spike on `modality` during the next tick
    pub fn force_artifact(&mut self, modality: Modality) {
        self.injectors[modality.index()].force_artifact();
    }

    /// Number of ticks completed
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Retained samples, oldest first
    pub fn samples(&self) -> Vec<Sample> {
        self.window.iter().map(|r| r.sample).collect()
    }

    pub fn latest_sample(&self) -> Option<Sample> {
        self.window.latest().map(|r| r.sample)
    }

    /// Full per-tick records backing the samples
    pub fn window(&self) -> &SlidingWindow<TickRecord> {
        &self.window
    }

    /// Artifact onsets over the whole session, across all channels
    pub fn artifact_total(&self) -> u64 {
        self.artifact_total
    }

    pub fn last_artifact_tick(&self) -> Option<u64> {
        self.last_artifact_tick
    }

    /// Ticks on which fusion fell back to equal weights
    pub fn fusion_fallbacks(&self) -> u64 {
        self.fusion.fallback_count()
    }

    /// Immutable copy for readers
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            tick_index: self.tick_index,
            samples: self.samples(),
            metrics: self.metrics,
        }
    }
}
