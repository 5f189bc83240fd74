// src/config/mod.rs
//! Engine configuration
//!
//! All noise, artifact and drift parameters are configuration rather than
//! fixed constants. Each section deserializes independently, so a TOML file
//! only has to name the keys it wants to change.

pub mod constants;
pub mod loader;
pub mod validation;

pub use constants::*;
pub use loader::{ConfigError, ConfigLoader};
pub use validation::{ValidationError, ValidationResult};

use serde::{Deserialize, Serialize};
use std::time::Duration;

use validation::{
    validate_finite_range, validate_len, validate_ordered, validate_probability, validate_range,
};

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub cardiac: CardiacConfig,
    #[serde(default)]
    pub cortical: CorticalConfig,
    #[serde(default)]
    pub muscular: MuscularConfig,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub drift: DriftConfig,
    #[serde(default)]
    pub fusion: FusionConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Tick timing, window size and seeding
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EngineSettings {
    #[serde(default = "defaults::tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "defaults::buffer_capacity")]
    pub buffer_capacity: usize,

    #[serde(default = "defaults::seed")]
    pub seed: u64,

    /// Timestamp of the first sample, in seconds
    #[serde(default = "defaults::initial_timestamp_s")]
    pub initial_timestamp_s: f64,
}

/// Cardiac waveform parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CardiacConfig {
    #[serde(default = "defaults::heart_rate_bpm")]
    pub heart_rate_bpm: f64,

    #[serde(default = "defaults::cardiac_amplitude")]
    pub amplitude: f64,

    /// Fractional per-beat jitter of the beat period
    #[serde(default = "defaults::rate_jitter")]
    pub rate_jitter: f64,

    /// Fractional per-beat jitter of the beat amplitude
    #[serde(default = "defaults::amplitude_jitter")]
    pub amplitude_jitter: f64,
}

/// One sinusoidal rhythm band
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct BandConfig {
    pub frequency_hz: f64,
    pub amplitude: f64,
}

/// Cortical waveform parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CorticalConfig {
    #[serde(default = "defaults::bands")]
    pub bands: Vec<BandConfig>,

    /// Maximum fractional amplitude excursion of each band
    #[serde(default = "defaults::modulation_depth")]
    pub modulation_depth: f64,

    #[serde(default = "defaults::modulation_step")]
    pub modulation_step: f64,

    #[serde(default = "defaults::background_noise")]
    pub background_noise: f64,
}

/// Muscular waveform parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MuscularConfig {
    #[serde(default = "defaults::baseline_envelope")]
    pub baseline_envelope: f64,

    #[serde(default = "defaults::burst_envelope")]
    pub burst_envelope: f64,

    #[serde(default = "defaults::burst_probability")]
    pub burst_probability: f64,

    #[serde(default = "defaults::min_burst_ticks")]
    pub min_burst_ticks: u32,

    #[serde(default = "defaults::max_burst_ticks")]
    pub max_burst_ticks: u32,

    /// Per-tick approach rate of the envelope towards its target
    #[serde(default = "defaults::envelope_smoothing")]
    pub envelope_smoothing: f64,

    /// Low-pass coefficient of the carrier noise (0 = white)
    #[serde(default = "defaults::color_alpha")]
    pub color_alpha: f64,
}

/// Transient artifact parameters, shared by all modalities
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArtifactConfig {
    /// Per-tick onset probability, independent per modality
    #[serde(default = "defaults::artifact_probability")]
    pub probability: f64,

    #[serde(default = "defaults::min_multiplier")]
    pub min_multiplier: f64,

    #[serde(default = "defaults::max_multiplier")]
    pub max_multiplier: f64,

    #[serde(default = "defaults::min_duration_ticks")]
    pub min_duration_ticks: u32,

    #[serde(default = "defaults::max_duration_ticks")]
    pub max_duration_ticks: u32,

    /// Geometric decay applied to the spike after each tick
    #[serde(default = "defaults::decay")]
    pub decay: f64,

    /// Normal amplitude of each channel (cardiac, cortical, muscular)
    #[serde(default = "defaults::nominal_amplitudes")]
    pub nominal_amplitudes: [f64; 3],
}

/// What happens when a drift accumulator crosses its ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftBoundPolicy {
    Reflect,
    Clamp,
    Reset,
}

/// Baseline drift parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DriftConfig {
    /// Largest per-tick random walk step
    #[serde(default = "defaults::drift_step")]
    pub step: f64,

    #[serde(default = "defaults::drift_ceiling")]
    pub ceiling: f64,

    #[serde(default = "defaults::bound_policy")]
    pub bound_policy: DriftBoundPolicy,
}

/// Fusion weighting parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FusionConfig {
    #[serde(default = "defaults::history_len")]
    pub history_len: usize,

    /// Rate at which each channel's reference variance follows its local variance
    #[serde(default = "defaults::baseline_rate")]
    pub baseline_rate: f64,

    #[serde(default = "defaults::sensitivity")]
    pub sensitivity: f64,

    #[serde(default = "defaults::drift_penalty")]
    pub drift_penalty: f64,

    /// Raw weight sum below which fusion falls back to equal weights
    #[serde(default = "defaults::min_weight_sum")]
    pub min_weight_sum: f64,
}

/// Quality metric parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default = "defaults::noise_floor")]
    pub noise_floor: f64,

    #[serde(default = "defaults::min_snr_db")]
    pub min_snr_db: f64,

    #[serde(default = "defaults::max_snr_db")]
    pub max_snr_db: f64,

    /// Ticks for fusion confidence to recover after an artifact
    #[serde(default = "defaults::recovery_ticks")]
    pub recovery_ticks: f64,
}

/// Display projection parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "defaults::chart_points")]
    pub chart_points: usize,
}

/// Default value providers using constants
mod defaults {
    use super::{BandConfig, DriftBoundPolicy};
    use crate::config::constants::*;

    pub fn tick_interval_ms() -> u64 { engine::DEFAULT_TICK_INTERVAL_MS }
    pub fn buffer_capacity() -> usize { engine::DEFAULT_BUFFER_CAPACITY }
    pub fn seed() -> u64 { engine::DEFAULT_SEED }
    pub fn initial_timestamp_s() -> f64 { engine::DEFAULT_INITIAL_TIMESTAMP_S }

    pub fn heart_rate_bpm() -> f64 { cardiac::DEFAULT_HEART_RATE_BPM }
    pub fn cardiac_amplitude() -> f64 { cardiac::DEFAULT_AMPLITUDE }
    pub fn rate_jitter() -> f64 { cardiac::DEFAULT_RATE_JITTER }
    pub fn amplitude_jitter() -> f64 { cardiac::DEFAULT_AMPLITUDE_JITTER }

    pub fn bands() -> Vec<BandConfig> {
        cortical::DEFAULT_BANDS
            .iter()
            .map(|&(frequency_hz, amplitude)| BandConfig { frequency_hz, amplitude })
            .collect()
    }
    pub fn modulation_depth() -> f64 { cortical::DEFAULT_MODULATION_DEPTH }
    pub fn modulation_step() -> f64 { cortical::DEFAULT_MODULATION_STEP }
    pub fn background_noise() -> f64 { cortical::DEFAULT_BACKGROUND_NOISE }

    pub fn baseline_envelope() -> f64 { muscular::DEFAULT_BASELINE_ENVELOPE }
    pub fn burst_envelope() -> f64 { muscular::DEFAULT_BURST_ENVELOPE }
    pub fn burst_probability() -> f64 { muscular::DEFAULT_BURST_PROBABILITY }
    pub fn min_burst_ticks() -> u32 { muscular::DEFAULT_MIN_BURST_TICKS }
    pub fn max_burst_ticks() -> u32 { muscular::DEFAULT_MAX_BURST_TICKS }
    pub fn envelope_smoothing() -> f64 { muscular::DEFAULT_ENVELOPE_SMOOTHING }
    pub fn color_alpha() -> f64 { muscular::DEFAULT_COLOR_ALPHA }

    pub fn artifact_probability() -> f64 { artifacts::DEFAULT_PROBABILITY }
    pub fn min_multiplier() -> f64 { artifacts::DEFAULT_MIN_MULTIPLIER }
    pub fn max_multiplier() -> f64 { artifacts::DEFAULT_MAX_MULTIPLIER }
    pub fn min_duration_ticks() -> u32 { artifacts::DEFAULT_MIN_DURATION_TICKS }
    pub fn max_duration_ticks() -> u32 { artifacts::DEFAULT_MAX_DURATION_TICKS }
    pub fn decay() -> f64 { artifacts::DEFAULT_DECAY }
    pub fn nominal_amplitudes() -> [f64; 3] { artifacts::DEFAULT_NOMINAL_AMPLITUDES }

    pub fn drift_step() -> f64 { drift::DEFAULT_STEP }
    pub fn drift_ceiling() -> f64 { drift::DEFAULT_CEILING }
    pub fn bound_policy() -> DriftBoundPolicy { DriftBoundPolicy::Reflect }

    pub fn history_len() -> usize { fusion::DEFAULT_HISTORY_LEN }
    pub fn baseline_rate() -> f64 { fusion::DEFAULT_BASELINE_RATE }
    pub fn sensitivity() -> f64 { fusion::DEFAULT_SENSITIVITY }
    pub fn drift_penalty() -> f64 { fusion::DEFAULT_DRIFT_PENALTY }
    pub fn min_weight_sum() -> f64 { fusion::DEFAULT_MIN_WEIGHT_SUM }

    pub fn noise_floor() -> f64 { metrics::DEFAULT_NOISE_FLOOR }
    pub fn min_snr_db() -> f64 { metrics::DEFAULT_MIN_SNR_DB }
    pub fn max_snr_db() -> f64 { metrics::DEFAULT_MAX_SNR_DB }
    pub fn recovery_ticks() -> f64 { metrics::DEFAULT_RECOVERY_TICKS }

    pub fn chart_points() -> usize { display::DEFAULT_CHART_POINTS }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: defaults::tick_interval_ms(),
            buffer_capacity: defaults::buffer_capacity(),
            seed: defaults::seed(),
            initial_timestamp_s: defaults::initial_timestamp_s(),
        }
    }
}

impl Default for CardiacConfig {
    fn default() -> Self {
        Self {
            heart_rate_bpm: defaults::heart_rate_bpm(),
            amplitude: defaults::cardiac_amplitude(),
            rate_jitter: defaults::rate_jitter(),
            amplitude_jitter: defaults::amplitude_jitter(),
        }
    }
}

impl Default for CorticalConfig {
    fn default() -> Self {
        Self {
            bands: defaults::bands(),
            modulation_depth: defaults::modulation_depth(),
            modulation_step: defaults::modulation_step(),
            background_noise: defaults::background_noise(),
        }
    }
}

impl Default for MuscularConfig {
    fn default() -> Self {
        Self {
            baseline_envelope: defaults::baseline_envelope(),
            burst_envelope: defaults::burst_envelope(),
            burst_probability: defaults::burst_probability(),
            min_burst_ticks: defaults::min_burst_ticks(),
            max_burst_ticks: defaults::max_burst_ticks(),
            envelope_smoothing: defaults::envelope_smoothing(),
            color_alpha: defaults::color_alpha(),
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            probability: defaults::artifact_probability(),
            min_multiplier: defaults::min_multiplier(),
            max_multiplier: defaults::max_multiplier(),
            min_duration_ticks: defaults::min_duration_ticks(),
            max_duration_ticks: defaults::max_duration_ticks(),
            decay: defaults::decay(),
            nominal_amplitudes: defaults::nominal_amplitudes(),
        }
    }
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            step: defaults::drift_step(),
            ceiling: defaults::drift_ceiling(),
            bound_policy: defaults::bound_policy(),
        }
    }
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            history_len: defaults::history_len(),
            baseline_rate: defaults::baseline_rate(),
            sensitivity: defaults::sensitivity(),
            drift_penalty: defaults::drift_penalty(),
            min_weight_sum: defaults::min_weight_sum(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            noise_floor: defaults::noise_floor(),
            min_snr_db: defaults::min_snr_db(),
            max_snr_db: defaults::max_snr_db(),
            recovery_ticks: defaults::recovery_ticks(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            chart_points: defaults::chart_points(),
        }
    }
}

impl EngineConfig {
    /// Wall-clock period between ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.engine.tick_interval_ms)
    }

    /// Simulated time advanced per tick, in seconds
    pub fn tick_interval_s(&self) -> f64 {
        self.engine.tick_interval_ms as f64 / engine::MILLISECONDS_PER_SECOND
    }

    /// Highest representable waveform frequency at the tick rate
    pub fn nyquist_hz(&self) -> f64 {
        0.5 / self.tick_interval_s()
    }

    /// Validate every section plus cross-field constraints
    pub fn validate(&self) -> ValidationResult<()> {
        let e = &self.engine;
        validate_range(
            "engine.tick_interval_ms",
            e.tick_interval_ms,
            engine::MIN_TICK_INTERVAL_MS,
            engine::MAX_TICK_INTERVAL_MS,
        )?;
        validate_range(
            "engine.buffer_capacity",
            e.buffer_capacity,
            engine::MIN_BUFFER_CAPACITY,
            engine::MAX_BUFFER_CAPACITY,
        )?;
        validate_finite_range(
            "engine.initial_timestamp_s",
            e.initial_timestamp_s,
            -engine::MAX_ABS_INITIAL_TIMESTAMP_S,
            engine::MAX_ABS_INITIAL_TIMESTAMP_S,
        )?;

        let c = &self.cardiac;
        validate_finite_range(
            "cardiac.heart_rate_bpm",
            c.heart_rate_bpm,
            cardiac::MIN_HEART_RATE_BPM,
            cardiac::MAX_HEART_RATE_BPM,
        )?;
        validate_finite_range("cardiac.amplitude", c.amplitude, 0.0, 100.0)?;
        validate_finite_range("cardiac.rate_jitter", c.rate_jitter, 0.0, 0.5)?;
        validate_finite_range("cardiac.amplitude_jitter", c.amplitude_jitter, 0.0, 0.5)?;

        let cx = &self.cortical;
        validate_len("cortical.bands", cx.bands.len(), 1, cortical::MAX_BANDS)?;
        let nyquist = self.nyquist_hz();
        for (i, band) in cx.bands.iter().enumerate() {
            validate_finite_range(&format!("cortical.bands[{}].amplitude", i), band.amplitude, 0.0, 100.0)?;
            validate_finite_range(
                &format!("cortical.bands[{}].frequency_hz", i),
                band.frequency_hz,
                0.0,
                f64::MAX,
            )?;
            if band.frequency_hz >= nyquist {
                return Err(ValidationError::ConstraintViolation {
                    fields: vec![
                        format!("cortical.bands[{}].frequency_hz", i),
                        "engine.tick_interval_ms".to_string(),
                    ],
                    message: format!(
                        "band frequency ({} Hz) must be below the tick Nyquist frequency ({} Hz)",
                        band.frequency_hz, nyquist
                    ),
                });
            }
        }
        validate_finite_range("cortical.modulation_depth", cx.modulation_depth, 0.0, 1.0)?;
        validate_finite_range("cortical.modulation_step", cx.modulation_step, 0.0, 1.0)?;
        validate_finite_range("cortical.background_noise", cx.background_noise, 0.0, 100.0)?;

        let m = &self.muscular;
        validate_finite_range("muscular.baseline_envelope", m.baseline_envelope, 0.0, 100.0)?;
        validate_finite_range("muscular.burst_envelope", m.burst_envelope, 0.0, 100.0)?;
        validate_probability("muscular.burst_probability", m.burst_probability)?;
        validate_range("muscular.min_burst_ticks", m.min_burst_ticks, 1, u32::MAX)?;
        validate_ordered(
            "muscular.min_burst_ticks",
            m.min_burst_ticks,
            "muscular.max_burst_ticks",
            m.max_burst_ticks,
        )?;
        validate_finite_range("muscular.envelope_smoothing", m.envelope_smoothing, 0.0, 1.0)?;
        validate_finite_range("muscular.color_alpha", m.color_alpha, 0.0, 0.99)?;

        let a = &self.artifacts;
        validate_probability("artifacts.probability", a.probability)?;
        validate_finite_range("artifacts.min_multiplier", a.min_multiplier, 0.0, 1000.0)?;
        validate_finite_range("artifacts.max_multiplier", a.max_multiplier, 0.0, 1000.0)?;
        validate_ordered(
            "artifacts.min_multiplier",
            a.min_multiplier,
            "artifacts.max_multiplier",
            a.max_multiplier,
        )?;
        validate_range("artifacts.min_duration_ticks", a.min_duration_ticks, 1, u32::MAX)?;
        validate_ordered(
            "artifacts.min_duration_ticks",
            a.min_duration_ticks,
            "artifacts.max_duration_ticks",
            a.max_duration_ticks,
        )?;
        validate_finite_range("artifacts.decay", a.decay, 0.0, 1.0)?;
        for (i, amplitude) in a.nominal_amplitudes.iter().enumerate() {
            validate_finite_range(&format!("artifacts.nominal_amplitudes[{}]", i), *amplitude, 0.0, 100.0)?;
        }

        let d = &self.drift;
        validate_finite_range("drift.ceiling", d.ceiling, f64::MIN_POSITIVE, 100.0)?;
        validate_finite_range("drift.step", d.step, 0.0, d.ceiling)?;

        let f = &self.fusion;
        validate_range("fusion.history_len", f.history_len, fusion::MIN_HISTORY_LEN, 10_000)?;
        validate_finite_range("fusion.baseline_rate", f.baseline_rate, 0.0, 1.0)?;
        validate_finite_range("fusion.sensitivity", f.sensitivity, 0.0, 100.0)?;
        validate_finite_range("fusion.drift_penalty", f.drift_penalty, 0.0, 100.0)?;
        validate_finite_range("fusion.min_weight_sum", f.min_weight_sum, 0.0, 1.0)?;

        let q = &self.metrics;
        validate_finite_range("metrics.noise_floor", q.noise_floor, 0.0, 1.0)?;
        validate_finite_range("metrics.min_snr_db", q.min_snr_db, -200.0, 200.0)?;
        validate_finite_range("metrics.max_snr_db", q.max_snr_db, -200.0, 200.0)?;
        validate_ordered("metrics.min_snr_db", q.min_snr_db, "metrics.max_snr_db", q.max_snr_db)?;
        validate_finite_range("metrics.recovery_ticks", q.recovery_ticks, f64::MIN_POSITIVE, 1e6)?;

        validate_range("display.chart_points", self.display.chart_points, 1, engine::MAX_BUFFER_CAPACITY)?;

        Ok(())
    }

    /// Get configuration summary
    pub fn get_summary(&self) -> ConfigSummary {
        ConfigSummary {
            tick_interval_ms: self.engine.tick_interval_ms,
            buffer_capacity: self.engine.buffer_capacity,
            seed: self.engine.seed,
            window_seconds: self.engine.buffer_capacity as f64 * self.tick_interval_s(),
            artifact_probability: self.artifacts.probability,
            drift_ceiling: self.drift.ceiling,
        }
    }
}

/// Configuration summary for display/logging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSummary {
    pub tick_interval_ms: u64,
    pub buffer_capacity: usize,
    pub seed: u64,
    pub window_seconds: f64,
    pub artifact_probability: f64,
    pub drift_ceiling: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.engine.tick_interval_ms, engine::DEFAULT_TICK_INTERVAL_MS);
        assert_eq!(config.engine.buffer_capacity, engine::DEFAULT_BUFFER_CAPACITY);
        assert_eq!(config.cortical.bands.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: EngineConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
[engine]
seed = 7

[drift]
bound_policy = "clamp"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.seed, 7);
        assert_eq!(config.engine.buffer_capacity, engine::DEFAULT_BUFFER_CAPACITY);
        assert_eq!(config.drift.bound_policy, DriftBoundPolicy::Clamp);
        assert_eq!(config.drift.ceiling, drift::DEFAULT_CEILING);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut config = EngineConfig::default();
        config.engine.buffer_capacity = 0;
        assert!(matches!(config.validate(), Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_band_above_nyquist_rejected() {
        let mut config = EngineConfig::default();
        config.engine.tick_interval_ms = 100; // Nyquist 5 Hz, alpha band is 10 Hz

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ValidationError::ConstraintViolation { .. }));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut config = EngineConfig::default();
        config.artifacts.min_duration_ticks = 5;
        config.artifacts.max_duration_ticks = 2;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.metrics.min_snr_db = 70.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_initial_timestamp_rejected() {
        let mut config = EngineConfig::default();
        config.engine.initial_timestamp_s = 1e17;
        assert!(matches!(config.validate(), Err(ValidationError::OutOfRange { .. })));

        config.engine.initial_timestamp_s = -1e17;
        assert!(config.validate().is_err());

        // Unix epoch seconds stay usable
        config.engine.initial_timestamp_s = 1.7e9;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_drift_step_above_ceiling_rejected() {
        let mut config = EngineConfig::default();
        config.drift.step = config.drift.ceiling * 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary() {
        let summary = EngineConfig::default().get_summary();
        assert_eq!(summary.buffer_capacity, engine::DEFAULT_BUFFER_CAPACITY);
        assert!((summary.window_seconds - 24.0).abs() < 1e-9);
    }
}
