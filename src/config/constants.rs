// src/config/constants.rs
//! Engine-wide configuration constants
//!
//! Every tunable in [`EngineConfig`](crate::config::EngineConfig) takes its
//! default from here so the serde defaults, `Default` impls and validation
//! ranges stay in one place.

/// Tick scheduling and window constants
pub mod engine {
    pub const DEFAULT_TICK_INTERVAL_MS: u64 = 40;
    pub const MIN_TICK_INTERVAL_MS: u64 = 1;
    pub const MAX_TICK_INTERVAL_MS: u64 = 1000;

    pub const DEFAULT_BUFFER_CAPACITY: usize = 600;
    pub const MIN_BUFFER_CAPACITY: usize = 1;
    pub const MAX_BUFFER_CAPACITY: usize = 100_000;

    pub const DEFAULT_SEED: u64 = 0x5EED_F00D;
    pub const DEFAULT_INITIAL_TIMESTAMP_S: f64 = 0.0;
    /// Keeps a 1 ms tick far above the float spacing of `t`
    pub const MAX_ABS_INITIAL_TIMESTAMP_S: f64 = 1e10;

    pub const MILLISECONDS_PER_SECOND: f64 = 1_000.0;
}

/// Cardiac (ECG-like) waveform constants
pub mod cardiac {
    pub const DEFAULT_HEART_RATE_BPM: f64 = 72.0;
    pub const MIN_HEART_RATE_BPM: f64 = 20.0;
    pub const MAX_HEART_RATE_BPM: f64 = 240.0;

    pub const DEFAULT_AMPLITUDE: f64 = 1.0;
    pub const DEFAULT_RATE_JITTER: f64 = 0.04;
    pub const DEFAULT_AMPLITUDE_JITTER: f64 = 0.06;

    // Waveform shape, expressed as fractions of one beat
    pub const BASE_WAVE_FRACTION: f64 = 0.15;
    pub const QRS_CENTER: f64 = 0.30;
    pub const QRS_WIDTH: f64 = 0.025;
    pub const T_WAVE_CENTER: f64 = 0.62;
    pub const T_WAVE_WIDTH: f64 = 0.07;
    pub const T_WAVE_FRACTION: f64 = 0.25;
}

/// Cortical (EEG-like) waveform constants
pub mod cortical {
    /// (frequency Hz, amplitude) for delta, theta and alpha bands
    pub const DEFAULT_BANDS: [(f64, f64); 3] = [(2.0, 0.30), (6.0, 0.20), (10.0, 0.25)];
    pub const DEFAULT_MODULATION_DEPTH: f64 = 0.25;
    pub const DEFAULT_MODULATION_STEP: f64 = 0.02;
    pub const DEFAULT_BACKGROUND_NOISE: f64 = 0.03;
    pub const MAX_BANDS: usize = 8;
}

/// Muscular (EMG-like) waveform constants
pub mod muscular {
    pub const DEFAULT_BASELINE_ENVELOPE: f64 = 0.08;
    pub const DEFAULT_BURST_ENVELOPE: f64 = 0.7;
    pub const DEFAULT_BURST_PROBABILITY: f64 = 0.015;
    pub const DEFAULT_MIN_BURST_TICKS: u32 = 10;
    pub const DEFAULT_MAX_BURST_TICKS: u32 = 40;
    pub const DEFAULT_ENVELOPE_SMOOTHING: f64 = 0.25;
    pub const DEFAULT_COLOR_ALPHA: f64 = 0.2;
}

/// Artifact injection constants
pub mod artifacts {
    pub const DEFAULT_PROBABILITY: f64 = 0.003;
    pub const DEFAULT_MIN_MULTIPLIER: f64 = 4.0;
    pub const DEFAULT_MAX_MULTIPLIER: f64 = 8.0;
    pub const DEFAULT_MIN_DURATION_TICKS: u32 = 1;
    pub const DEFAULT_MAX_DURATION_TICKS: u32 = 3;
    pub const DEFAULT_DECAY: f64 = 0.45;

    /// Typical RMS level of each channel, used to scale spikes (cardiac, cortical, muscular)
    pub const DEFAULT_NOMINAL_AMPLITUDES: [f64; 3] = [0.3, 0.3, 0.3];
}

/// Baseline drift constants
pub mod drift {
    pub const DEFAULT_STEP: f64 = 0.004;
    pub const DEFAULT_CEILING: f64 = 0.15;
}

/// Fusion weighting constants
pub mod fusion {
    pub const DEFAULT_HISTORY_LEN: usize = 12;
    pub const MIN_HISTORY_LEN: usize = 2;
    pub const DEFAULT_BASELINE_RATE: f64 = 0.02;
    pub const DEFAULT_SENSITIVITY: f64 = 0.6;
    pub const DEFAULT_DRIFT_PENALTY: f64 = 1.0;
    pub const DEFAULT_MIN_WEIGHT_SUM: f64 = 1e-6;
    pub const VARIANCE_EPSILON: f64 = 1e-12;
}

/// Quality metric constants
pub mod metrics {
    pub const DEFAULT_NOISE_FLOOR: f64 = 1e-10;
    pub const DEFAULT_MIN_SNR_DB: f64 = -20.0;
    pub const DEFAULT_MAX_SNR_DB: f64 = 40.0;
    pub const DEFAULT_RECOVERY_TICKS: f64 = 25.0;

    pub const SNR_GOOD_THRESHOLD_DB: f64 = 15.0;
    pub const SNR_DEGRADED_THRESHOLD_DB: f64 = 5.0;
    pub const SCORE_GOOD_THRESHOLD: f64 = 0.25;
    pub const SCORE_DEGRADED_THRESHOLD: f64 = 0.6;
}

/// Display projection constants
pub mod display {
    pub const DEFAULT_CHART_POINTS: usize = 300;
    pub const TIME_DECIMALS: i32 = 1;
    pub const VALUE_DECIMALS: i32 = 3;
    pub const METRIC_DECIMALS: i32 = 2;
}

/// Configuration file locations
pub mod paths {
    pub const DEFAULT_CONFIG_FILE: &str = "config/biofusion.toml";
    pub const LOCAL_CONFIG_FILE: &str = "biofusion.local.toml";
    pub const ENV_PREFIX: &str = "BIOFUSION_";
    pub const ENV_SECTION_SEPARATOR: &str = "__";
}
