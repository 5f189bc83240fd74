// src/quality/metrics.rs
//! Stream quality indicators computed over the sample window

use crate::acquisition::SlidingWindow;
use crate::config::constants::metrics::{
    SCORE_DEGRADED_THRESHOLD, SCORE_GOOD_THRESHOLD, SNR_DEGRADED_THRESHOLD_DB, SNR_GOOD_THRESHOLD_DB,
};
use crate::config::{EngineConfig, MetricsConfig};
use crate::types::{Metrics, Modality, TickRecord, MODALITY_COUNT};
use serde::{Deserialize, Serialize};

/// Quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Good,
    Degraded,
    Poor,
}

impl QualityLevel {
    /// Higher SNR is better
    pub fn from_snr_db(snr_db: f64) -> Self {
        if snr_db >= SNR_GOOD_THRESHOLD_DB {
            QualityLevel::Good
        } else if snr_db >= SNR_DEGRADED_THRESHOLD_DB {
            QualityLevel::Degraded
        } else {
            QualityLevel::Poor
        }
    }

    /// For contamination scores, where higher is worse
    pub fn from_score(score: f64) -> Self {
        if score <= SCORE_GOOD_THRESHOLD {
            QualityLevel::Good
        } else if score <= SCORE_DEGRADED_THRESHOLD {
            QualityLevel::Degraded
        } else {
            QualityLevel::Poor
        }
    }

    /// For confidence values, where higher is better
    pub fn from_confidence(confidence: f64) -> Self {
        Self::from_score(1.0 - confidence)
    }
}

/// Per-indicator quality classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub snr: QualityLevel,
    pub artifact: QualityLevel,
    pub drift: QualityLevel,
    pub fusion_confidence: QualityLevel,
    /// Worst of the four
    pub overall: QualityLevel,
}

impl QualityAssessment {
    pub fn from_metrics(metrics: &Metrics) -> Self {
        let snr = QualityLevel::from_snr_db(metrics.signal_to_noise_ratio_db);
        let artifact = QualityLevel::from_score(metrics.artifact_score);
        let drift = QualityLevel::from_score(metrics.drift_score);
        let fusion_confidence = QualityLevel::from_confidence(metrics.fusion_confidence);
        let overall = snr.max(artifact).max(drift).max(fusion_confidence);

        Self {
            snr,
            artifact,
            drift,
            fusion_confidence,
            overall,
        }
    }

    pub fn is_acceptable(&self) -> bool {
        self.overall != QualityLevel::Poor
    }
}

/// Derives [`Metrics`] from the full record window
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    config: MetricsConfig,
    drift_ceiling: f64,
}

impl MetricsCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.metrics.clone(),
            drift_ceiling: config.drift.ceiling,
        }
    }

    /// Compute all four indicators. An empty window yields the defaults.
    pub fn compute(&self, window: &SlidingWindow<TickRecord>) -> Metrics {
        if window.is_empty() {
            return Metrics::default();
        }

        Metrics {
            signal_to_noise_ratio_db: self.signal_to_noise_ratio_db(window),
            artifact_score: artifact_score(window),
            drift_score: self.drift_score(window),
            fusion_confidence: self.fusion_confidence(window),
        }
    }

    /// Mean over modalities of clean-signal power against contamination power
    pub fn signal_to_noise_ratio_db(&self, window: &SlidingWindow<TickRecord>) -> f64 {
        if window.is_empty() {
            return 0.0;
        }

        let total: f64 = Modality::ALL
            .iter()
            .map(|&modality| {
                let (signal_power, noise_power) = channel_powers(window, modality);
                self.channel_snr_db(signal_power, noise_power)
            })
            .sum();

        self.clamp_snr(total / MODALITY_COUNT as f64)
    }

    fn channel_snr_db(&self, signal_power: f64, noise_power: f64) -> f64 {
        if noise_power <= self.config.noise_floor {
            return self.config.max_snr_db;
        }
        self.clamp_snr(10.0 * (signal_power / noise_power).log10())
    }

    fn clamp_snr(&self, snr_db: f64) -> f64 {
        if snr_db.is_nan() {
            return self.config.min_snr_db;
        }
        snr_db.clamp(self.config.min_snr_db, self.config.max_snr_db)
    }

    /// Mean normalized drift magnitude of the latest tick
    pub fn drift_score(&self, window: &SlidingWindow<TickRecord>) -> f64 {
        let Some(latest) = window.latest() else {
            return 0.0;
        };
        let mean = latest.drift.iter().map(|d| d.abs() / self.drift_ceiling).sum::<f64>() / MODALITY_COUNT as f64;
        clamp_unit(mean)
    }

    /// Weight balance scaled by how long the window has been artifact-free
    pub fn fusion_confidence(&self, window: &SlidingWindow<TickRecord>) -> f64 {
        let Some(latest) = window.latest() else {
            return 1.0;
        };

        let balance = normalized_entropy(&latest.weights);
        let recency = match window.iter().rev().position(TickRecord::has_artifact) {
            Some(ticks_since) => 1.0 - (-(ticks_since as f64) / self.config.recovery_ticks).exp(),
            None => 1.0,
        };

        clamp_unit(balance * recency)
    }
}

/// Artifact onsets across all channels per record in the window
pub fn artifact_score(window: &SlidingWindow<TickRecord>) -> f64 {
    if window.is_empty() {
        return 0.0;
    }
    let onsets: usize = window.iter().map(TickRecord::onset_count).sum();
    clamp_unit(onsets as f64 / window.len() as f64)
}

/// Mean power of the clean values and of the drift plus artifact on top
fn channel_powers(window: &SlidingWindow<TickRecord>, modality: Modality) -> (f64, f64) {
    let (signal_energy, noise_energy) = window.iter().fold((0.0, 0.0), |(signal, noise), record| {
        let clean = record.clean[modality.index()];
        let contamination = record.contamination(modality);
        (signal + clean * clean, noise + contamination * contamination)
    });

    let n = window.len().max(1) as f64;
    (signal_energy / n, noise_energy / n)
}

/// Shannon entropy of the weights divided by its maximum (1 = uniform)
fn normalized_entropy(weights: &[f64; MODALITY_COUNT]) -> f64 {
    let entropy: f64 = weights
        .iter()
        .filter(|&&w| w > 0.0 && w.is_finite())
        .map(|&w| -w * w.ln())
        .sum();
    clamp_unit(entropy / (MODALITY_COUNT as f64).ln())
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
