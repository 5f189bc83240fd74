// src/fusion/weighting.rs
//! Quality-aware weighted fusion of the contaminated channels

use crate::acquisition::{SlidingWindow, WindowError};
use crate::config::constants::fusion::VARIANCE_EPSILON;
use crate::config::{EngineConfig, FusionConfig};
use crate::types::MODALITY_COUNT;
use tracing::debug;

const EQUAL_WEIGHT: f64 = 1.0 / MODALITY_COUNT as f64;

/// Result of fusing one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionOutput {
    /// Weighted combination of the channel values
    pub fused: f64,
    /// Per-channel weights, summing to 1
    pub weights: [f64; MODALITY_COUNT],
    /// True when the equal-weight fallback was used
    pub fallback: bool,
}

/// Combines contaminated channels, down-weighting those that currently look
/// noisier than their own recent baseline.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    config: FusionConfig,
    drift_ceiling: f64,
    histories: [SlidingWindow<f64>; MODALITY_COUNT],
    baseline_variance: [Option<f64>; MODALITY_COUNT],
    fallback_count: u64,
}

impl FusionEngine {
    pub fn new(config: &EngineConfig) -> Result<Self, WindowError> {
        let history_len = config.fusion.history_len;
        Ok(Self {
            config: config.fusion.clone(),
            drift_ceiling: config.drift.ceiling,
            histories: [
                SlidingWindow::new(history_len)?,
                SlidingWindow::new(history_len)?,
                SlidingWindow::new(history_len)?,
            ],
            baseline_variance: [None; MODALITY_COUNT],
            fallback_count: 0,
        })
    }

    /// Fuse one tick of contaminated values given each channel's drift
    pub fn fuse(&mut self, values: [f64; MODALITY_COUNT], drifts: [f64; MODALITY_COUNT]) -> FusionOutput {
        for (history, value) in self.histories.iter_mut().zip(values) {
            history.push(value);
        }

        let mut raw = [1.0; MODALITY_COUNT];
        for (channel, weight) in raw.iter_mut().enumerate() {
            let noise = self.noise_estimate(channel, drifts[channel]);
            *weight = (-self.config.sensitivity * noise).exp();
        }

        let total: f64 = raw.iter().sum();
        let degenerate = !total.is_finite()
            || total < self.config.min_weight_sum
            || raw.iter().any(|w| !w.is_finite());

        let weights = if degenerate {
            self.fallback_count += 1;
            debug!(raw_sum = total, "All channels degraded, using equal fusion weights");
            [EQUAL_WEIGHT; MODALITY_COUNT]
        } else {
            raw.map(|w| w / total)
        };

        let fused = weights.iter().zip(values).map(|(w, x)| w * x).sum::<f64>();

        FusionOutput {
            fused,
            weights,
            fallback: degenerate,
        }
    }

    /// Noise level of a channel relative to its own recent behaviour.
    ///
    /// Zero until the history holds enough values for a variance.
    fn noise_estimate(&mut self, channel: usize, drift: f64) -> f64 {
        let drift_term = self.config.drift_penalty * drift.abs() / self.drift_ceiling;

        let Some(local) = local_variance(&self.histories[channel]) else {
            return drift_term;
        };
        if !local.is_finite() {
            return f64::NAN;
        }

        let baseline = self.baseline_variance[channel].get_or_insert(local);
        let excess = (local / baseline.max(VARIANCE_EPSILON) - 1.0).max(0.0);
        *baseline += self.config.baseline_rate * (local - *baseline);

        excess + drift_term
    }

    /// Ticks on which every channel was degraded at once
    pub fn fallback_count(&self) -> u64 {
        self.fallback_count
    }

    pub fn reset(&mut self) {
        for history in self.histories.iter_mut() {
            history.clear();
        }
        self.baseline_variance = [None; MODALITY_COUNT];
        self.fallback_count = 0;
    }
}

/// Population variance of the window, if it holds at least two values
fn local_variance(history: &SlidingWindow<f64>) -> Option<f64> {
    if history.len() < 2 {
        return None;
    }
    let n = history.len() as f64;
    let mean = history.iter().sum::<f64>() / n;
    Some(history.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n)
}
