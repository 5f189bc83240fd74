// src/view/chart.rs
//! Chart-ready projection of the sample stream

use crate::config::constants::display::{TIME_DECIMALS, VALUE_DECIMALS};
use crate::types::Sample;
use serde::{Deserialize, Serialize};

/// One plotted point, keyed by the chart's series labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub t: f64,
    #[serde(rename = "ECG")]
    pub ecg: f64,
    #[serde(rename = "EEG")]
    pub eeg: f64,
    #[serde(rename = "EMG")]
    pub emg: f64,
    #[serde(rename = "Fused")]
    pub fused: f64,
}

impl From<&Sample> for ChartPoint {
    fn from(sample: &Sample) -> Self {
        Self {
            t: round_to(sample.t, TIME_DECIMALS),
            ecg: round_to(sample.ecg, VALUE_DECIMALS),
            eeg: round_to(sample.eeg, VALUE_DECIMALS),
            emg: round_to(sample.emg, VALUE_DECIMALS),
            fused: round_to(sample.fused, VALUE_DECIMALS),
        }
    }
}

/// The most recent `max_points` samples, rounded for display
pub fn chart_points(samples: &[Sample], max_points: usize) -> Vec<ChartPoint> {
    let start = samples.len().saturating_sub(max_points);
    samples[start..].iter().map(ChartPoint::from).collect()
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
