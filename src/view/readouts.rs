// src/view/readouts.rs
//! Metric card readouts

use super::chart::round_to;
use crate::config::constants::display::METRIC_DECIMALS;
use crate::engine::EngineSnapshot;
use crate::quality::QualityLevel;
use crate::types::Metrics;
use serde::{Deserialize, Serialize};

pub const SNR_LABEL: &str = "SNR (dB)";
pub const ARTIFACT_LABEL: &str = "Artifact";
pub const DRIFT_LABEL: &str = "Drift";
pub const FUSION_CONFIDENCE_LABEL: &str = "Fusion Conf.";

/// Card colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
    Error,
    Neutral,
}

impl From<QualityLevel> for Status {
    fn from(level: QualityLevel) -> Self {
        match level {
            QualityLevel::Good => Status::Success,
            QualityLevel::Degraded => Status::Warning,
            QualityLevel::Poor => Status::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReadout {
    pub label: String,
    pub value: f64,
    pub status: Status,
}

impl MetricReadout {
    fn new(label: &str, value: f64, level: QualityLevel) -> Self {
        let status = if value.is_finite() { Status::from(level) } else { Status::Neutral };
        Self {
            label: label.to_string(),
            value: round_to(value, METRIC_DECIMALS),
            status,
        }
    }

    /// Value formatted the way the card shows it
    pub fn display_value(&self) -> String {
        format!("{:.*}", METRIC_DECIMALS as usize, self.value)
    }
}

/// The four metric cards, in display order
pub fn metric_readouts(metrics: &Metrics) -> Vec<MetricReadout> {
    vec![
        MetricReadout::new(
            SNR_LABEL,
            metrics.signal_to_noise_ratio_db,
            QualityLevel::from_snr_db(metrics.signal_to_noise_ratio_db),
        ),
        MetricReadout::new(
            ARTIFACT_LABEL,
            metrics.artifact_score,
            QualityLevel::from_score(metrics.artifact_score),
        ),
        MetricReadout::new(DRIFT_LABEL, metrics.drift_score, QualityLevel::from_score(metrics.drift_score)),
        MetricReadout::new(
            FUSION_CONFIDENCE_LABEL,
            metrics.fusion_confidence,
            QualityLevel::from_confidence(metrics.fusion_confidence),
        ),
    ]
}

/// Readouts for a snapshot; neutral until the first sample exists
pub fn snapshot_readouts(snapshot: &EngineSnapshot) -> Vec<MetricReadout> {
    let mut readouts = metric_readouts(&snapshot.metrics);
    if snapshot.samples.is_empty() {
        for readout in readouts.iter_mut() {
            readout.status = Status::Neutral;
        }
    }
    readouts
}
