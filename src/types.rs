// src/types.rs
//! Core value types shared by the engine and its consumers

use serde::{Deserialize, Serialize};

/// Number of simulated modalities
pub const MODALITY_COUNT: usize = 3;

/// The three simulated physiological channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// ECG-like channel
    Cardiac,
    /// EEG-like channel
    Cortical,
    /// EMG-like channel
    Muscular,
}

impl Modality {
    /// All modalities in channel order
    pub const ALL: [Modality; MODALITY_COUNT] = [Modality::Cardiac, Modality::Cortical, Modality::Muscular];

    /// Position of this modality in every per-channel array
    pub const fn index(self) -> usize {
        match self {
            Modality::Cardiac => 0,
            Modality::Cortical => 1,
            Modality::Muscular => 2,
        }
    }

    /// Short signal label used by the chart
    pub const fn label(self) -> &'static str {
        match self {
            Modality::Cardiac => "ECG",
            Modality::Cortical => "EEG",
            Modality::Muscular => "EMG",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One instant of the stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp in seconds, strictly increasing
    pub t: f64,
    pub ecg: f64,
    pub eeg: f64,
    pub emg: f64,
    pub fused: f64,
}

impl Sample {
    /// Contaminated reading of one modality
    pub fn channel(&self, modality: Modality) -> f64 {
        match modality {
            Modality::Cardiac => self.ecg,
            Modality::Cortical => self.eeg,
            Modality::Muscular => self.emg,
        }
    }

    /// Contaminated readings in channel order
    pub fn channels(&self) -> [f64; MODALITY_COUNT] {
        [self.ecg, self.eeg, self.emg]
    }
}

/// Everything the quality calculator needs to know about one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRecord {
    pub sample: Sample,
    /// Generator output before drift and artifacts, in channel order
    pub clean: [f64; MODALITY_COUNT],
    /// Fusion weights used for `sample.fused`
    pub weights: [f64; MODALITY_COUNT],
    /// Drift offset carried by each channel
    pub drift: [f64; MODALITY_COUNT],
    /// Channels on which an artifact started this tick
    pub artifact_onsets: [bool; MODALITY_COUNT],
}

impl TickRecord {
    /// Number of channels with an artifact onset on this tick
    pub fn onset_count(&self) -> usize {
        self.artifact_onsets.iter().filter(|&&onset| onset).count()
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact_onsets.iter().any(|&onset| onset)
    }

    /// Drift plus artifact carried by one channel
    pub fn contamination(&self, modality: Modality) -> f64 {
        self.sample.channel(modality) - self.clean[modality.index()]
    }
}

/// Quality indicator snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Finite; typically 0 to 40
    pub signal_to_noise_ratio_db: f64,
    /// In [0, 1], higher means more contamination
    pub artifact_score: f64,
    /// In [0, 1], higher means more baseline wander
    pub drift_score: f64,
    /// In [0, 1], higher means a more trustworthy fused value
    pub fusion_confidence: f64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            signal_to_noise_ratio_db: 0.0,
            artifact_score: 0.0,
            drift_score: 0.0,
            fusion_confidence: 1.0,
        }
    }
}
