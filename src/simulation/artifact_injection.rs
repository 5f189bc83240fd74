//! Drift and transient artifact contamination
//! Location: src/simulation/artifact_injection.rs

use super::noise_models::{symmetric_uniform, uniform_between};
use crate::config::{ArtifactConfig, DriftBoundPolicy, DriftConfig, EngineConfig};
use crate::types::{Modality, MODALITY_COUNT};
use rand::{Rng, RngCore};
use tracing::{debug, trace};

/// A clean value after drift and artifact have been added
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contamination {
    /// Contaminated reading
    pub value: f64,
    /// Drift offset included in `value`
    pub drift: f64,
    /// Whether a new artifact started on this tick
    pub artifact_onset: bool,
}

#[derive(Debug, Clone)]
struct SpikeState {
    amplitude: f64,
    ticks_remaining: u32,
}

/// Per-modality contamination source
#[derive(Debug, Clone)]
pub struct ArtifactInjector {
    modality: Modality,
    artifacts: ArtifactConfig,
    drift_config: DriftConfig,
    nominal_amplitude: f64,
    drift: f64,
    spike: Option<SpikeState>,
    forced: bool,
    onset_count: u64,
}

impl ArtifactInjector {
    pub fn new(modality: Modality, artifacts: &ArtifactConfig, drift: &DriftConfig) -> Self {
        Self {
            modality,
            artifacts: artifacts.clone(),
            drift_config: drift.clone(),
            nominal_amplitude: artifacts.nominal_amplitudes[modality.index()],
            drift: 0.0,
            spike: None,
            forced: false,
            onset_count: 0,
        }
    }

    /// One injector per modality, in channel order
    pub fn for_all(config: &EngineConfig) -> [ArtifactInjector; MODALITY_COUNT] {
        Modality::ALL.map(|modality| Self::new(modality, &config.artifacts, &config.drift))
    }

    /// Add this tick's drift and artifact to a clean value
    pub fn contaminate(&mut self, clean: f64, rng: &mut dyn RngCore) -> Contamination {
        let drift = self.update_drift(rng);
        let (artifact, artifact_onset) = self.update_artifact(rng);

        Contamination {
            value: clean + drift + artifact,
            drift,
            artifact_onset,
        }
    }

    /// Arm a spike that starts on the next call to [`contaminate`](Self::contaminate)
    pub fn force_artifact(&mut self) {
        self.forced = true;
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn current_drift(&self) -> f64 {
        self.drift
    }

    pub fn is_artifact_active(&self) -> bool {
        self.spike.is_some()
    }

    /// Artifact onsets since construction or the last reset
    pub fn onset_count(&self) -> u64 {
        self.onset_count
    }

    pub fn reset(&mut self) {
        self.drift = 0.0;
        self.spike = None;
        self.forced = false;
        self.onset_count = 0;
    }

    fn update_drift(&mut self, rng: &mut dyn RngCore) -> f64 {
        let ceiling = self.drift_config.ceiling;
        self.drift += symmetric_uniform(rng, self.drift_config.step);

        if self.drift.abs() > ceiling {
            trace!(
                modality = %self.modality,
                drift = self.drift,
                policy = ?self.drift_config.bound_policy,
                "Drift exceeded ceiling"
            );
            self.drift = match self.drift_config.bound_policy {
                DriftBoundPolicy::Reflect => {
                    let mirrored = self.drift.signum() * 2.0 * ceiling - self.drift;
                    mirrored.clamp(-ceiling, ceiling)
                }
                DriftBoundPolicy::Clamp => self.drift.clamp(-ceiling, ceiling),
                DriftBoundPolicy::Reset => 0.0,
            };
        }

        self.drift
    }

    /// Current artifact contribution and whether it started this tick
    fn update_artifact(&mut self, rng: &mut dyn RngCore) -> (f64, bool) {
        let forced = std::mem::take(&mut self.forced);
        let onset = forced || (self.spike.is_none() && rng.gen::<f64>() < self.artifacts.probability);

        if onset {
            self.start_spike(rng);
        }

        let Some(spike) = self.spike.as_mut() else {
            return (0.0, false);
        };

        let contribution = spike.amplitude;
        spike.amplitude *= self.artifacts.decay;
        spike.ticks_remaining = spike.ticks_remaining.saturating_sub(1);
        if spike.ticks_remaining == 0 {
            self.spike = None;
        }

        (contribution, onset)
    }

    fn start_spike(&mut self, rng: &mut dyn RngCore) {
        let multiplier = uniform_between(rng, self.artifacts.min_multiplier, self.artifacts.max_multiplier);
        let sign = if rng.gen::<bool>() { 1.0 } else { -1.0 };
        let duration = rng.gen_range(self.artifacts.min_duration_ticks..=self.artifacts.max_duration_ticks);
        let amplitude = sign * multiplier * self.nominal_amplitude;

        debug!(
            modality = %self.modality,
            amplitude,
            duration,
            "Artifact onset"
        );

        self.spike = Some(SpikeState {
            amplitude,
            ticks_remaining: duration.max(1),
        });
        self.onset_count += 1;
    }
}
