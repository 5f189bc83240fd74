//! Base waveform synthesis for the three modalities
//! Location: src/simulation/signal_generator.rs
//!
//! Generators produce the clean (pre-artifact, pre-drift) value of their
//! channel once per tick. Morphology is only approximate; nothing here is
//! meant to be clinically faithful.

use super::noise_models::{symmetric_uniform, ColoredNoise, GaussianSource};
use crate::config::constants::cardiac as shape;
use crate::config::{CardiacConfig, CorticalConfig, EngineConfig, MuscularConfig};
use crate::types::{Modality, MODALITY_COUNT};
use rand::{Rng, RngCore};
use std::f64::consts::PI;

/// Produces one clean sample per tick for a single modality
pub trait WaveformGenerator: std::fmt::Debug + Send {
    /// Channel this generator feeds
    fn modality(&self) -> Modality;

    /// Next clean value after `dt` seconds of simulated time
    fn next_value(&mut self, dt: f64, rng: &mut dyn RngCore) -> f64;

    /// Return to the freshly constructed state
    fn reset(&mut self);
}

/// Quasi-periodic ECG-like waveform
#[derive(Debug, Clone)]
pub struct CardiacGenerator {
    config: CardiacConfig,
    /// Position within the current beat, in cycles
    phase: f64,
    beat_period_s: f64,
    beat_amplitude: f64,
}

impl CardiacGenerator {
    pub fn new(config: &CardiacConfig) -> Self {
        Self {
            config: config.clone(),
            phase: 0.0,
            beat_period_s: Self::nominal_period(config),
            beat_amplitude: config.amplitude,
        }
    }

    fn nominal_period(config: &CardiacConfig) -> f64 {
        60.0 / config.heart_rate_bpm
    }

    /// Draw period and amplitude jitter for the next beat
    fn start_new_beat(&mut self, rng: &mut dyn RngCore) {
        let rate_factor = 1.0 + symmetric_uniform(rng, self.config.rate_jitter);
        let amplitude_factor = 1.0 + symmetric_uniform(rng, self.config.amplitude_jitter);
        self.beat_period_s = Self::nominal_period(&self.config) * rate_factor;
        self.beat_amplitude = self.config.amplitude * amplitude_factor;
    }

    /// Beat shape at a phase in `[0, 1)`
    fn morphology(phase: f64) -> f64 {
        let dominant = shape::BASE_WAVE_FRACTION * (2.0 * PI * phase).sin();
        let qrs = gaussian_pulse(phase, shape::QRS_CENTER, shape::QRS_WIDTH);
        let t_wave = shape::T_WAVE_FRACTION * gaussian_pulse(phase, shape::T_WAVE_CENTER, shape::T_WAVE_WIDTH);
        dominant + qrs + t_wave
    }
}

fn gaussian_pulse(x: f64, center: f64, width: f64) -> f64 {
    let z = (x - center) / width;
    (-0.5 * z * z).exp()
}

impl WaveformGenerator for CardiacGenerator {
    fn modality(&self) -> Modality {
        Modality::Cardiac
    }

    fn next_value(&mut self, dt: f64, rng: &mut dyn RngCore) -> f64 {
        let value = self.beat_amplitude * Self::morphology(self.phase);

        self.phase += dt / self.beat_period_s;
        if self.phase >= 1.0 {
            self.phase = self.phase.fract();
            self.start_new_beat(rng);
        }

        value
    }

    fn reset(&mut self) {
        *self = Self::new(&self.config);
    }
}

#[derive(Debug, Clone)]
struct BandState {
    frequency_hz: f64,
    amplitude: f64,
    phase: f64,
    modulation: f64,
}

/// Superposition of low-frequency rhythm bands
#[derive(Debug, Clone)]
pub struct CorticalGenerator {
    config: CorticalConfig,
    bands: Vec<BandState>,
    background: GaussianSource,
}

impl CorticalGenerator {
    pub fn new(config: &CorticalConfig) -> Self {
        let band_count = config.bands.len().max(1) as f64;
        let bands = config
            .bands
            .iter()
            .enumerate()
            .map(|(i, band)| BandState {
                frequency_hz: band.frequency_hz,
                amplitude: band.amplitude,
                // Stagger start phases so bands do not all peak together at t=0
                phase: 2.0 * PI * i as f64 / band_count,
                modulation: 1.0,
            })
            .collect();

        Self {
            config: config.clone(),
            bands,
            background: GaussianSource::new(config.background_noise),
        }
    }
}

impl WaveformGenerator for CorticalGenerator {
    fn modality(&self) -> Modality {
        Modality::Cortical
    }

    fn next_value(&mut self, dt: f64, rng: &mut dyn RngCore) -> f64 {
        let depth = self.config.modulation_depth;
        let mut value = 0.0;

        for band in &mut self.bands {
            value += band.amplitude * band.modulation * band.phase.sin();

            band.phase += 2.0 * PI * band.frequency_hz * dt;
            if band.phase > 2.0 * PI {
                band.phase %= 2.0 * PI;
            }

            band.modulation += symmetric_uniform(rng, self.config.modulation_step);
            band.modulation = band.modulation.clamp(1.0 - depth, 1.0 + depth);
        }

        value + self.background.sample(rng)
    }

    fn reset(&mut self) {
        *self = Self::new(&self.config);
    }
}

/// Broadband noise carrier under a bursting contraction envelope
#[derive(Debug, Clone)]
pub struct MuscularGenerator {
    config: MuscularConfig,
    carrier: ColoredNoise,
    envelope: f64,
    burst_ticks_remaining: u32,
}

impl MuscularGenerator {
    pub fn new(config: &MuscularConfig) -> Self {
        Self {
            config: config.clone(),
            carrier: ColoredNoise::new(config.color_alpha),
            envelope: config.baseline_envelope,
            burst_ticks_remaining: 0,
        }
    }

    /// Whether a contraction burst is in progress
    pub fn is_bursting(&self) -> bool {
        self.burst_ticks_remaining > 0
    }

    fn update_envelope(&mut self, rng: &mut dyn RngCore) {
        if self.burst_ticks_remaining == 0 && rng.gen::<f64>() < self.config.burst_probability {
            self.burst_ticks_remaining =
                rng.gen_range(self.config.min_burst_ticks..=self.config.max_burst_ticks);
        }

        let target = if self.burst_ticks_remaining > 0 {
            self.burst_ticks_remaining -= 1;
            self.config.burst_envelope
        } else {
            self.config.baseline_envelope
        };

        self.envelope += self.config.envelope_smoothing * (target - self.envelope);
    }
}

impl WaveformGenerator for MuscularGenerator {
    fn modality(&self) -> Modality {
        Modality::Muscular
    }

    fn next_value(&mut self, _dt: f64, rng: &mut dyn RngCore) -> f64 {
        self.update_envelope(rng);
        self.envelope * self.carrier.sample(rng)
    }

    fn reset(&mut self) {
        self.carrier.reset();
        self.envelope = self.config.baseline_envelope;
        self.burst_ticks_remaining = 0;
    }
}

/// One generator per modality, driven in channel order
#[derive(Debug)]
pub struct SignalGenerator {
    generators: [Box<dyn WaveformGenerator>; MODALITY_COUNT],
}

impl SignalGenerator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            generators: [
                Box::new(CardiacGenerator::new(&config.cardiac)),
                Box::new(CorticalGenerator::new(&config.cortical)),
                Box::new(MuscularGenerator::new(&config.muscular)),
            ],
        }
    }

    /// Clean values for every modality, in [`Modality::ALL`] order
    pub fn generate(&mut self, dt: f64, rng: &mut dyn RngCore) -> [f64; MODALITY_COUNT] {
        let mut values = [0.0; MODALITY_COUNT];
        for generator in self.generators.iter_mut() {
            values[generator.modality().index()] = generator.next_value(dt, rng);
        }
        values
    }

    pub fn reset(&mut self) {
        for generator in self.generators.iter_mut() {
            generator.reset();
        }
    }
}
