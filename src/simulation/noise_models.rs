//! Noise sources for waveform synthesis
//! Location: src/simulation/noise_models.rs
//!
//! Every draw goes through a caller-supplied RNG so a seeded engine replays
//! the same stream.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

/// Standard normal draw
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

/// Uniform draw in `[-half_width, half_width]`
pub fn symmetric_uniform<R: Rng + ?Sized>(rng: &mut R, half_width: f64) -> f64 {
    (rng.gen::<f64>() * 2.0 - 1.0) * half_width
}

/// Uniform draw in `[low, high]`
pub fn uniform_between<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + rng.gen::<f64>() * (high - low)
}

/// Gaussian noise scaled by a standard deviation
#[derive(Debug, Clone)]
pub struct GaussianSource {
    std_dev: f64,
}

impl GaussianSource {
    pub fn new(std_dev: f64) -> Self {
        Self { std_dev }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        gaussian(rng) * self.std_dev
    }
}

/// First-order low-passed Gaussian noise.
///
/// `alpha = 0` gives white noise; values towards 1 push energy to low
/// frequencies. Output is rescaled so its variance matches the white input.
#[derive(Debug, Clone)]
pub struct ColoredNoise {
    alpha: f64,
    gain: f64,
    previous_sample: f64,
}

impl ColoredNoise {
    pub fn new(alpha: f64) -> Self {
        let alpha = alpha.clamp(0.0, 0.99);
        // Var of y = a*y + (1-a)*x is (1-a)/(1+a) * Var(x)
        let gain = ((1.0 + alpha) / (1.0 - alpha)).sqrt();
        Self {
            alpha,
            gain,
            previous_sample: 0.0,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> f64 {
        let white_noise = gaussian(rng);
        self.previous_sample = self.alpha * self.previous_sample + (1.0 - self.alpha) * white_noise;
        self.previous_sample * self.gain
    }

    pub fn reset(&mut self) {
        self.previous_sample = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn mean_and_variance(values: &[f64]) -> (f64, f64) {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        (mean, var)
    }

    #[test]
    fn test_gaussian_statistics() {
        let mut rng = StdRng::seed_from_u64(1);
        let values: Vec<f64> = (0..20_000).map(|_| gaussian(&mut rng)).collect();
        let (mean, var) = mean_and_variance(&values);

        assert!(values.iter().all(|v| v.is_finite()));
        assert!(mean.abs() < 0.05, "mean {} too far from 0", mean);
        assert!((var - 1.0).abs() < 0.08, "variance {} too far from 1", var);
    }

    #[test]
    fn test_symmetric_uniform_bounds() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..1000 {
            let v = symmetric_uniform(&mut rng, 0.3);
            assert!((-0.3..=0.3).contains(&v));
        }
    }

    #[test]
    fn test_uniform_between_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = uniform_between(&mut rng, 4.0, 8.0);
            assert!((4.0..=8.0).contains(&v));
        }
    }

    #[test]
    fn test_colored_noise_preserves_variance() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut noise = ColoredNoise::new(0.5);
        let values: Vec<f64> = (0..20_000).map(|_| noise.sample(&mut rng)).collect();
        let (_, var) = mean_and_variance(&values);

        assert!((var - 1.0).abs() < 0.15, "variance {} too far from 1", var);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let source = GaussianSource::new(0.5);
        for _ in 0..100 {
            assert_eq!(source.sample(&mut a).to_bits(), source.sample(&mut b).to_bits());
        }
    }
}
