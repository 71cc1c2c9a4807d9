//! Three-octave heightfield noise.

use noise::{NoiseFn, Perlin};

/// Relative amplitude of each octave.
pub const OCTAVE_WEIGHTS: [f32; 3] = [1.0, 0.3, 0.15];

/// Frequency multiplier of each octave.
pub const OCTAVE_FREQUENCIES: [f32; 3] = [1.0, 2.0, 4.0];

/// Sum of three Perlin octaves at decreasing amplitude and increasing
/// frequency. Deterministic for a given seed and coordinate.
#[derive(Clone)]
pub struct OctaveNoise {
    perlin: Perlin,
    amplitude: f32,
    frequency: f32,
}

impl OctaveNoise {
    pub fn new(seed: u32, amplitude: f32, frequency: f32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            amplitude,
            frequency,
        }
    }

    /// Height at world position (x, z).
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        OCTAVE_WEIGHTS
            .iter()
            .zip(OCTAVE_FREQUENCIES.iter())
            .map(|(weight, octave_freq)| {
                let f = (self.frequency * octave_freq) as f64;
                let n = self.perlin.get([x as f64 * f, z as f64 * f]) as f32;
                n * weight * self.amplitude
            })
            .sum()
    }

    /// Upper bound on |height_at|.
    pub fn max_height(&self) -> f32 {
        OCTAVE_WEIGHTS.iter().sum::<f32>() * self.amplitude
    }
}
