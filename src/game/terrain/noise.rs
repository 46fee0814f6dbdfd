//! Fractal Noise Field
//!
//! Heights are a sum of Perlin octaves: each octave multiplies the frequency
//! by `lacunarity` and the amplitude by `persistence`. The field is a pure
//! function of (x, z) and the configuration, so the same config always
//! reproduces the same terrain.

use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on octave count. Beyond this the contribution of the last
/// octave is below f32 precision for any sane persistence.
pub const MAX_OCTAVES: u32 = 16;

/// Rejected noise parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NoiseConfigError {
    #[error("noise parameter `{0}` is not finite")]
    NotFinite(&'static str),
    #[error("octave count must be in 1..={MAX_OCTAVES}, got {0}")]
    Octaves(u32),
    #[error("base frequency must be positive, got {0}")]
    Frequency(f32),
    #[error("lacunarity must be positive, got {0}")]
    Lacunarity(f32),
    #[error("persistence must be non-negative, got {0}")]
    Persistence(f32),
    #[error("amplitude must be non-negative, got {0}")]
    Amplitude(f32),
}

/// Parameters of the fractal height function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Amplitude of the first octave, in world units
    pub amplitude: f32,
    /// Frequency of the first octave, in cycles per grid cell
    pub frequency: f32,
    pub octaves: u32,
    /// Frequency multiplier per octave
    pub lacunarity: f32,
    /// Amplitude multiplier per octave
    pub persistence: f32,
    /// Perlin permutation seed
    pub seed: u32,
}

impl Default for NoiseConfig {
    /// Rolling hills with a few sharp ridges, tuned for a 512x512 grid.
    fn default() -> Self {
        Self {
            amplitude: 70.0,
            frequency: 0.005,
            octaves: 6,
            lacunarity: 4.0,
            persistence: 0.15,
            seed: 0,
        }
    }
}

impl NoiseConfig {
    pub fn validate(&self) -> Result<(), NoiseConfigError> {
        let fields = [
            ("amplitude", self.amplitude),
            ("frequency", self.frequency),
            ("lacunarity", self.lacunarity),
            ("persistence", self.persistence),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(NoiseConfigError::NotFinite(name));
            }
        }
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(NoiseConfigError::Octaves(self.octaves));
        }
        if self.frequency <= 0.0 {
            return Err(NoiseConfigError::Frequency(self.frequency));
        }
        if self.lacunarity <= 0.0 {
            return Err(NoiseConfigError::Lacunarity(self.lacunarity));
        }
        if self.persistence < 0.0 {
            return Err(NoiseConfigError::Persistence(self.persistence));
        }
        if self.amplitude < 0.0 {
            return Err(NoiseConfigError::Amplitude(self.amplitude));
        }
        Ok(())
    }

    /// Sum of all octave amplitudes. No height can exceed this in magnitude.
    pub fn amplitude_bound(&self) -> f32 {
        let mut amplitude = self.amplitude;
        let mut bound = 0.0;
        for _ in 0..self.octaves {
            bound += amplitude;
            amplitude *= self.persistence;
        }
        bound
    }
}

/// Seeded fractal Perlin field.
#[derive(Clone)]
pub struct NoiseField {
    config: NoiseConfig,
    perlin: Perlin,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("config", &self.config)
            .finish()
    }
}

impl NoiseField {
    pub fn new(config: NoiseConfig) -> Result<Self, NoiseConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            perlin: Perlin::new(config.seed),
        })
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Fractal height at (x, z).
    pub fn height(&self, x: f32, z: f32) -> f32 {
        let mut frequency = self.config.frequency as f64;
        let mut amplitude = self.config.amplitude as f64;
        let mut total = 0.0f64;

        for _ in 0..self.config.octaves {
            // Perlin can overshoot [-1, 1] by a hair; clamp so the bound holds.
            let sample = self
                .perlin
                .get([x as f64 * frequency, z as f64 * frequency])
                .clamp(-1.0, 1.0);
            total += sample * amplitude;
            frequency *= self.config.lacunarity as f64;
            amplitude *= self.config.persistence as f64;
        }

        total as f32
    }

    /// Single-octave sample remapped to [0, 1]. Used by placement for density
    /// and scale channels.
    pub fn unit_sample(&self, x: f32, z: f32) -> f32 {
        let frequency = self.config.frequency as f64;
        let n = self.perlin.get([x as f64 * frequency, z as f64 * frequency]);
        ((n.clamp(-1.0, 1.0) + 1.0) * 0.5) as f32
    }
}
