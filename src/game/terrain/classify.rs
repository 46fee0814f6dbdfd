//! Height Classification
//!
//! Maps a terrain height onto a surface type through an ascending threshold
//! ladder. Each band starts where the previous one ends, so every height
//! belongs to exactly one type and the mapping is monotonic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Surface type, ordered from lowest to highest band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TerrainType {
    Water,
    Sand,
    Grass,
    Rock,
    Snow,
}

impl TerrainType {
    pub const ALL: [TerrainType; 5] = [
        TerrainType::Water,
        TerrainType::Sand,
        TerrainType::Grass,
        TerrainType::Rock,
        TerrainType::Snow,
    ];

    /// Vertex color baked into the terrain mesh (linear RGB).
    pub fn color(self) -> [f32; 3] {
        match self {
            TerrainType::Water => [0.12, 0.22, 0.36],
            TerrainType::Sand => [0.76, 0.70, 0.50],
            TerrainType::Grass => [0.24, 0.52, 0.18],
            TerrainType::Rock => [0.45, 0.42, 0.40],
            TerrainType::Snow => [0.95, 0.95, 0.97],
        }
    }

    /// Whether ground-cover vegetation can grow here.
    pub fn is_vegetated(self) -> bool {
        matches!(self, TerrainType::Grass)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("terrain band thresholds must be finite and strictly ascending: {0:?}")]
pub struct BandError(pub [f32; 4]);

/// Upper bounds (exclusive) of the Water, Sand, Grass and Rock bands.
/// Anything at or above `rock` is Snow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainBands {
    pub water: f32,
    pub sand: f32,
    pub grass: f32,
    pub rock: f32,
}

impl Default for TerrainBands {
    fn default() -> Self {
        Self {
            water: 10.0,
            sand: 20.0,
            grass: 40.0,
            rock: 55.0,
        }
    }
}

impl TerrainBands {
    fn thresholds(&self) -> [f32; 4] {
        [self.water, self.sand, self.grass, self.rock]
    }

    pub fn validate(&self) -> Result<(), BandError> {
        let t = self.thresholds();
        let ascending = t.windows(2).all(|w| w[0] < w[1]);
        if t.iter().all(|v| v.is_finite()) && ascending {
            Ok(())
        } else {
            Err(BandError(t))
        }
    }

    pub fn classify(&self, height: f32) -> TerrainType {
        // Number of thresholds at or below `height` is the band index.
        let index = self.thresholds().partition_point(|&t| t <= height);
        TerrainType::ALL[index]
    }
}
