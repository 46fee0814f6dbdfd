//! Procedural Terrain
//!
//! Fractal noise heightfield, derived normals, height bands and the mesh
//! built from them.

pub mod classify;
pub mod heightfield;
pub mod mesh;
pub mod noise;

pub use classify::{BandError, TerrainBands, TerrainType};
pub use heightfield::{GRID_STEP, Terrain, TerrainError};
pub use mesh::{build_terrain_mesh, build_water_quad};
pub use noise::{MAX_OCTAVES, NoiseConfig, NoiseConfigError, NoiseField};
