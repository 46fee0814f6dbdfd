//! Game Module
//!
//! Landscape systems built on the engine: terrain generation, vegetation
//! placement, day/night lighting, reflective water, scene configuration and
//! the renderer that draws them.

pub mod config;
pub mod landscape;
pub mod lighting;
pub mod render;
pub mod terrain;
pub mod vegetation;
pub mod water;

pub use config::{ConfigError, SceneConfig};
pub use landscape::{Landscape, LandscapeError};
pub use lighting::{DayCycle, SunModel, SunState};
pub use render::{SceneError, SceneRenderer};
pub use terrain::{Terrain, TerrainBands, TerrainType};
pub use vegetation::{GridNoisePlacement, PlacementStrategy, UniformRandomPlacement, VegetationLayer};
pub use water::{ClipPlane, WaterConfig, WaterPipeline};
