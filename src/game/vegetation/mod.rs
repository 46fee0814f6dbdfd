//! Vegetation Placement
//!
//! Two strategies scatter instances over the terrain:
//! - [`GridNoisePlacement`]: dense lattice filtered by height band and density noise
//! - [`UniformRandomPlacement`]: sparse random draws filtered by absolute height
//!
//! Both align each instance to the local surface normal and add a random yaw.

pub mod alignment;
pub mod grid_noise;
pub mod layer;
pub mod placement;
pub mod scatter;

pub use alignment::{InstanceTransform, align_up_to_normal};
pub use grid_noise::GridNoisePlacement;
pub use layer::{
    FallbackShape, GroundCoverConfig, ModelSource, ScatterConfig, VegetationLayer, VegetationModel,
};
pub use placement::{InstanceSet, PlacementError, PlacementReport, PlacementStrategy};
pub use scatter::{ShortfallPolicy, UniformRandomPlacement};
