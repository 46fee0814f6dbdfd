//! Vegetation Layers
//!
//! A layer is one visual asset (a model, an optional diffuse texture and a
//! tint) together with the instance set placed for it. Models come from
//! `.vmesh` files; when a file is missing or broken the layer falls back to a
//! built-in primitive. Textures are decoded at upload time and fall back to
//! white.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::assets::load_mesh;
use crate::game::terrain::Terrain;
use crate::render::instancing::{VegetationInstance, pack_color};
use crate::render::mesh::MeshData;
use crate::render::primitives;

use super::grid_noise::GridNoisePlacement;
use super::placement::{InstanceSet, PlacementError, PlacementStrategy};
use super::scatter::UniformRandomPlacement;

/// Built-in model used when no asset file is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackShape {
    GrassBlade,
    Shrub,
    Flower,
}

impl FallbackShape {
    pub fn build(self) -> MeshData {
        match self {
            FallbackShape::GrassBlade => primitives::grass_blade([0.25, 0.55, 0.15, 1.0]),
            FallbackShape::Shrub => primitives::cone(0.6, 1.4, 7, [0.16, 0.36, 0.12, 1.0]),
            FallbackShape::Flower => primitives::cone(0.15, 0.35, 5, [0.95, 0.85, 0.3, 1.0]),
        }
    }
}

/// Where a layer's model came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    File(PathBuf),
    Fallback(FallbackShape),
}

/// A model ready for instancing, with its authored up axis.
#[derive(Debug, Clone)]
pub struct VegetationModel {
    pub mesh: MeshData,
    pub up: Vec3,
    pub source: ModelSource,
}

impl VegetationModel {
    /// Load `path` if given; any failure degrades to `fallback` with a warning.
    pub fn load_or_fallback(path: Option<&Path>, fallback: FallbackShape) -> Self {
        if let Some(path) = path {
            match load_mesh(path) {
                Ok(loaded) if !loaded.mesh.is_empty() => {
                    return Self {
                        mesh: loaded.mesh,
                        up: Vec3::from_array(loaded.metadata.up_axis).normalize(),
                        source: ModelSource::File(path.to_path_buf()),
                    };
                }
                Ok(_) => log::warn!("Model {} is empty, using {:?}", path.display(), fallback),
                Err(e) => log::warn!(
                    "Failed to load model {}: {}, using {:?}",
                    path.display(),
                    e,
                    fallback
                ),
            }
        }
        Self {
            mesh: fallback.build(),
            up: Vec3::Y,
            source: ModelSource::Fallback(fallback),
        }
    }
}

/// Ground cover placed on a noise-filtered lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundCoverConfig {
    #[serde(flatten)]
    pub placement: GridNoisePlacement,
    pub model: Option<PathBuf>,
    /// Diffuse texture sampled with the model UVs
    pub texture: Option<PathBuf>,
    pub tint: [f32; 4],
}

impl Default for GroundCoverConfig {
    fn default() -> Self {
        Self {
            placement: GridNoisePlacement::default(),
            model: None,
            texture: None,
            tint: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Sparse objects scattered at random within a height band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    #[serde(flatten)]
    pub placement: UniformRandomPlacement,
    pub model: Option<PathBuf>,
    pub texture: Option<PathBuf>,
    pub fallback: FallbackShape,
    pub tint: [f32; 4],
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            placement: UniformRandomPlacement::default(),
            model: None,
            texture: None,
            fallback: FallbackShape::Shrub,
            tint: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// A placed, renderable vegetation asset.
#[derive(Debug, Clone)]
pub struct VegetationLayer {
    pub model: VegetationModel,
    pub instances: InstanceSet,
    pub tint: u32,
    pub texture: Option<PathBuf>,
}

impl VegetationLayer {
    pub fn place<S: PlacementStrategy>(
        terrain: &Terrain,
        strategy: &S,
        model: VegetationModel,
        tint: [f32; 4],
    ) -> Result<Self, PlacementError> {
        let instances = strategy.place(terrain, model.up)?;
        Ok(Self {
            model,
            instances,
            tint: pack_color(tint),
            texture: None,
        })
    }

    pub fn with_texture(mut self, texture: Option<PathBuf>) -> Self {
        self.texture = texture;
        self
    }

    pub fn ground_cover(terrain: &Terrain, config: &GroundCoverConfig) -> Result<Self, PlacementError> {
        let model = VegetationModel::load_or_fallback(config.model.as_deref(), FallbackShape::GrassBlade);
        Ok(Self::place(terrain, &config.placement, model, config.tint)?
            .with_texture(config.texture.clone()))
    }

    pub fn scatter(terrain: &Terrain, config: &ScatterConfig) -> Result<Self, PlacementError> {
        let model = VegetationModel::load_or_fallback(config.model.as_deref(), config.fallback);
        Ok(Self::place(terrain, &config.placement, model, config.tint)?
            .with_texture(config.texture.clone()))
    }

    pub fn name(&self) -> &str {
        self.instances.name()
    }

    pub fn gpu_instances(&self) -> Vec<VegetationInstance> {
        self.instances.gpu_instances(self.tint)
    }
}
