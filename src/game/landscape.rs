//! Landscape Assembly
//!
//! Turns a [`SceneConfig`] into CPU-side scene data: the heightfield, its
//! mesh, the water quad and every placed vegetation layer. No GPU access, so
//! the whole scene can be built and inspected in tests.

use thiserror::Error;

use crate::game::config::{ConfigError, SceneConfig};
use crate::game::terrain::{Terrain, TerrainError, build_terrain_mesh, build_water_quad};
use crate::game::vegetation::{PlacementError, VegetationLayer};
use crate::render::mesh::MeshData;

#[derive(Debug, Error)]
pub enum LandscapeError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error("vegetation layer '{name}': {source}")]
    Vegetation {
        name: String,
        #[source]
        source: PlacementError,
    },
}

pub struct Landscape {
    pub terrain: Terrain,
    pub terrain_mesh: MeshData,
    pub water_mesh: MeshData,
    /// Ground cover first, then scatter layers in config order
    pub layers: Vec<VegetationLayer>,
}

impl Landscape {
    pub fn build(config: &SceneConfig) -> Result<Self, LandscapeError> {
        config.validate()?;

        let t = &config.terrain;
        let terrain = Terrain::generate(t.width, t.depth, &t.noise)?;
        let terrain_mesh = build_terrain_mesh(&terrain, &t.bands);
        let water_mesh = build_water_quad(&terrain, config.water.height);

        let mut layers = Vec::with_capacity(1 + config.scatter.len());
        let cover = VegetationLayer::ground_cover(&terrain, &config.ground_cover).map_err(|source| {
            LandscapeError::Vegetation {
                name: config.ground_cover.placement.name.clone(),
                source,
            }
        })?;
        layers.push(cover);
        for scatter in &config.scatter {
            let layer = VegetationLayer::scatter(&terrain, scatter).map_err(|source| {
                LandscapeError::Vegetation {
                    name: scatter.placement.name.clone(),
                    source,
                }
            })?;
            layers.push(layer);
        }

        for layer in &layers {
            let report = layer.instances.report();
            log::info!(
                "Vegetation '{}': {} placed from {} candidates ({:?})",
                layer.name(),
                report.placed,
                report.candidates,
                layer.model.source
            );
        }

        Ok(Self {
            terrain,
            terrain_mesh,
            water_mesh,
            layers,
        })
    }

    pub fn instance_count(&self) -> usize {
        self.layers.iter().map(|l| l.instances.len()).sum()
    }
}
