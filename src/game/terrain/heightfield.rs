//! Heightfield Terrain
//!
//! A `width x depth` grid of heights sampled from a [`NoiseField`], plus the
//! per-cell normal field derived from central differences. Both are computed
//! once in [`Terrain::generate`] and never change afterwards.
//!
//! Grid cell (x, z) sits at world position `(x - width/2, h, z - depth/2)`,
//! which centers the terrain on the origin.

use glam::{Vec2, Vec3};
use thiserror::Error;

use super::classify::{TerrainBands, TerrainType};
use super::noise::{NoiseConfig, NoiseConfigError, NoiseField};

/// Distance between neighboring grid samples in world units.
pub const GRID_STEP: f32 = 1.0;

/// Largest grid whose vertex indices still fit in a u32 index buffer.
const MAX_GRID_CELLS: u64 = u32::MAX as u64;

/// Cells are addressed with i32 coordinates.
const MAX_GRID_SIDE: u32 = i32::MAX as u32;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("terrain grid must be at least 1x1, got {width}x{depth}")]
    EmptyGrid { width: u32, depth: u32 },
    #[error("terrain grid {width}x{depth} exceeds the 32-bit index range")]
    TooLarge { width: u32, depth: u32 },
    #[error("invalid noise configuration: {0}")]
    Noise(#[from] NoiseConfigError),
}

/// Immutable heightfield with its normal field.
#[derive(Debug, Clone)]
pub struct Terrain {
    width: u32,
    depth: u32,
    heights: Vec<f32>,
    normals: Vec<Vec3>,
    min_height: f32,
    max_height: f32,
    noise: NoiseConfig,
}

impl Terrain {
    /// Sample the noise field over the grid and derive normals.
    pub fn generate(width: u32, depth: u32, noise: &NoiseConfig) -> Result<Self, TerrainError> {
        if width == 0 || depth == 0 {
            return Err(TerrainError::EmptyGrid { width, depth });
        }
        if width > MAX_GRID_SIDE
            || depth > MAX_GRID_SIDE
            || width as u64 * depth as u64 > MAX_GRID_CELLS
        {
            return Err(TerrainError::TooLarge { width, depth });
        }
        let field = NoiseField::new(*noise)?;

        let mut heights = Vec::with_capacity((width * depth) as usize);
        for z in 0..depth {
            for x in 0..width {
                heights.push(field.height(x as f32, z as f32));
            }
        }

        let (min_height, max_height) = heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            });

        let mut terrain = Self {
            width,
            depth,
            heights,
            normals: Vec::new(),
            min_height,
            max_height,
            noise: *noise,
        };
        terrain.normals = terrain.compute_normals();

        log::info!(
            "Generated {}x{} terrain (heights {:.1}..{:.1}, bound {:.1})",
            width,
            depth,
            min_height,
            max_height,
            noise.amplitude_bound()
        );

        Ok(terrain)
    }

    fn compute_normals(&self) -> Vec<Vec3> {
        let mut normals = Vec::with_capacity(self.heights.len());
        for z in 0..self.depth as i32 {
            for x in 0..self.width as i32 {
                let left = self.get_height(x - 1, z);
                let right = self.get_height(x + 1, z);
                let down = self.get_height(x, z - 1);
                let up = self.get_height(x, z + 1);
                let normal = Vec3::new(left - right, 2.0 * GRID_STEP, down - up).normalize();
                normals.push(normal);
            }
        }
        normals
    }

    #[inline]
    fn index(&self, x: i32, z: i32) -> usize {
        let cx = x.clamp(0, self.width as i32 - 1) as usize;
        let cz = z.clamp(0, self.depth as i32 - 1) as usize;
        cz * self.width as usize + cx
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn noise_config(&self) -> &NoiseConfig {
        &self.noise
    }

    /// Row-major heights, `z * width + x`.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Height at a grid cell. Out-of-range coordinates clamp to the edge.
    #[inline]
    pub fn get_height(&self, x: i32, z: i32) -> f32 {
        self.heights[self.index(x, z)]
    }

    /// Unit normal at a grid cell. Out-of-range coordinates clamp to the edge.
    #[inline]
    pub fn get_normal(&self, x: i32, z: i32) -> Vec3 {
        self.normals[self.index(x, z)]
    }

    /// Lowest and highest height in the field.
    pub fn height_range(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }

    /// Height remapped to [0, 1] over the field's range. A flat field maps to 0.5.
    pub fn normalized_height(&self, x: i32, z: i32) -> f32 {
        let span = self.max_height - self.min_height;
        if span <= f32::EPSILON {
            return 0.5;
        }
        ((self.get_height(x, z) - self.min_height) / span).clamp(0.0, 1.0)
    }

    pub fn classify(&self, bands: &TerrainBands, x: i32, z: i32) -> TerrainType {
        bands.classify(self.get_height(x, z))
    }

    /// World-space XZ extent, centered on the origin.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.depth as f32) * GRID_STEP
    }

    /// World position of a (possibly fractional) grid coordinate, at height `y`.
    pub fn grid_to_world(&self, x: f32, z: f32, y: f32) -> Vec3 {
        let half = self.world_size() * 0.5;
        Vec3::new(x * GRID_STEP - half.x, y, z * GRID_STEP - half.y)
    }

    /// Fractional grid coordinate of a world XZ position.
    pub fn world_to_grid(&self, world_x: f32, world_z: f32) -> Vec2 {
        let half = self.world_size() * 0.5;
        Vec2::new((world_x + half.x) / GRID_STEP, (world_z + half.y) / GRID_STEP)
    }

    /// Bilinearly interpolated height at a world XZ position.
    pub fn height_at_world(&self, world_x: f32, world_z: f32) -> f32 {
        let g = self.world_to_grid(world_x, world_z);
        let x0 = g.x.floor();
        let z0 = g.y.floor();
        let fx = (g.x - x0).clamp(0.0, 1.0);
        let fz = (g.y - z0).clamp(0.0, 1.0);
        let (x0, z0) = (x0 as i32, z0 as i32);

        let h00 = self.get_height(x0, z0);
        let h10 = self.get_height(x0 + 1, z0);
        let h01 = self.get_height(x0, z0 + 1);
        let h11 = self.get_height(x0 + 1, z0 + 1);

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        top + (bottom - top) * fz
    }

    /// Normal of the nearest grid cell to a world XZ position.
    pub fn normal_at_world(&self, world_x: f32, world_z: f32) -> Vec3 {
        let g = self.world_to_grid(world_x, world_z);
        self.get_normal(g.x.round() as i32, g.y.round() as i32)
    }
}
