//! Terrain Mesh Builder
//!
//! One vertex per grid cell, two triangles per quad. Vertices are emitted in
//! world space (terrain centered on the origin) with the band color baked in.

use crate::render::mesh::{MeshData, MeshVertex};

use super::classify::TerrainBands;
use super::heightfield::Terrain;

/// Build the renderable surface for a terrain.
///
/// Quads are wound (top-left, bottom-left, top-right) then
/// (top-right, bottom-left, bottom-right) across the whole grid.
pub fn build_terrain_mesh(terrain: &Terrain, bands: &TerrainBands) -> MeshData {
    let width = terrain.width();
    let depth = terrain.depth();

    let mut vertices = Vec::with_capacity((width * depth) as usize);
    for z in 0..depth {
        for x in 0..width {
            let (xi, zi) = (x as i32, z as i32);
            let height = terrain.get_height(xi, zi);
            let position = terrain.grid_to_world(x as f32, z as f32, height);
            let normal = terrain.get_normal(xi, zi);
            let uv = [x as f32 / width as f32, z as f32 / depth as f32];
            let [r, g, b] = bands.classify(height).color();

            vertices.push(
                MeshVertex::new(position.to_array(), normal.to_array(), uv)
                    .with_color([r, g, b, 1.0]),
            );
        }
    }

    let quads = (width.saturating_sub(1) * depth.saturating_sub(1)) as usize;
    let mut indices = Vec::with_capacity(quads * 6);
    for z in 0..depth.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let top_left = z * width + x;
            let top_right = top_left + 1;
            let bottom_left = top_left + width;
            let bottom_right = bottom_left + 1;

            indices.extend_from_slice(&[top_left, bottom_left, top_right]);
            indices.extend_from_slice(&[top_right, bottom_left, bottom_right]);
        }
    }

    MeshData::new(vertices, indices)
}

/// Flat quad covering the terrain extent at `height`, wound to face +Y.
pub fn build_water_quad(terrain: &Terrain, height: f32) -> MeshData {
    let size = terrain.world_size();
    let (hw, hd) = (size.x * 0.5, size.y * 0.5);
    let up = [0.0, 1.0, 0.0];

    let vertices = vec![
        MeshVertex::new([-hw, height, -hd], up, [0.0, 0.0]),
        MeshVertex::new([-hw, height, hd], up, [0.0, 1.0]),
        MeshVertex::new([hw, height, -hd], up, [1.0, 0.0]),
        MeshVertex::new([hw, height, hd], up, [1.0, 1.0]),
    ];
    MeshData::new(vertices, vec![0, 1, 2, 2, 1, 3])
}
