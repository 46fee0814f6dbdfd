//! Procedural Primitive Meshes
//!
//! Small built-in shapes: the sun sphere and the fallback vegetation models
//! used when an asset file cannot be loaded. All are authored with +Y up.

use std::f32::consts::{PI, TAU};

use super::mesh::{MeshData, MeshVertex};

/// Two crossed grass blades, 0.5 units tall, base at the origin.
pub fn grass_blade(color: [f32; 4]) -> MeshData {
    let tip_color = [
        (color[0] * 1.3).min(1.0),
        (color[1] * 1.3).min(1.0),
        (color[2] * 1.3).min(1.0),
        color[3],
    ];
    let mut vertices = Vec::with_capacity(6);
    let mut indices = Vec::with_capacity(6);

    // One blade in the XY plane, one in the ZY plane.
    for (side, normal) in [([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]), ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0])] {
        let base = vertices.len() as u32;
        let [sx, _, sz]: [f32; 3] = side;
        vertices.push(MeshVertex::new([-0.1 * sx, 0.0, -0.1 * sz], normal, [0.0, 0.0]).with_color(color));
        vertices.push(MeshVertex::new([0.1 * sx, 0.0, 0.1 * sz], normal, [1.0, 0.0]).with_color(color));
        vertices.push(MeshVertex::new([0.0, 0.5, 0.0], normal, [0.5, 1.0]).with_color(tip_color));
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    MeshData::new(vertices, indices)
}

/// Closed cone with its base disc centered on the origin.
pub fn cone(radius: f32, height: f32, segments: u32, color: [f32; 4]) -> MeshData {
    let segments = segments.max(3);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let slope = radius / height;

    // Side: one apex per segment so each face keeps its own normal.
    for i in 0..segments {
        let a0 = i as f32 / segments as f32 * TAU;
        let a1 = (i + 1) as f32 / segments as f32 * TAU;
        let mid = (a0 + a1) * 0.5;
        let normal = glam::Vec3::new(mid.cos(), slope, mid.sin()).normalize().to_array();

        let base = vertices.len() as u32;
        vertices.push(MeshVertex::new([a0.cos() * radius, 0.0, a0.sin() * radius], normal, [0.0, 0.0]).with_color(color));
        vertices.push(MeshVertex::new([0.0, height, 0.0], normal, [0.5, 1.0]).with_color(color));
        vertices.push(MeshVertex::new([a1.cos() * radius, 0.0, a1.sin() * radius], normal, [1.0, 0.0]).with_color(color));
        indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    // Base cap
    let center = vertices.len() as u32;
    let down = [0.0, -1.0, 0.0];
    vertices.push(MeshVertex::new([0.0, 0.0, 0.0], down, [0.5, 0.5]).with_color(color));
    for i in 0..segments {
        let a = i as f32 / segments as f32 * TAU;
        vertices.push(MeshVertex::new([a.cos() * radius, 0.0, a.sin() * radius], down, [0.5, 0.5]).with_color(color));
    }
    for i in 0..segments {
        let next = (i + 1) % segments;
        indices.extend_from_slice(&[center, center + 1 + i, center + 1 + next]);
    }

    MeshData::new(vertices, indices)
}

/// Unit-radius UV sphere with `stacks` latitude and `slices` longitude bands.
pub fn uv_sphere(stacks: u32, slices: u32) -> MeshData {
    let stacks = stacks.max(2);
    let slices = slices.max(3);
    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * PI;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = u * TAU;
            let p = [theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin()];
            vertices.push(MeshVertex::new(p, p, [u, v]));
        }
    }

    let row = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * row + slice;
            let b = a + row;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    MeshData::new(vertices, indices)
}
