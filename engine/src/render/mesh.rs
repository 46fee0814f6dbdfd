//! Mesh Vertex Format and GPU Mesh Buffers
//!
//! Every static mesh in the scene (terrain, vegetation models, sun sphere,
//! water quad) shares one vertex layout so the pipelines can share it too.

use wgpu::util::DeviceExt;

/// Vertex for mesh rendering (position, normal, uv, color)
///
/// Layout (48 bytes):
///   offset  0: position [f32; 3]
///   offset 12: normal   [f32; 3]
///   offset 24: uv       [f32; 2]
///   offset 32: color    [f32; 4]
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 48]);

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Vertex buffer layout at shader locations 0..=3.
    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
            3 => Float32x4,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// CPU-side indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// First index that points past the vertex array, if any.
    pub fn find_out_of_range_index(&self) -> Option<u32> {
        let count = self.vertices.len() as u32;
        self.indices.iter().copied().find(|&i| i >= count)
    }
}

/// A mesh uploaded to the GPU
pub struct MeshBuffer {
    pub label: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn upload(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            label: label.to_string(),
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }

    /// Bind vertex slot 0 and the index buffer, then draw `instances`.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, instances: std::ops::Range<u32>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        // 3 + 3 + 2 + 4 floats
        assert_eq!(std::mem::size_of::<MeshVertex>(), 48);
    }

    #[test]
    fn test_layout_matches_struct() {
        let layout = MeshVertex::buffer_layout();
        assert_eq!(layout.array_stride, 48);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
        assert_eq!(layout.attributes[3].offset, 32);
    }

    #[test]
    fn test_out_of_range_index() {
        let v = MeshVertex::new([0.0; 3], [0.0, 1.0, 0.0], [0.0; 2]);
        let mesh = MeshData::new(vec![v; 3], vec![0, 1, 2, 2, 1, 3]);
        assert_eq!(mesh.find_out_of_range_index(), Some(3));
        assert_eq!(mesh.triangle_count(), 2);
    }
}
