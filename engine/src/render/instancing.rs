//! GPU Instance Buffers for Vegetation
//!
//! Each placed plant becomes one 48-byte instance record. The vegetation
//! pipeline reads these at vertex slot 1 with per-instance step mode and
//! rebuilds the T*R*S transform in the shader.

use wgpu::util::DeviceExt;

/// Maximum number of vegetation instances in one buffer (100k * 48 B = 4.8 MB)
pub const MAX_VEGETATION_INSTANCES: usize = 100_000;

/// Size in bytes of a full instance buffer
pub const INSTANCE_BUFFER_SIZE: usize =
    MAX_VEGETATION_INSTANCES * std::mem::size_of::<VegetationInstance>();

/// GPU instance data for one vegetation instance.
///
/// Layout (48 bytes total):
/// - position: vec3<f32> (12 bytes) - World position on the terrain surface
/// - scale:    f32       (4 bytes)  - Uniform scale factor
/// - rotation: vec4<f32> (16 bytes) - Quaternion (x, y, z, w), surface alignment and yaw
/// - tint:     u32       (4 bytes)  - Packed RGBA multiplier (0xRRGGBBAA)
/// - _pad:     [u32; 3]  (12 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct VegetationInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub rotation: [f32; 4],
    pub tint: u32,
    pub _pad: [u32; 3],
}

const _: () = {
    assert!(
        std::mem::size_of::<VegetationInstance>() == 48,
        "VegetationInstance must be exactly 48 bytes for GPU instancing"
    );
};

impl Default for VegetationInstance {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            scale: 1.0,
            rotation: [0.0, 0.0, 0.0, 1.0], // Identity quaternion
            tint: 0xFFFFFFFF,
            _pad: [0; 3],
        }
    }
}

impl VegetationInstance {
    pub fn new(position: [f32; 3], rotation: [f32; 4], scale: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
            ..Default::default()
        }
    }

    pub fn with_tint(mut self, tint: u32) -> Self {
        self.tint = tint;
        self
    }
}

/// Pack RGBA color components into a single u32 value.
/// Format: 0xRRGGBBAA
#[inline]
pub fn pack_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32)
}

/// Unpack a u32 color value into RGBA components.
#[inline]
pub fn unpack_rgba(packed: u32) -> (u8, u8, u8, u8) {
    let r = ((packed >> 24) & 0xFF) as u8;
    let g = ((packed >> 16) & 0xFF) as u8;
    let b = ((packed >> 8) & 0xFF) as u8;
    let a = (packed & 0xFF) as u8;
    (r, g, b, a)
}

/// Pack a float color in [0, 1] per channel.
pub fn pack_color(rgba: [f32; 4]) -> u32 {
    let c = rgba.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
    pack_rgba(c[0], c[1], c[2], c[3])
}

/// Create an instance buffer holding `instances`.
///
/// # Panics
/// Panics if `instances.len() > MAX_VEGETATION_INSTANCES`. Placement
/// rejects larger requests before they get here.
pub fn create_instance_buffer_init(
    device: &wgpu::Device,
    instances: &[VegetationInstance],
    label: Option<&str>,
) -> wgpu::Buffer {
    assert!(
        instances.len() <= MAX_VEGETATION_INSTANCES,
        "Cannot create instance buffer with {} instances, max is {}",
        instances.len(),
        MAX_VEGETATION_INSTANCES
    );

    // Never create a zero-sized buffer; the draw call uses the real count.
    let fallback = [VegetationInstance::default()];
    let contents: &[VegetationInstance] = if instances.is_empty() {
        &fallback
    } else {
        instances
    };

    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label,
        contents: bytemuck::cast_slice(contents),
        usage: wgpu::BufferUsages::VERTEX,
    })
}

/// Vertex buffer layout for [`VegetationInstance`] at shader locations 4..=7.
pub fn instance_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<VegetationInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[
            // position: vec3<f32> at offset 0
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 4,
            },
            // scale: f32 at offset 12
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: 12,
                shader_location: 5,
            },
            // rotation: vec4<f32> at offset 16
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: 16,
                shader_location: 6,
            },
            // tint: u32 at offset 32
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Uint32,
                offset: 32,
                shader_location: 7,
            },
        ],
    }
}
