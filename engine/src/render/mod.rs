//! Render Module
//!
//! wgpu building blocks shared by the landscape scene: device setup, render
//! targets, GPU mesh and instance buffers, uniform layouts, shaders and
//! textures.

pub mod gpu_context;
pub mod instancing;
pub mod mesh;
pub mod primitives;
pub mod render_target;
pub mod shader_loader;
pub mod texture;
pub mod uniforms;

pub use gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig, GpuContextError};
pub use instancing::{
    INSTANCE_BUFFER_SIZE, MAX_VEGETATION_INSTANCES, VegetationInstance,
    create_instance_buffer_init, instance_buffer_layout, pack_color, pack_rgba, unpack_rgba,
};
pub use mesh::{MeshBuffer, MeshData, MeshVertex};
pub use render_target::{RenderTarget, RenderTargetError, check_target_size};
pub use shader_loader::{ShaderSource, create_shader_module, load_shader_file};
pub use texture::{Texture, TextureError};
pub use uniforms::{SceneUniforms, SunUniforms, WaterUniforms};
