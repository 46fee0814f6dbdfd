//! Scene Pipelines
//!
//! Bind group layouts and render pipelines for the four scene shaders.
//!
//! | Pipeline   | Group 0        | Group 1                                         |
//! |------------|----------------|-------------------------------------------------|
//! | terrain    | SceneUniforms  | albedo texture + sampler                        |
//! | vegetation | SceneUniforms  | diffuse texture + sampler                       |
//! | sun        | SceneUniforms  | SunUniforms                                     |
//! | water      | SceneUniforms  | WaterUniforms, reflection, refraction, depth, sampler |
//!
//! All color targets share one format so the same pipelines draw into the
//! offscreen water targets and the swapchain.

use std::path::Path;

use crate::render::gpu_context::DEPTH_FORMAT;
use crate::render::instancing::instance_buffer_layout;
use crate::render::mesh::MeshVertex;
use crate::render::shader_loader::{ShaderSource, create_shader_module, embedded, paths};

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32, sample_type: wgpu::TextureSampleType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type,
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

pub struct SceneLayouts {
    pub scene: wgpu::BindGroupLayout,
    pub terrain: wgpu::BindGroupLayout,
    pub vegetation: wgpu::BindGroupLayout,
    pub sun: wgpu::BindGroupLayout,
    pub water: wgpu::BindGroupLayout,
}

impl SceneLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let float = wgpu::TextureSampleType::Float { filterable: true };
        let both = wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT;

        let scene = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Uniforms Layout"),
            entries: &[uniform_entry(0, both)],
        });
        let terrain = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Terrain Texture Layout"),
            entries: &[texture_entry(0, float), sampler_entry(1)],
        });
        let vegetation = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Vegetation Texture Layout"),
            entries: &[texture_entry(0, float), sampler_entry(1)],
        });
        let sun = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sun Uniforms Layout"),
            entries: &[uniform_entry(0, both)],
        });
        let water = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Water Composite Layout"),
            entries: &[
                uniform_entry(0, both),
                texture_entry(1, float),
                texture_entry(2, float),
                texture_entry(3, wgpu::TextureSampleType::Depth),
                sampler_entry(4),
            ],
        });

        Self {
            scene,
            terrain,
            vegetation,
            sun,
            water,
        }
    }
}

pub struct ScenePipelines {
    pub terrain: wgpu::RenderPipeline,
    pub vegetation: wgpu::RenderPipeline,
    pub sun: wgpu::RenderPipeline,
    pub water: wgpu::RenderPipeline,
}

/// How a pipeline writes color and depth.
#[derive(Clone, Copy)]
enum Blending {
    /// Opaque, writes depth
    Opaque,
    /// Alpha blended over what is already there, depth tested but not written
    Overlay,
}

struct PipelineSpec<'a> {
    label: &'a str,
    module: &'a wgpu::ShaderModule,
    layouts: &'a [&'a wgpu::BindGroupLayout],
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    blending: Blending,
}

fn build_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    spec: PipelineSpec<'_>,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", spec.label)),
        bind_group_layouts: spec.layouts,
        push_constant_ranges: &[],
    });

    let (blend, depth_write_enabled) = match spec.blending {
        Blending::Opaque => (wgpu::BlendState::REPLACE, true),
        Blending::Overlay => (wgpu::BlendState::ALPHA_BLENDING, false),
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", spec.label)),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: spec.module,
            entry_point: Some("vs_main"),
            buffers: spec.buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: spec.module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Crossed grass blades are two-sided
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

impl ScenePipelines {
    /// Compile every scene shader. `shader_dir` overrides the embedded
    /// sources file by file.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layouts: &SceneLayouts,
        shader_dir: Option<&Path>,
    ) -> Self {
        let module = |label: &str, file: &str, source: &'static str| {
            create_shader_module(device, label, &ShaderSource::resolve(shader_dir, file, source))
        };
        let terrain_shader = module("Terrain Shader", paths::TERRAIN, embedded::TERRAIN);
        let vegetation_shader = module("Vegetation Shader", paths::VEGETATION, embedded::VEGETATION);
        let sun_shader = module("Sun Shader", paths::SUN, embedded::SUN);
        let water_shader = module("Water Shader", paths::WATER, embedded::WATER);

        let terrain = build_pipeline(
            device,
            format,
            PipelineSpec {
                label: "Terrain",
                module: &terrain_shader,
                layouts: &[&layouts.scene, &layouts.terrain],
                buffers: &[MeshVertex::buffer_layout()],
                blending: Blending::Opaque,
            },
        );
        let vegetation = build_pipeline(
            device,
            format,
            PipelineSpec {
                label: "Vegetation",
                module: &vegetation_shader,
                layouts: &[&layouts.scene, &layouts.vegetation],
                buffers: &[MeshVertex::buffer_layout(), instance_buffer_layout()],
                blending: Blending::Opaque,
            },
        );
        let sun = build_pipeline(
            device,
            format,
            PipelineSpec {
                label: "Sun",
                module: &sun_shader,
                layouts: &[&layouts.scene, &layouts.sun],
                buffers: &[MeshVertex::buffer_layout()],
                blending: Blending::Opaque,
            },
        );
        let water = build_pipeline(
            device,
            format,
            PipelineSpec {
                label: "Water",
                module: &water_shader,
                layouts: &[&layouts.scene, &layouts.water],
                buffers: &[MeshVertex::buffer_layout()],
                blending: Blending::Overlay,
            },
        );

        Self {
            terrain,
            vegetation,
            sun,
            water,
        }
    }
}
