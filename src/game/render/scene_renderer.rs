//! Scene Renderer
//!
//! GPU side of the landscape. Owns every buffer, bind group and pipeline and
//! drives [`WaterPipeline`] once per frame. Each pass records into its own
//! encoder inside a wgpu error scope, so a failing pass is reported and the
//! rest of the frame still renders.

use std::path::Path;

use glam::Vec3;
use thiserror::Error;
use wgpu::util::DeviceExt;

use crate::camera::FlyCamera;
use crate::game::config::SceneConfig;
use crate::game::landscape::Landscape;
use crate::game::lighting::{SunModel, SunState};
use crate::game::water::{
    ClipPlane, DrawError, FrameReport, SceneDraw, ScenePass, WaterComposite, WaterConfig,
    WaterPipeline,
};
use crate::render::gpu_context::GpuContext;
use crate::render::instancing::create_instance_buffer_init;
use crate::render::mesh::MeshBuffer;
use crate::render::primitives::uv_sphere;
use crate::render::render_target::{RenderTarget, RenderTargetError};
use crate::render::texture::Texture;
use crate::render::uniforms::{SceneUniforms, SunUniforms, WaterUniforms};

use super::pipelines::{SceneLayouts, ScenePipelines};

/// Light that reaches surfaces facing away from the sun
const AMBIENT_LIGHT: f32 = 0.2;
const SUN_SPHERE_DETAIL: u32 = 64;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Target(#[from] RenderTargetError),
    #[error("failed to create scene pipelines: {0}")]
    Pipeline(String),
}

struct VegetationBuffers {
    mesh: MeshBuffer,
    instances: wgpu::Buffer,
    count: u32,
    texture_bind_group: wgpu::BindGroup,
}

/// Everything a pass reads. Kept apart from the water targets so a frame can
/// borrow both at once.
struct SceneResources {
    pipelines: ScenePipelines,
    water_layout: wgpu::BindGroupLayout,
    target_sampler: wgpu::Sampler,

    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,

    terrain_mesh: MeshBuffer,
    terrain_bind_group: wgpu::BindGroup,

    sun_mesh: MeshBuffer,
    sun_buffer: wgpu::Buffer,
    sun_bind_group: wgpu::BindGroup,

    water_mesh: MeshBuffer,
    water_buffer: wgpu::Buffer,

    vegetation: Vec<VegetationBuffers>,
}

pub struct SceneRenderer {
    resources: SceneResources,
    water: WaterPipeline<RenderTarget>,
    lighting: SceneUniforms,
    water_params: WaterUniforms,
    sun_model: SunModel,
    sun_visible: bool,
}

fn draw_error(error: wgpu::Error) -> DrawError {
    match &error {
        wgpu::Error::OutOfMemory { .. } => DrawError::OutOfMemory(error.to_string()),
        wgpu::Error::Validation { .. } => DrawError::Validation(error.to_string()),
        _ => DrawError::Other(error.to_string()),
    }
}

fn push_error_scopes(device: &wgpu::Device) {
    device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    device.push_error_scope(wgpu::ErrorFilter::Validation);
}

fn pop_error_scopes(device: &wgpu::Device) -> Result<(), DrawError> {
    let validation = pollster::block_on(device.pop_error_scope());
    let out_of_memory = pollster::block_on(device.pop_error_scope());
    match validation.or(out_of_memory) {
        Some(error) => Err(draw_error(error)),
        None => Ok(()),
    }
}

fn water_params(config: &WaterConfig) -> WaterUniforms {
    WaterUniforms {
        tint: config.tint,
        wave_strength: config.wave_strength,
        tiling: config.tiling,
        water_height: config.height,
        murk_depth: config.murk_depth.max(f32::EPSILON),
        ..Default::default()
    }
}

impl SceneRenderer {
    pub fn new(
        gpu: &GpuContext,
        landscape: &Landscape,
        config: &SceneConfig,
        shader_dir: Option<&Path>,
    ) -> Result<Self, SceneError> {
        let device = &gpu.device;
        let format = gpu.format();

        let [rw, rh] = config.water.reflection_size;
        let [fw, fh] = config.water.refraction_size;
        let reflection = RenderTarget::offscreen(device, "Reflection", rw, rh, format)?;
        let refraction = RenderTarget::offscreen(device, "Refraction", fw, fh, format)?;

        push_error_scopes(device);
        let layouts = SceneLayouts::new(device);
        let pipelines = ScenePipelines::new(device, format, &layouts, shader_dir);
        pop_error_scopes(device).map_err(|e| SceneError::Pipeline(e.to_string()))?;

        let mut lighting = SceneUniforms {
            fog_density: config.lighting.fog_density,
            ambient: AMBIENT_LIGHT,
            ..Default::default()
        };

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&lighting),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &layouts.scene,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let albedo = Texture::load_or_white(
            device,
            &gpu.queue,
            "Terrain Albedo",
            config.terrain.texture.as_deref(),
        );
        lighting.texture_blend = if albedo.is_loaded { 1.0 } else { 0.0 };
        let terrain_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Terrain Bind Group"),
            layout: &layouts.terrain,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&albedo.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&albedo.sampler),
                },
            ],
        });
        let terrain_mesh = MeshBuffer::upload(device, "Terrain", &landscape.terrain_mesh);

        let sun_model = config.lighting.sun;
        let sun_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sun Uniform Buffer"),
            contents: bytemuck::bytes_of(&SunUniforms::new(Vec3::ZERO, sun_model.disc_scale, Vec3::ONE)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let sun_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sun Bind Group"),
            layout: &layouts.sun,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: sun_buffer.as_entire_binding(),
            }],
        });
        let sun_mesh = MeshBuffer::upload(
            device,
            "Sun",
            &uv_sphere(SUN_SPHERE_DETAIL, SUN_SPHERE_DETAIL),
        );

        let water_params = water_params(&config.water);
        let water_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Uniform Buffer"),
            contents: bytemuck::bytes_of(&water_params),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let water_mesh = MeshBuffer::upload(device, "Water", &landscape.water_mesh);
        let target_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Water Target Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let vegetation = landscape
            .layers
            .iter()
            .map(|layer| {
                let instances = layer.gpu_instances();
                let diffuse = Texture::load_or_white(
                    device,
                    &gpu.queue,
                    &format!("{} Texture", layer.name()),
                    layer.texture.as_deref(),
                );
                VegetationBuffers {
                    mesh: MeshBuffer::upload(device, layer.name(), &layer.model.mesh),
                    instances: create_instance_buffer_init(
                        device,
                        &instances,
                        Some(&format!("{} Instances", layer.name())),
                    ),
                    count: instances.len() as u32,
                    texture_bind_group: device.create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some(&format!("{} Texture Bind Group", layer.name())),
                        layout: &layouts.vegetation,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: wgpu::BindingResource::TextureView(&diffuse.view),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: wgpu::BindingResource::Sampler(&diffuse.sampler),
                            },
                        ],
                    }),
                }
            })
            .collect();

        log::info!(
            "Scene uploaded: {} terrain triangles, {} vegetation instances in {} layers",
            landscape.terrain_mesh.triangle_count(),
            landscape.instance_count(),
            landscape.layers.len()
        );

        Ok(Self {
            resources: SceneResources {
                pipelines,
                water_layout: layouts.water,
                target_sampler,
                scene_buffer,
                scene_bind_group,
                terrain_mesh,
                terrain_bind_group,
                sun_mesh,
                sun_buffer,
                sun_bind_group,
                water_mesh,
                water_buffer,
                vegetation,
            },
            water: WaterPipeline::new(reflection, refraction, &config.water),
            lighting,
            water_params,
            sun_model,
            sun_visible: true,
        })
    }

    pub fn water(&self) -> &WaterPipeline<RenderTarget> {
        &self.water
    }

    /// Apply the sun for this frame. `time` is seconds since startup.
    pub fn set_sun(&mut self, queue: &wgpu::Queue, sun: &SunState, time: f32) {
        self.lighting
            .set_lighting(sun.light_direction(), sun.light_color(), sun.sky_color());
        self.lighting.time = time;
        self.sun_visible = sun.is_day();

        let disc = SunUniforms::new(
            sun.position(),
            self.sun_model.disc_scale,
            self.sun_model.disc_color(sun),
        );
        queue.write_buffer(&self.resources.sun_buffer, 0, bytemuck::bytes_of(&disc));
    }

    /// Render and present one frame.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        camera: &mut FlyCamera,
        dt: f32,
    ) -> Result<FrameReport, wgpu::SurfaceError> {
        let frame = gpu.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let screen = RenderTarget::for_surface(view, &gpu.depth_texture, gpu.format());

        let projection = camera.projection_matrix(gpu.aspect_ratio());
        let mut water_params = self.water_params;
        water_params.near = camera.near;
        water_params.far = camera.far;

        let mut scene = FrameScene {
            device: &gpu.device,
            queue: &gpu.queue,
            resources: &self.resources,
            lighting: self.lighting,
            water_params,
            sun_visible: self.sun_visible,
        };
        let report = self
            .water
            .render_frame(&mut scene, camera, projection, &screen, dt);

        drop(screen);
        frame.present();
        Ok(report)
    }
}

/// One frame's view of the scene, handed to [`WaterPipeline::render_frame`].
struct FrameScene<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    resources: &'a SceneResources,
    lighting: SceneUniforms,
    water_params: WaterUniforms,
    sun_visible: bool,
}

impl FrameScene<'_> {
    fn clear_color(&self) -> wgpu::Color {
        let [r, g, b] = self.lighting.sky_color;
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: 1.0,
        }
    }

    fn encode_scene(&self, pass: &ScenePass<'_, RenderTarget>) {
        let res = self.resources;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(&format!("{:?} Encoder", pass.kind)),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(&format!("{:?} Pass", pass.kind)),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: pass.target.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: pass.target.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &res.scene_bind_group, &[]);

            if self.sun_visible {
                rpass.set_pipeline(&res.pipelines.sun);
                rpass.set_bind_group(1, &res.sun_bind_group, &[]);
                res.sun_mesh.draw(&mut rpass, 0..1);
            }

            rpass.set_pipeline(&res.pipelines.terrain);
            rpass.set_bind_group(1, &res.terrain_bind_group, &[]);
            res.terrain_mesh.draw(&mut rpass, 0..1);

            rpass.set_pipeline(&res.pipelines.vegetation);
            for layer in res.vegetation.iter().filter(|l| l.count > 0) {
                rpass.set_bind_group(1, &layer.texture_bind_group, &[]);
                rpass.set_vertex_buffer(1, layer.instances.slice(..));
                layer.mesh.draw(&mut rpass, 0..layer.count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
    }

    fn encode_water(&self, composite: &WaterComposite<'_, RenderTarget>) {
        let res = self.resources;
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Water Bind Group"),
            layout: &res.water_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: res.water_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(composite.reflection.color_view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(composite.refraction.color_view()),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(composite.refraction.depth_view()),
                },
                wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&res.target_sampler),
                },
            ],
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Water Encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Water Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: composite.target.color_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: composite.target.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&res.pipelines.water);
            rpass.set_bind_group(0, &res.scene_bind_group, &[]);
            rpass.set_bind_group(1, &bind_group, &[]);
            res.water_mesh.draw(&mut rpass, 0..1);
        }
        self.queue.submit(Some(encoder.finish()));
    }
}

impl SceneDraw for FrameScene<'_> {
    type Target = RenderTarget;

    fn render_scene(&mut self, pass: &ScenePass<'_, RenderTarget>) -> Result<(), DrawError> {
        let mut uniforms = self.lighting;
        uniforms.set_camera(pass.camera.view_projection(), pass.camera.position);
        uniforms.clip_plane = pass.clip_plane.to_array();
        self.queue
            .write_buffer(&self.resources.scene_buffer, 0, bytemuck::bytes_of(&uniforms));

        push_error_scopes(self.device);
        self.encode_scene(pass);
        pop_error_scopes(self.device)
    }

    fn draw_water(&mut self, composite: &WaterComposite<'_, RenderTarget>) -> Result<(), DrawError> {
        let mut uniforms = self.lighting;
        uniforms.set_camera(composite.camera.view_projection(), composite.camera.position);
        uniforms.clip_plane = ClipPlane::DISABLED.to_array();
        self.queue
            .write_buffer(&self.resources.scene_buffer, 0, bytemuck::bytes_of(&uniforms));

        let mut water = self.water_params;
        water.reflection_view_proj = composite.reflection_view_projection.to_cols_array_2d();
        water.move_factor = composite.move_factor;
        water.water_height = composite.water_height;
        self.queue
            .write_buffer(&self.resources.water_buffer, 0, bytemuck::bytes_of(&water));

        push_error_scopes(self.device);
        self.encode_water(composite);
        pop_error_scopes(self.device)
    }
}
