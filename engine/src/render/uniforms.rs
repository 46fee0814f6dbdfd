//! Uniform Structs for GPU Shaders
//!
//! GPU-compatible uniform blocks. Layouts must match the WGSL structs in
//! `shaders/` exactly; vec3 fields are always followed by a scalar so every
//! row is 16 bytes.

use glam::{Mat4, Vec3};

/// Per-pass scene uniforms, bind group 0 of every scene pipeline.
///
/// WGSL layout (144 bytes):
///   offset   0: view_proj   (mat4x4<f32>) = 64 bytes
///   offset  64: camera_pos  (vec3<f32>)   + time (f32)
///   offset  80: light_dir   (vec3<f32>)   + ambient (f32)
///   offset  96: light_color (vec3<f32>)   + fog_density (f32)
///   offset 112: sky_color   (vec3<f32>)   + texture_blend (f32)
///   offset 128: clip_plane  (vec4<f32>)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub time: f32,
    /// Direction light travels, from the sun toward the scene
    pub light_dir: [f32; 3],
    pub ambient: f32,
    pub light_color: [f32; 3],
    pub fog_density: f32,
    pub sky_color: [f32; 3],
    /// 0 = band colors only, 1 = fully textured terrain
    pub texture_blend: f32,
    /// Keep fragments where dot(clip_plane, vec4(world_pos, 1)) >= 0
    pub clip_plane: [f32; 4],
}

static_assertions::assert_eq_size!(SceneUniforms, [u8; 144]);

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0; 3],
            time: 0.0,
            light_dir: [0.0, -1.0, 0.0],
            ambient: 0.25,
            light_color: [1.0; 3],
            fog_density: 0.0,
            sky_color: [0.5, 0.7, 0.9],
            texture_blend: 0.0,
            clip_plane: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl SceneUniforms {
    pub fn set_camera(&mut self, view_proj: Mat4, position: Vec3) {
        self.view_proj = view_proj.to_cols_array_2d();
        self.camera_pos = position.to_array();
    }

    pub fn set_lighting(&mut self, light_dir: Vec3, light_color: Vec3, sky_color: Vec3) {
        self.light_dir = light_dir.to_array();
        self.light_color = light_color.to_array();
        self.sky_color = sky_color.to_array();
    }
}

/// Sun sphere transform and emissive color, bind group 1 of the sun pipeline.
///
/// WGSL layout (80 bytes): model (mat4x4<f32>) | color (vec4<f32>)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SunUniforms {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(SunUniforms, [u8; 80]);

impl SunUniforms {
    pub fn new(position: Vec3, scale: f32, color: Vec3) -> Self {
        let model = Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale));
        Self {
            model: model.to_cols_array_2d(),
            color: color.extend(1.0).to_array(),
        }
    }
}

/// Water composite parameters, bind group 1 of the water pipeline.
///
/// WGSL layout (112 bytes):
///   offset  0: reflection_view_proj (mat4x4<f32>)
///   offset 64: tint (vec3<f32>)  + move_factor (f32)
///   offset 80: wave_strength, tiling, water_height, murk_depth (f32 x4)
///   offset 96: near, far, shine_damper, reflectivity (f32 x4)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WaterUniforms {
    pub reflection_view_proj: [[f32; 4]; 4],
    pub tint: [f32; 3],
    pub move_factor: f32,
    pub wave_strength: f32,
    pub tiling: f32,
    pub water_height: f32,
    pub murk_depth: f32,
    pub near: f32,
    pub far: f32,
    pub shine_damper: f32,
    pub reflectivity: f32,
}

static_assertions::assert_eq_size!(WaterUniforms, [u8; 112]);

impl Default for WaterUniforms {
    fn default() -> Self {
        Self {
            reflection_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            tint: [0.0, 0.3, 0.5],
            move_factor: 0.0,
            wave_strength: 0.02,
            tiling: 0.05,
            water_height: 0.0,
            murk_depth: 12.0,
            near: 0.1,
            far: 2000.0,
            shine_damper: 20.0,
            reflectivity: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_uniform_offsets() {
        let u = SceneUniforms::default();
        let base = &u as *const _ as usize;
        assert_eq!(&u.camera_pos as *const _ as usize - base, 64);
        assert_eq!(&u.light_dir as *const _ as usize - base, 80);
        assert_eq!(&u.sky_color as *const _ as usize - base, 112);
        assert_eq!(&u.clip_plane as *const _ as usize - base, 128);
    }

    #[test]
    fn test_default_clip_plane_keeps_everything() {
        assert_eq!(SceneUniforms::default().clip_plane, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_sun_model_matrix() {
        let u = SunUniforms::new(Vec3::new(0.0, 400.0, -150.0), 30.0, Vec3::ONE);
        let model = Mat4::from_cols_array_2d(&u.model);
        let p = model.transform_point3(Vec3::Y);
        assert!((p - Vec3::new(0.0, 430.0, -150.0)).length() < 1e-3);
    }

    #[test]
    fn test_water_uniform_offsets() {
        let u = WaterUniforms::default();
        let base = &u as *const _ as usize;
        assert_eq!(&u.tint as *const _ as usize - base, 64);
        assert_eq!(&u.wave_strength as *const _ as usize - base, 80);
        assert_eq!(&u.near as *const _ as usize - base, 96);
    }
}
