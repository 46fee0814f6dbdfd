//! Reflective Water
//!
//! Clip planes, the mirrored reflection camera, the wave clock and the
//! per-frame pass orchestration that feeds the water composite.

pub mod clip_plane;
pub mod mirror;
pub mod pipeline;
pub mod wave;

use serde::{Deserialize, Serialize};

pub use clip_plane::ClipPlane;
pub use mirror::MirroredCamera;
pub use pipeline::{
    DrawError, FrameReport, PassCamera, PassFailure, PassKind, SceneDraw, ScenePass,
    WaterComposite, WaterPipeline,
};
pub use wave::WaveClock;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    /// World-space height of the water plane
    pub height: f32,
    /// Distortion scroll speed, in cycles per second
    pub wave_speed: f32,
    /// Distortion strength in texture space
    pub wave_strength: f32,
    /// Distortion pattern repeats per world unit
    pub tiling: f32,
    pub tint: [f32; 3],
    /// Water depth (world units) at which the tint is fully opaque
    pub murk_depth: f32,
    pub reflection_size: [u32; 2],
    pub refraction_size: [u32; 2],
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            height: 9.0,
            wave_speed: 0.03,
            wave_strength: 0.02,
            tiling: 0.05,
            tint: [0.0, 0.3, 0.5],
            murk_depth: 12.0,
            reflection_size: [320, 180],
            refraction_size: [1280, 720],
        }
    }
}
