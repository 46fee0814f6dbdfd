//! Water Render-Target Pipeline
//!
//! Each frame draws the scene three times through a [`SceneDraw`]
//! implementation, then composites the water surface:
//!
//! | Pass       | Target      | Camera                   | Clip plane        |
//! |------------|-------------|--------------------------|-------------------|
//! | Reflection | reflection  | mirrored across water    | keep above water  |
//! | Refraction | refraction  | main                     | keep below water  |
//! | Main       | screen      | main                     | none              |
//!
//! A failing pass is logged and recorded in the [`FrameReport`]; the
//! remaining passes still run.

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::camera::FlyCamera;

use super::WaterConfig;
use super::clip_plane::ClipPlane;
use super::mirror::MirroredCamera;
use super::wave::WaveClock;

/// A per-frame draw failure, confined to the pass that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    #[error("GPU validation failed: {0}")]
    Validation(String),
    #[error("GPU out of memory: {0}")]
    OutOfMemory(String),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Reflection,
    Refraction,
    Main,
    WaterComposite,
}

/// Camera matrices for one pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassCamera {
    pub position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

impl PassCamera {
    pub fn from_camera(camera: &FlyCamera, projection: Mat4) -> Self {
        Self {
            position: camera.position,
            view: camera.view_matrix(),
            projection,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// One scene draw request.
pub struct ScenePass<'a, T> {
    pub kind: PassKind,
    pub target: &'a T,
    pub camera: PassCamera,
    pub clip_plane: ClipPlane,
}

/// Water surface draw reading both offscreen targets.
pub struct WaterComposite<'a, T> {
    pub target: &'a T,
    pub reflection: &'a T,
    pub refraction: &'a T,
    pub camera: PassCamera,
    /// View-projection the reflection target was rendered with
    pub reflection_view_projection: Mat4,
    pub water_height: f32,
    pub move_factor: f32,
}

/// Draws the scene into a target. Implemented by the GPU renderer and by
/// test doubles.
pub trait SceneDraw {
    type Target;

    /// Draw terrain, sun and vegetation with the given camera and clip plane.
    fn render_scene(&mut self, pass: &ScenePass<'_, Self::Target>) -> Result<(), DrawError>;

    /// Draw the water surface on top of the main pass.
    fn draw_water(&mut self, composite: &WaterComposite<'_, Self::Target>) -> Result<(), DrawError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassFailure {
    pub kind: PassKind,
    pub error: DrawError,
}

/// Outcome of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub failures: Vec<PassFailure>,
    pub move_factor: f32,
}

impl FrameReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed(&self, kind: PassKind) -> bool {
        self.failures.iter().any(|f| f.kind == kind)
    }
}

/// Owns the reflection and refraction targets and sequences the passes.
pub struct WaterPipeline<T> {
    reflection: T,
    refraction: T,
    water_height: f32,
    wave: WaveClock,
}

impl<T> WaterPipeline<T> {
    pub fn new(reflection: T, refraction: T, config: &WaterConfig) -> Self {
        Self {
            reflection,
            refraction,
            water_height: config.height,
            wave: WaveClock::new(config.wave_speed),
        }
    }

    pub fn reflection_target(&self) -> &T {
        &self.reflection
    }

    pub fn refraction_target(&self) -> &T {
        &self.refraction
    }

    pub fn water_height(&self) -> f32 {
        self.water_height
    }

    pub fn move_factor(&self) -> f32 {
        self.wave.move_factor()
    }

    /// Replace the wave clock, e.g. to resume at a known offset.
    pub fn set_wave_clock(&mut self, wave: WaveClock) {
        self.wave = wave;
    }

    /// Render one frame: reflection, refraction, main, then the water composite.
    pub fn render_frame<S>(
        &mut self,
        scene: &mut S,
        camera: &mut FlyCamera,
        projection: Mat4,
        screen: &T,
        dt: f32,
    ) -> FrameReport
    where
        S: SceneDraw<Target = T>,
    {
        let mut report = FrameReport::default();
        let mut record = |kind: PassKind, result: Result<(), DrawError>| {
            if let Err(error) = result {
                log::warn!("{:?} pass failed: {}", kind, error);
                report.failures.push(PassFailure { kind, error });
            }
        };

        let reflection_camera = {
            let mirrored = MirroredCamera::new(camera, self.water_height);
            let pass_camera = PassCamera::from_camera(&mirrored, projection);
            let result = scene.render_scene(&ScenePass {
                kind: PassKind::Reflection,
                target: &self.reflection,
                camera: pass_camera,
                clip_plane: ClipPlane::above(self.water_height),
            });
            record(PassKind::Reflection, result);
            pass_camera
        };

        let main_camera = PassCamera::from_camera(camera, projection);

        let result = scene.render_scene(&ScenePass {
            kind: PassKind::Refraction,
            target: &self.refraction,
            camera: main_camera,
            clip_plane: ClipPlane::below(self.water_height),
        });
        record(PassKind::Refraction, result);

        let result = scene.render_scene(&ScenePass {
            kind: PassKind::Main,
            target: screen,
            camera: main_camera,
            clip_plane: ClipPlane::DISABLED,
        });
        record(PassKind::Main, result);

        let move_factor = self.wave.advance(dt);
        let result = scene.draw_water(&WaterComposite {
            target: screen,
            reflection: &self.reflection,
            refraction: &self.refraction,
            camera: main_camera,
            reflection_view_projection: reflection_camera.view_projection(),
            water_height: self.water_height,
            move_factor,
        });
        record(PassKind::WaterComposite, result);

        report.move_factor = move_factor;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingScene {
        scenes: usize,
        waters: usize,
    }

    impl SceneDraw for CountingScene {
        type Target = ();

        fn render_scene(&mut self, _pass: &ScenePass<'_, ()>) -> Result<(), DrawError> {
            self.scenes += 1;
            Ok(())
        }

        fn draw_water(&mut self, _composite: &WaterComposite<'_, ()>) -> Result<(), DrawError> {
            self.waters += 1;
            Ok(())
        }
    }

    #[test]
    fn test_three_scene_passes_and_one_composite() {
        let mut pipeline = WaterPipeline::new((), (), &WaterConfig::default());
        let mut scene = CountingScene { scenes: 0, waters: 0 };
        let mut camera = FlyCamera::default();
        let report = pipeline.render_frame(&mut scene, &mut camera, Mat4::IDENTITY, &(), 0.016);
        assert!(report.is_clean());
        assert_eq!(scene.scenes, 3);
        assert_eq!(scene.waters, 1);
    }
}
