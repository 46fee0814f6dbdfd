//! Water Tests - Pass Sequencing, Clip Planes and Camera Mirroring
//!
//! Drives `WaterPipeline` with a recording scene so no GPU is needed.

use glam::{Mat4, Vec3};
use verdant_engine::FlyCamera;
use verdant_engine::game::water::{
    ClipPlane, DrawError, PassCamera, PassKind, SceneDraw, ScenePass, WaterComposite,
    WaterConfig, WaterPipeline, WaveClock,
};

/// Names a target so the recorder can tell which one a pass drew into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Reflection,
    Refraction,
    Screen,
}

#[derive(Debug, Clone)]
struct Recorded {
    kind: PassKind,
    target: Slot,
    camera: PassCamera,
    clip_plane: Option<ClipPlane>,
}

#[derive(Default)]
struct RecordingScene {
    passes: Vec<Recorded>,
    composite_inputs: Option<(Slot, Slot)>,
    move_factor: Option<f32>,
    fail: Vec<PassKind>,
}

impl RecordingScene {
    fn failing(kinds: &[PassKind]) -> Self {
        Self {
            fail: kinds.to_vec(),
            ..Default::default()
        }
    }

    fn outcome(&self, kind: PassKind) -> Result<(), DrawError> {
        if self.fail.contains(&kind) {
            Err(DrawError::Other(format!("{kind:?} exploded")))
        } else {
            Ok(())
        }
    }

    fn kinds(&self) -> Vec<PassKind> {
        self.passes.iter().map(|p| p.kind).collect()
    }
}

impl SceneDraw for RecordingScene {
    type Target = Slot;

    fn render_scene(&mut self, pass: &ScenePass<'_, Slot>) -> Result<(), DrawError> {
        self.passes.push(Recorded {
            kind: pass.kind,
            target: *pass.target,
            camera: pass.camera,
            clip_plane: Some(pass.clip_plane),
        });
        self.outcome(pass.kind)
    }

    fn draw_water(&mut self, composite: &WaterComposite<'_, Slot>) -> Result<(), DrawError> {
        self.passes.push(Recorded {
            kind: PassKind::WaterComposite,
            target: *composite.target,
            camera: composite.camera,
            clip_plane: None,
        });
        self.composite_inputs = Some((*composite.reflection, *composite.refraction));
        self.move_factor = Some(composite.move_factor);
        self.outcome(PassKind::WaterComposite)
    }
}

const WATER: f32 = 9.0;

fn pipeline() -> WaterPipeline<Slot> {
    WaterPipeline::new(Slot::Reflection, Slot::Refraction, &WaterConfig::default())
}

fn camera() -> FlyCamera {
    let mut camera = FlyCamera::with_position(Vec3::new(12.5, 31.3, -7.9));
    camera.pitch = -0.41;
    camera.yaw = 2.2;
    camera
}

fn projection() -> Mat4 {
    Mat4::perspective_rh(1.0, 16.0 / 9.0, 0.1, 1000.0)
}

// ============================================================================
// Sequencing
// ============================================================================

#[test]
fn test_pass_order_and_targets() {
    let mut water = pipeline();
    let mut scene = RecordingScene::default();
    let report = water.render_frame(&mut scene, &mut camera(), projection(), &Slot::Screen, 0.016);

    assert!(report.is_clean());
    assert_eq!(
        scene.kinds(),
        vec![
            PassKind::Reflection,
            PassKind::Refraction,
            PassKind::Main,
            PassKind::WaterComposite
        ]
    );
    let targets: Vec<Slot> = scene.passes.iter().map(|p| p.target).collect();
    assert_eq!(
        targets,
        vec![Slot::Reflection, Slot::Refraction, Slot::Screen, Slot::Screen]
    );
    assert_eq!(scene.composite_inputs, Some((Slot::Reflection, Slot::Refraction)));
}

#[test]
fn test_clip_planes_per_pass() {
    let mut water = pipeline();
    let mut scene = RecordingScene::default();
    water.render_frame(&mut scene, &mut camera(), projection(), &Slot::Screen, 0.016);

    let clips: Vec<Option<ClipPlane>> = scene.passes.iter().map(|p| p.clip_plane).collect();
    assert_eq!(
        clips,
        vec![
            Some(ClipPlane::above(WATER)),
            Some(ClipPlane::below(WATER)),
            Some(ClipPlane::DISABLED),
            None
        ]
    );
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn test_reflection_uses_mirrored_camera() {
    let mut water = pipeline();
    let mut scene = RecordingScene::default();
    let original = camera();
    water.render_frame(&mut scene, &mut camera(), projection(), &Slot::Screen, 0.016);

    let reflection = &scene.passes[0].camera;
    assert_eq!(reflection.position.y, 2.0 * WATER - original.position.y);
    assert_eq!(reflection.position.x, original.position.x);
    assert_eq!(reflection.position.z, original.position.z);

    let mut mirrored = original.clone();
    mirrored.position.y = 2.0 * WATER - original.position.y;
    mirrored.pitch = -original.pitch;
    assert_eq!(reflection.view, mirrored.view_matrix());

    for pass in &scene.passes[1..] {
        assert_eq!(pass.camera.position, original.position);
        assert_eq!(pass.camera.view, original.view_matrix());
    }
}

#[test]
fn test_camera_restored_bit_exact() {
    let mut water = pipeline();
    let mut cam = camera();
    let before = cam.clone();

    for _ in 0..5 {
        let mut scene = RecordingScene::default();
        water.render_frame(&mut scene, &mut cam, projection(), &Slot::Screen, 0.016);
    }

    assert_eq!(cam.position.y.to_bits(), before.position.y.to_bits());
    assert_eq!(cam.pitch.to_bits(), before.pitch.to_bits());
    assert_eq!(cam, before);
}

#[test]
fn test_camera_below_water_mirrors_upward() {
    let mut water = pipeline();
    let mut scene = RecordingScene::default();
    let mut cam = FlyCamera::with_position(Vec3::new(0.0, 4.0, 0.0));
    water.render_frame(&mut scene, &mut cam, projection(), &Slot::Screen, 0.016);
    assert_eq!(scene.passes[0].camera.position.y, 14.0);
    assert_eq!(cam.position.y, 4.0);
}

// ============================================================================
// Failure Isolation
// ============================================================================

#[test]
fn test_failed_reflection_does_not_stop_frame() {
    let mut water = pipeline();
    let mut scene = RecordingScene::failing(&[PassKind::Reflection]);
    let mut cam = camera();
    let before = cam.clone();
    let report = water.render_frame(&mut scene, &mut cam, projection(), &Slot::Screen, 0.016);

    assert_eq!(scene.passes.len(), 4);
    assert!(!report.is_clean());
    assert!(report.failed(PassKind::Reflection));
    assert!(!report.failed(PassKind::Main));
    assert_eq!(report.failures.len(), 1);
    assert_eq!(cam, before);
}

#[test]
fn test_every_pass_failing_is_reported() {
    let mut water = pipeline();
    let all = [
        PassKind::Reflection,
        PassKind::Refraction,
        PassKind::Main,
        PassKind::WaterComposite,
    ];
    let mut scene = RecordingScene::failing(&all);
    let report = water.render_frame(&mut scene, &mut camera(), projection(), &Slot::Screen, 0.016);

    assert_eq!(scene.passes.len(), 4);
    let failed: Vec<PassKind> = report.failures.iter().map(|f| f.kind).collect();
    assert_eq!(failed, all.to_vec());
    assert!(matches!(report.failures[0].error, DrawError::Other(_)));
}

// ============================================================================
// Wave Clock
// ============================================================================

#[test]
fn test_move_factor_wraps() {
    let mut water = pipeline();
    water.set_wave_clock(WaveClock::new(0.68).with_move_factor(0.37));
    let mut scene = RecordingScene::default();
    let report = water.render_frame(&mut scene, &mut camera(), projection(), &Slot::Screen, 1.0);

    assert!((report.move_factor - 0.05).abs() < 1e-5);
    assert_eq!(scene.move_factor, Some(report.move_factor));
    assert_eq!(water.move_factor(), report.move_factor);
}

#[test]
fn test_move_factor_advances_every_frame() {
    let config = WaterConfig::default();
    let mut water = WaterPipeline::new(Slot::Reflection, Slot::Refraction, &config);
    let mut previous = water.move_factor();
    for _ in 0..10 {
        let mut scene = RecordingScene::default();
        let report = water.render_frame(&mut scene, &mut camera(), projection(), &Slot::Screen, 0.5);
        assert!((0.0..1.0).contains(&report.move_factor));
        assert!(report.move_factor > previous);
        previous = report.move_factor;
    }
    assert!((previous - config.wave_speed * 5.0).abs() < 1e-5);
}
