//! Verdant Landscape Viewer
//!
//! Run with: `cargo run --release --bin verdant -- --config assets/scene.json`
//!
//! Generates the terrain and vegetation from a scene file, then flies a
//! free camera over it while the sun crosses the sky.
//!
//! Controls:
//! - WASD: Move camera
//! - Mouse right-drag: Look around
//! - Space / Shift: Up / Down
//! - Ctrl: Move faster
//! - P: Pause the day cycle
//! - [ / ]: Halve / double time of day speed
//! - R: Reset camera
//! - ESC: Exit

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use clap::{ArgAction, Parser};
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowAttributes, WindowId};

use verdant_engine::camera::FlyCamera;
use verdant_engine::game::config::{ConfigError, SceneConfig};
use verdant_engine::game::landscape::{Landscape, LandscapeError};
use verdant_engine::game::lighting::{DayCycle, MAX_TIME_SCALE, SunModel};
use verdant_engine::game::render::{SceneError, SceneRenderer};
use verdant_engine::game::terrain::Terrain;
use verdant_engine::render::{GpuContext, GpuContextConfig, GpuContextError};

/// Closest the camera may get to the ground
const CAMERA_GROUND_CLEARANCE: f32 = 1.5;
const MIN_TIME_SCALE: f32 = 1.0e-5;

#[derive(Parser, Debug)]
#[command(name = "verdant", about = "Procedural landscape with a day/night sun and reflective water")]
struct Args {
    /// Scene description (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 1280)]
    width: u32,
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Cap the frame rate to the display refresh
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,
    /// Override every noise and placement seed
    #[arg(long)]
    seed: Option<u32>,
    /// Load WGSL shaders from this directory instead of the embedded copies
    #[arg(long)]
    shader_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Landscape(#[from] LandscapeError),
    #[error(transparent)]
    Gpu(#[from] GpuContextError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

fn load_config(args: &Args) -> Result<SceneConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading scene {}", path.display());
            SceneConfig::load(path)?
        }
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.reseed(seed);
        config.validate()?;
    }
    Ok(config)
}

// ============================================================================
// INPUT
// ============================================================================

#[derive(Default)]
struct MovementKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    boost: bool,
}

impl MovementKeys {
    fn axis(positive: bool, negative: bool) -> f32 {
        (positive as i32 - negative as i32) as f32
    }
}

/// Right-drag look. The cursor is hidden and confined while dragging.
#[derive(Default)]
struct MouseLook {
    dragging: bool,
    last: Option<(f64, f64)>,
}

impl MouseLook {
    fn set_dragging(&mut self, window: &Window, dragging: bool) {
        self.dragging = dragging;
        let grab = if dragging {
            CursorGrabMode::Confined
        } else {
            self.last = None;
            CursorGrabMode::None
        };
        if let Err(e) = window.set_cursor_grab(grab) {
            log::debug!("Cursor grab {:?} unavailable: {}", grab, e);
        }
        window.set_cursor_visible(!dragging);
    }

    /// Cursor delta since the previous move, while dragging.
    fn moved(&mut self, x: f64, y: f64) -> Option<(f32, f32)> {
        let delta = self
            .last
            .filter(|_| self.dragging)
            .map(|(lx, ly)| ((x - lx) as f32, (y - ly) as f32));
        self.last = Some((x, y));
        delta
    }
}

// ============================================================================
// APP STATE
// ============================================================================

struct AppState {
    window: Arc<Window>,
    gpu: GpuContext,
    renderer: SceneRenderer,
    terrain: Terrain,
    scene: SceneConfig,

    camera: FlyCamera,
    keys: MovementKeys,
    mouse: MouseLook,

    day: DayCycle,
    sun: SunModel,

    start_time: Instant,
    last_frame_time: Instant,
    delta_time: f32,
    frame_count: u32,
    fps_update_time: Instant,
    current_fps: f32,
    failed_passes: u64,
}

impl AppState {
    fn new(window: Arc<Window>, args: &Args, scene: SceneConfig, landscape: Landscape) -> Result<Self, AppError> {
        let gpu = GpuContext::new(
            Arc::clone(&window),
            &GpuContextConfig {
                vsync: args.vsync,
                ..Default::default()
            },
        )?;
        let renderer = SceneRenderer::new(&gpu, &landscape, &scene, args.shader_dir.as_deref())?;

        let now = Instant::now();
        Ok(Self {
            window,
            gpu,
            renderer,
            terrain: landscape.terrain,
            camera: scene.camera.build(),
            keys: MovementKeys::default(),
            mouse: MouseLook::default(),
            day: DayCycle::new(scene.lighting.start_phase, scene.lighting.time_scale),
            sun: scene.lighting.sun,
            scene,
            start_time: now,
            last_frame_time: now,
            delta_time: 0.0,
            frame_count: 0,
            fps_update_time: now,
            current_fps: 0.0,
            failed_passes: 0,
        })
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size.width, new_size.height);
    }

    fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = (now - self.last_frame_time).as_secs_f32();
        self.last_frame_time = now;

        self.frame_count += 1;
        let fps_elapsed = (now - self.fps_update_time).as_secs_f32();
        if fps_elapsed >= 1.0 {
            self.current_fps = self.frame_count as f32 / fps_elapsed;
            self.frame_count = 0;
            self.fps_update_time = now;

            self.window.set_title(&format!(
                "Verdant | FPS: {:.0} | Day {} {}{}",
                self.current_fps,
                self.day.day(),
                self.day.time_string(),
                if self.day.is_paused() { " (paused)" } else { "" }
            ));
        }

        let keys = &self.keys;
        self.camera.move_local(
            MovementKeys::axis(keys.forward, keys.backward),
            MovementKeys::axis(keys.right, keys.left),
            MovementKeys::axis(keys.up, keys.down),
            self.delta_time,
            keys.boost,
        );
        let ground = self
            .terrain
            .height_at_world(self.camera.position.x, self.camera.position.z);
        self.camera.position.y = self.camera.position.y.max(ground + CAMERA_GROUND_CLEARANCE);

        if self.day.advance(self.delta_time) {
            log::info!("Day {} begins", self.day.day());
        }
        let sun = self.sun.evaluate(self.day.phase());
        self.renderer
            .set_sun(&self.gpu.queue, &sun, self.start_time.elapsed().as_secs_f32());
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let report = self
            .renderer
            .render(&self.gpu, &mut self.camera, self.delta_time)?;
        self.failed_passes += report.failures.len() as u64;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyW => self.keys.forward = pressed,
            KeyCode::KeyS => self.keys.backward = pressed,
            KeyCode::KeyA => self.keys.left = pressed,
            KeyCode::KeyD => self.keys.right = pressed,
            KeyCode::Space => self.keys.up = pressed,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => self.keys.down = pressed,
            KeyCode::ControlLeft | KeyCode::ControlRight => self.keys.boost = pressed,
            KeyCode::KeyP if pressed => {
                self.day.toggle_pause();
                log::info!(
                    "Day cycle {} at {}",
                    if self.day.is_paused() { "paused" } else { "resumed" },
                    self.day.time_string()
                );
            }
            KeyCode::BracketLeft if pressed => self.scale_time(0.5),
            KeyCode::BracketRight if pressed => self.scale_time(2.0),
            KeyCode::KeyR if pressed => {
                self.camera = self.scene.camera.build();
                log::info!("Camera reset");
            }
            _ => {}
        }
    }

    fn scale_time(&mut self, factor: f32) {
        let scale = (self.day.time_scale() * factor).clamp(MIN_TIME_SCALE, MAX_TIME_SCALE);
        self.day.set_time_scale(scale);
        log::info!("Time scale {:.5}", self.day.time_scale());
    }

    fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if button == MouseButton::Right {
            self.mouse.set_dragging(&self.window, pressed);
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if let Some((dx, dy)) = self.mouse.moved(x, y) {
            self.camera.apply_mouse_delta(dx, dy);
        }
    }
}

// ============================================================================
// APPLICATION HANDLER
// ============================================================================

struct App {
    args: Args,
    scene: Option<(SceneConfig, Landscape)>,
    state: Option<AppState>,
    error: Option<AppError>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: AppError) {
        self.error = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some((scene, landscape)) = self.scene.take() else {
            return;
        };

        let window_attrs = WindowAttributes::default()
            .with_title("Verdant")
            .with_inner_size(PhysicalSize::new(self.args.width, self.args.height));
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        match AppState::new(window, &self.args, scene, landscape) {
            Ok(state) => {
                log::info!("Ready on {}", state.gpu.adapter_name);
                state.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => state.resize(new_size),
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                let pressed = key_state == ElementState::Pressed;
                if key == KeyCode::Escape && pressed {
                    event_loop.exit();
                    return;
                }
                state.handle_key(key, pressed);
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => state.handle_mouse_button(button, btn_state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } => {
                state.handle_mouse_move(position.x, position.y)
            }
            WindowEvent::RedrawRequested => {
                state.update();

                match state.render() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        state.gpu.reconfigure()
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Surface out of memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("Frame skipped: {e}"),
                }

                state.window.request_redraw();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            log::info!(
                "Exiting after {:.0}s, {} failed passes",
                state.start_time.elapsed().as_secs_f32(),
                state.failed_passes
            );
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn run(args: Args) -> Result<(), AppError> {
    let scene = load_config(&args)?;
    let landscape = Landscape::build(&scene)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        args,
        scene: Some((scene, landscape)),
        state: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;
    match app.error {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
