//! Fly Camera
//!
//! Free first-person camera for exploring the landscape. Mouse movement
//! rotates yaw and pitch directly; WASD-style input moves along the view
//! axes. Also builds the view and projection matrices for rendering.
//!
//! Coordinate system: +X right, +Y up, -Z forward at yaw = 0.

use glam::{Mat4, Vec3};

/// Pitch limit: +-89 degrees in radians
const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

#[derive(Clone, Debug, PartialEq)]
pub struct FlyCamera {
    /// Camera position in world space
    pub position: Vec3,
    /// Horizontal angle (radians), unrestricted
    pub yaw: f32,
    /// Vertical angle (radians), clamped to +-89 degrees by the setters
    pub pitch: f32,
    /// Mouse sensitivity in radians per pixel
    pub sensitivity: f32,
    /// Movement speed in units per second
    pub move_speed: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 50.0, 3.0),
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.003,
            move_speed: 30.0,
            fov_y: 45.0_f32.to_radians(),
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl FlyCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the pitch angle (radians), clamped to +-89 degrees
    #[inline]
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Rotate by a raw mouse delta in pixels.
    ///
    /// Positive `dx` looks right, positive `dy` (mouse down) looks down.
    pub fn apply_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.set_pitch(self.pitch - dy * self.sensitivity);
    }

    /// Normalized view direction. At yaw = 0 and pitch = 0 this is -Z.
    #[inline]
    pub fn get_forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Horizontal right vector
    #[inline]
    pub fn get_right(&self) -> Vec3 {
        self.get_forward().cross(Vec3::Y).normalize()
    }

    #[inline]
    pub fn get_up(&self) -> Vec3 {
        self.get_right().cross(self.get_forward()).normalize()
    }

    /// Move along the view axes. Inputs are in [-1, 1]; `boost` triples speed.
    pub fn move_local(&mut self, forward: f32, right: f32, up: f32, dt: f32, boost: bool) {
        let speed = if boost { self.move_speed * 3.0 } else { self.move_speed };
        let step = (self.get_forward() * forward + self.get_right() * right + Vec3::Y * up) * speed * dt;
        self.position += step;
    }

    /// Point the camera at a world position
    pub fn look_at(&mut self, target: Vec3) {
        let to_target = target - self.position;
        let distance = to_target.length();
        if distance > 0.001 {
            self.yaw = to_target.x.atan2(-to_target.z);
            self.set_pitch((to_target.y / distance).clamp(-1.0, 1.0).asin());
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.get_forward(), Vec3::Y)
    }

    /// Right-handed perspective with a [0, 1] depth range.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect.max(1e-4), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_down_negative_z() {
        let camera = FlyCamera::new();
        assert!((camera.get_forward() - Vec3::NEG_Z).length() < 1e-6);
        assert!((camera.get_right() - Vec3::X).length() < 1e-6);
        assert!((camera.get_up() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = FlyCamera::new();
        camera.apply_mouse_delta(0.0, -100_000.0);
        assert!((camera.pitch - PITCH_LIMIT).abs() < 1e-6);
        camera.apply_mouse_delta(0.0, 200_000.0);
        assert!((camera.pitch + PITCH_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn test_mouse_right_increases_yaw() {
        let mut camera = FlyCamera::new();
        camera.apply_mouse_delta(10.0, 0.0);
        assert!((camera.yaw - 0.03).abs() < 1e-6);
    }

    #[test]
    fn test_move_forward() {
        let mut camera = FlyCamera::with_position(Vec3::ZERO);
        camera.move_local(1.0, 0.0, 0.0, 0.5, false);
        assert!((camera.position - Vec3::new(0.0, 0.0, -15.0)).length() < 1e-4);
    }

    #[test]
    fn test_look_at() {
        let mut camera = FlyCamera::with_position(Vec3::ZERO);
        camera.look_at(Vec3::new(10.0, 0.0, 0.0));
        assert!((camera.get_forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_view_projection_centers_forward_point() {
        let camera = FlyCamera::with_position(Vec3::new(0.0, 5.0, 0.0));
        let clip = camera.view_projection(16.0 / 9.0) * Vec3::new(0.0, 5.0, -20.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
