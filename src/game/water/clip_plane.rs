//! Clip Planes
//!
//! A plane `(n, d)` keeps points with `n . p + d >= 0`. Shaders discard the
//! rest, so a pass only sees geometry on one side of the water.

use glam::{Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane(Vec4);

impl ClipPlane {
    /// Keeps everything.
    pub const DISABLED: ClipPlane = ClipPlane(Vec4::new(0.0, 0.0, 0.0, 1.0));

    pub fn new(normal: Vec3, d: f32) -> Self {
        Self(normal.extend(d))
    }

    /// Keeps geometry above `height`.
    pub fn above(height: f32) -> Self {
        Self::new(Vec3::Y, -height)
    }

    /// Keeps geometry below `height`.
    pub fn below(height: f32) -> Self {
        Self::new(Vec3::NEG_Y, height)
    }

    /// Signed distance-like value; negative means discarded.
    pub fn evaluate(&self, point: Vec3) -> f32 {
        self.0.dot(point.extend(1.0))
    }

    pub fn keeps(&self, point: Vec3) -> bool {
        self.evaluate(point) >= 0.0
    }

    pub fn to_array(self) -> [f32; 4] {
        self.0.to_array()
    }
}
