//! Mirrored Camera
//!
//! Scoped reflection of the camera across a horizontal water plane. The guard
//! moves the camera to `2W - H` and negates its pitch; dropping the guard
//! writes back the exact saved position and pitch, including on early return
//! or unwind.

use std::ops::{Deref, DerefMut};

use glam::Vec3;

use crate::camera::FlyCamera;

pub struct MirroredCamera<'a> {
    camera: &'a mut FlyCamera,
    saved_position: Vec3,
    saved_pitch: f32,
}

impl<'a> MirroredCamera<'a> {
    pub fn new(camera: &'a mut FlyCamera, water_height: f32) -> Self {
        let saved_position = camera.position;
        let saved_pitch = camera.pitch;

        camera.position.y = 2.0 * water_height - saved_position.y;
        camera.pitch = -saved_pitch;

        Self {
            camera,
            saved_position,
            saved_pitch,
        }
    }
}

impl Deref for MirroredCamera<'_> {
    type Target = FlyCamera;

    fn deref(&self) -> &FlyCamera {
        self.camera
    }
}

impl DerefMut for MirroredCamera<'_> {
    fn deref_mut(&mut self) -> &mut FlyCamera {
        self.camera
    }
}

impl Drop for MirroredCamera<'_> {
    fn drop(&mut self) {
        self.camera.position = self.saved_position;
        self.camera.pitch = self.saved_pitch;
    }
}
