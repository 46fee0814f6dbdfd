//! Wave clock: the distortion offset that scrolls the water surface.

use crate::game::lighting::wrap_phase;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveClock {
    move_factor: f32,
    wave_speed: f32,
}

impl WaveClock {
    pub fn new(wave_speed: f32) -> Self {
        Self {
            move_factor: 0.0,
            wave_speed,
        }
    }

    pub fn with_move_factor(mut self, move_factor: f32) -> Self {
        self.move_factor = wrap_phase(move_factor);
        self
    }

    /// `move_factor += wave_speed * dt (mod 1)`
    pub fn advance(&mut self, dt: f32) -> f32 {
        if dt.is_finite() {
            self.move_factor = wrap_phase(self.move_factor + self.wave_speed * dt);
        }
        self.move_factor
    }

    pub fn move_factor(&self) -> f32 {
        self.move_factor
    }

    pub fn wave_speed(&self) -> f32 {
        self.wave_speed
    }
}
