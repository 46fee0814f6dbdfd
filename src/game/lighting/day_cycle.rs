//! Day/Night Cycle
//!
//! Owns the day phase in [0, 1). Phase 0 is sunrise, 0.25 noon, 0.5 sunset
//! and 0.75 midnight. The phase advances by `time_scale * dt` and wraps.

/// Upper bound on time scale (two full days per real second).
pub const MAX_TIME_SCALE: f32 = 2.0;

/// Default time scale: one full day every 500 real seconds
pub const DEFAULT_TIME_SCALE: f32 = 0.002;

/// Day/Night cycle manager
#[derive(Debug, Clone)]
pub struct DayCycle {
    /// Current phase of the day (0.0 to 1.0)
    phase: f32,
    /// Day number (starts at 1)
    day_number: u32,
    paused: bool,
    /// Phase advanced per real second
    time_scale: f32,
    /// Total unpaused real time, for stats
    total_elapsed: f32,
}

impl Default for DayCycle {
    fn default() -> Self {
        Self::new(0.25, DEFAULT_TIME_SCALE)
    }
}

impl DayCycle {
    pub fn new(start_phase: f32, time_scale: f32) -> Self {
        Self {
            phase: wrap_phase(start_phase),
            day_number: 1,
            paused: false,
            time_scale: time_scale.clamp(0.0, MAX_TIME_SCALE),
            total_elapsed: 0.0,
        }
    }

    /// Advance the cycle. Returns true if a new day started.
    pub fn advance(&mut self, delta_seconds: f32) -> bool {
        if self.paused || !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return false;
        }

        self.total_elapsed += delta_seconds;

        let raw = self.phase + self.time_scale * delta_seconds;
        let days = raw.floor();
        self.phase = wrap_phase(raw);

        if days >= 1.0 {
            self.day_number += days as u32;
            return true;
        }
        false
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn set_phase(&mut self, phase: f32) {
        self.phase = wrap_phase(phase);
    }

    pub fn day(&self) -> u32 {
        self.day_number
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn total_elapsed(&self) -> f32 {
        self.total_elapsed
    }

    /// Wall-clock style time, "HH:MM". Phase 0 is 06:00.
    pub fn time_string(&self) -> String {
        let hours = (self.phase * 24.0 + 6.0) % 24.0;
        let h = hours.floor() as u32;
        let m = ((hours - h as f32) * 60.0).floor() as u32;
        format!("{:02}:{:02}", h, m.min(59))
    }
}

/// Wrap into [0, 1). `rem_euclid` can round up to exactly 1.0 for tiny
/// negative inputs, which would leave the range.
pub fn wrap_phase(phase: f32) -> f32 {
    if !phase.is_finite() {
        return 0.0;
    }
    let wrapped = phase.rem_euclid(1.0);
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}
