//! Sun Model
//!
//! The sun orbits in the XY plane at a fixed Z offset. Its height above the
//! horizon drives the light and sky colors: above the horizon they blend from
//! the sunrise palette to the midday palette, below it they hold the night
//! palette. With the default `dusk_fade` of zero the switch into night is
//! instantaneous while the rise into day is smooth.

use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::day_cycle::wrap_phase;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunModel {
    pub orbit_radius: f32,
    pub orbit_z: f32,
    pub midday_light: [f32; 3],
    pub sunrise_light: [f32; 3],
    pub night_light: [f32; 3],
    pub midday_sky: [f32; 3],
    pub sunrise_sky: [f32; 3],
    pub night_sky: [f32; 3],
    /// Depth below the horizon, as a fraction of the orbit radius, over which
    /// colors fade from sunrise to night. Zero switches instantly.
    pub dusk_fade: f32,
    /// Scale of the visible sun sphere
    pub disc_scale: f32,
    /// Emissive multiplier of the visible sun sphere
    pub disc_glow: f32,
}

impl Default for SunModel {
    fn default() -> Self {
        Self {
            orbit_radius: 400.0,
            orbit_z: -150.0,
            midday_light: [1.0, 1.0, 0.95],
            sunrise_light: [1.0, 0.6, 0.2],
            night_light: [0.2, 0.2, 0.1],
            midday_sky: [0.5, 0.7, 0.9],
            sunrise_sky: [0.9, 0.5, 0.4],
            night_sky: [0.01, 0.01, 0.05],
            dusk_fade: 0.0,
            disc_scale: 30.0,
            disc_glow: 1.5,
        }
    }
}

/// Lighting derived from one day phase. Read-only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunState {
    position: Vec3,
    light_direction: Vec3,
    light_color: Vec3,
    sky_color: Vec3,
}

impl SunState {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit vector pointing from the sun toward the scene.
    pub fn light_direction(&self) -> Vec3 {
        self.light_direction
    }

    pub fn light_color(&self) -> Vec3 {
        self.light_color
    }

    pub fn sky_color(&self) -> Vec3 {
        self.sky_color
    }

    pub fn is_day(&self) -> bool {
        self.position.y > 0.0
    }
}

impl SunModel {
    pub fn position_at(&self, phase: f32) -> Vec3 {
        let angle = wrap_phase(phase) * TAU;
        Vec3::new(
            angle.cos() * self.orbit_radius,
            angle.sin() * self.orbit_radius,
            self.orbit_z,
        )
    }

    pub fn evaluate(&self, phase: f32) -> SunState {
        let position = self.position_at(phase);
        let light_direction = -position.normalize_or(Vec3::NEG_Y);
        let height = position.y / self.orbit_radius;

        let (light_color, sky_color) = if position.y > 0.0 {
            let t = height.clamp(0.0, 1.0);
            (
                Vec3::from(self.sunrise_light).lerp(self.midday_light.into(), t),
                Vec3::from(self.sunrise_sky).lerp(self.midday_sky.into(), t),
            )
        } else if self.dusk_fade > 0.0 {
            let t = (-height / self.dusk_fade).clamp(0.0, 1.0);
            (
                Vec3::from(self.sunrise_light).lerp(self.night_light.into(), t),
                Vec3::from(self.sunrise_sky).lerp(self.night_sky.into(), t),
            )
        } else {
            (self.night_light.into(), self.night_sky.into())
        };

        SunState {
            position,
            light_direction,
            light_color,
            sky_color,
        }
    }

    /// Color of the visible sun sphere.
    pub fn disc_color(&self, state: &SunState) -> Vec3 {
        state.light_color * self.disc_glow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noon_is_overhead() {
        let sun = SunModel::default();
        let state = sun.evaluate(0.25);
        assert!((state.position().x).abs() < 1e-3);
        assert!((state.position().y - 400.0).abs() < 1e-3);
        assert_eq!(state.position().z, -150.0);
        assert!((state.light_color() - Vec3::new(1.0, 1.0, 0.95)).length() < 1e-5);
        assert!((state.sky_color() - Vec3::new(0.5, 0.7, 0.9)).length() < 1e-5);
    }

    #[test]
    fn test_light_direction_points_away_from_sun() {
        let sun = SunModel::default();
        for phase in [0.1, 0.3, 0.6, 0.9] {
            let state = sun.evaluate(phase);
            assert!((state.light_direction().length() - 1.0).abs() < 1e-5);
            let expected = -state.position().normalize();
            assert!((state.light_direction() - expected).length() < 1e-6);
        }
    }

    #[test]
    fn test_midnight_is_night() {
        let state = SunModel::default().evaluate(0.75);
        assert!(!state.is_day());
        assert_eq!(state.light_color(), Vec3::new(0.2, 0.2, 0.1));
        assert_eq!(state.sky_color(), Vec3::new(0.01, 0.01, 0.05));
    }

    #[test]
    fn test_dusk_fade_blends_below_horizon() {
        let sun = SunModel {
            dusk_fade: 0.5,
            ..Default::default()
        };
        // Just below the horizon: still close to the sunrise palette.
        let state = sun.evaluate(0.501);
        assert!((state.sky_color() - Vec3::from(sun.sunrise_sky)).length() < 0.05);
        // Deep night: fully night.
        let state = sun.evaluate(0.75);
        assert!((state.sky_color() - Vec3::from(sun.night_sky)).length() < 1e-5);
    }

    #[test]
    fn test_disc_color_is_brighter() {
        let sun = SunModel::default();
        let state = sun.evaluate(0.25);
        assert!((sun.disc_color(&state) - state.light_color() * 1.5).length() < 1e-6);
    }
}
