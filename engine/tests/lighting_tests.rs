//! Lighting Tests - Sun Orbit, Palettes and the Day Cycle

use glam::Vec3;
use verdant_engine::game::lighting::{DayCycle, SunModel, wrap_phase};

fn close(a: Vec3, b: Vec3, tolerance: f32) -> bool {
    (a - b).length() < tolerance
}

// ============================================================================
// Sun Orbit
// ============================================================================

#[test]
fn test_orbit_radius_and_plane() {
    let sun = SunModel::default();
    for step in 0..16 {
        let p = sun.position_at(step as f32 / 16.0);
        let radius = (p.x * p.x + p.y * p.y).sqrt();
        assert!((radius - sun.orbit_radius).abs() < 1e-2);
        assert_eq!(p.z, sun.orbit_z);
    }
}

#[test]
fn test_phase_wraps_in_orbit() {
    let sun = SunModel::default();
    assert!(close(sun.position_at(1.3), sun.position_at(0.3), 1e-2));
    assert!(close(sun.position_at(-0.25), sun.position_at(0.75), 1e-2));
}

#[test]
fn test_light_direction_is_unit_and_opposes_sun() {
    let sun = SunModel::default();
    for phase in [0.0, 0.125, 0.25, 0.4, 0.5, 0.8] {
        let state = sun.evaluate(phase);
        assert!((state.light_direction().length() - 1.0).abs() < 1e-5);
        assert!(state.light_direction().dot(state.position()) < 0.0);
    }
}

#[test]
fn test_noon_light_points_down() {
    let state = SunModel::default().evaluate(0.25);
    assert!(state.is_day());
    assert!(state.light_direction().y < -0.9);
}

// ============================================================================
// Palettes
// ============================================================================

#[test]
fn test_sunrise_palette_just_after_dawn() {
    let sun = SunModel::default();
    let state = sun.evaluate(1e-4);
    assert!(state.is_day());
    assert!(close(state.light_color(), sun.sunrise_light.into(), 1e-2));
    assert!(close(state.sky_color(), sun.sunrise_sky.into(), 1e-2));
}

#[test]
fn test_sunrise_palette_just_before_dusk() {
    let sun = SunModel::default();
    let state = sun.evaluate(0.5 - 1e-4);
    assert!(state.is_day());
    assert!(close(state.sky_color(), sun.sunrise_sky.into(), 1e-2));
}

#[test]
fn test_default_dusk_drops_straight_to_night() {
    let sun = SunModel::default();
    let state = sun.evaluate(0.5 + 1e-3);
    assert!(!state.is_day());
    assert_eq!(state.light_color(), Vec3::from(sun.night_light));
    assert_eq!(state.sky_color(), Vec3::from(sun.night_sky));
}

#[test]
fn test_dusk_fade_is_continuous_across_horizon() {
    let sun = SunModel {
        dusk_fade: 0.2,
        ..Default::default()
    };
    let above = sun.evaluate(0.5 - 1e-4);
    let below = sun.evaluate(0.5 + 1e-4);
    assert!(!below.is_day());
    assert!(close(above.sky_color(), below.sky_color(), 1e-2));
    assert!(close(above.light_color(), below.light_color(), 1e-2));
}

#[test]
fn test_sky_brightens_toward_noon() {
    let sun = SunModel::default();
    let morning = sun.evaluate(0.05).sky_color();
    let noon = sun.evaluate(0.25).sky_color();
    // Midday sky is bluer than the sunrise sky.
    assert!(noon.z > morning.z);
    assert!(close(noon, sun.midday_sky.into(), 1e-4));
}

// ============================================================================
// Day Cycle
// ============================================================================

#[test]
fn test_full_day_rolls_over() {
    let mut cycle = DayCycle::new(0.0, 0.01);
    let mut rollovers = 0;
    for _ in 0..250 {
        if cycle.advance(1.0) {
            rollovers += 1;
        }
    }
    assert_eq!(rollovers, 2);
    assert_eq!(cycle.day(), 3);
    assert!((0.0..1.0).contains(&cycle.phase()));
}

#[test]
fn test_invalid_deltas_ignored() {
    let mut cycle = DayCycle::new(0.4, 0.1);
    for dt in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        assert!(!cycle.advance(dt));
    }
    assert_eq!(cycle.phase(), 0.4);
}

#[test]
fn test_time_strings() {
    let mut cycle = DayCycle::new(0.0, 0.0);
    assert_eq!(cycle.time_string(), "06:00");
    cycle.set_phase(0.5);
    assert_eq!(cycle.time_string(), "18:00");
    cycle.set_phase(1.25);
    assert_eq!(cycle.time_string(), "12:00");
}

#[test]
fn test_wrap_phase_range() {
    for phase in [-3.7, -1.0, -1e-7, 0.0, 0.999_999, 1.0, 42.42] {
        let wrapped = wrap_phase(phase);
        assert!((0.0..1.0).contains(&wrapped), "{phase} -> {wrapped}");
    }
}

#[test]
fn test_cycle_drives_sun() {
    let sun = SunModel::default();
    let mut cycle = DayCycle::new(0.2, 0.1);
    cycle.advance(4.0);
    let state = sun.evaluate(cycle.phase());
    assert!(!state.is_day());
}
