//! Day/Night Lighting
//!
//! [`DayCycle`] advances the day phase; [`SunModel`] turns a phase into the
//! sun position, light direction and light/sky colors.

pub mod day_cycle;
pub mod sun;

pub use day_cycle::{DEFAULT_TIME_SCALE, DayCycle, MAX_TIME_SCALE, wrap_phase};
pub use sun::{SunModel, SunState};
