//! Config Module
//!
//! Scene description loaded from JSON.

pub mod scene_config;

pub use scene_config::{CameraConfig, ConfigError, LightingConfig, SceneConfig, TerrainConfig};
