//! Scene Configuration
//!
//! Everything needed to build the landscape: terrain size and noise, height
//! bands, vegetation layers, lighting, water and the starting camera. Loaded
//! from JSON; every field has a default so a partial file is valid.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::FlyCamera;
use crate::game::lighting::{DEFAULT_TIME_SCALE, SunModel};
use crate::game::terrain::{BandError, NoiseConfig, NoiseConfigError, TerrainBands};
use crate::game::vegetation::{
    FallbackShape, GroundCoverConfig, PlacementError, ScatterConfig, UniformRandomPlacement,
};
use crate::game::water::WaterConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("terrain size must be at least 2x2, got {0}x{1}")]
    TerrainSize(u32, u32),
    #[error(transparent)]
    Noise(#[from] NoiseConfigError),
    #[error(transparent)]
    Bands(#[from] BandError),
    #[error("vegetation layer '{name}': {source}")]
    Vegetation {
        name: String,
        #[source]
        source: PlacementError,
    },
    #[error("render target size {0}x{1} must be non-zero")]
    TargetSize(u32, u32),
    #[error("water wave speed must be finite, got {0}")]
    WaveSpeed(f32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: u32,
    pub depth: u32,
    pub noise: NoiseConfig,
    pub bands: TerrainBands,
    /// Optional albedo texture blended over the band colors
    pub texture: Option<PathBuf>,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 512,
            depth: 512,
            noise: NoiseConfig::default(),
            bands: TerrainBands::default(),
            texture: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Day phase at startup; 0.25 is noon
    pub start_phase: f32,
    pub time_scale: f32,
    pub sun: SunModel,
    /// Exponential fog density
    pub fog_density: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            start_phase: 0.25,
            time_scale: DEFAULT_TIME_SCALE,
            sun: SunModel::default(),
            fog_density: 0.0015,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub move_speed: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 50.0, 3.0],
            yaw_degrees: 0.0,
            pitch_degrees: -10.0,
            move_speed: 30.0,
            fov_degrees: 45.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> FlyCamera {
        let mut camera = FlyCamera {
            position: Vec3::from_array(self.position),
            yaw: self.yaw_degrees.to_radians(),
            move_speed: self.move_speed,
            fov_y: self.fov_degrees.to_radians(),
            near: self.near,
            far: self.far,
            ..Default::default()
        };
        camera.set_pitch(self.pitch_degrees.to_radians());
        camera
    }
}

/// Complete scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainConfig,
    pub ground_cover: GroundCoverConfig,
    pub scatter: Vec<ScatterConfig>,
    pub lighting: LightingConfig,
    pub water: WaterConfig,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            ground_cover: GroundCoverConfig::default(),
            scatter: default_scatter(),
            lighting: LightingConfig::default(),
            water: WaterConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

/// Flowers near the shore, shrubs on the slopes.
fn default_scatter() -> Vec<ScatterConfig> {
    vec![
        ScatterConfig {
            placement: UniformRandomPlacement {
                name: "flowers".to_string(),
                count: 3000,
                min_height: 11.0,
                max_height: 24.0,
                scale_range: [0.7, 1.3],
                seed: 21,
                ..Default::default()
            },
            fallback: FallbackShape::Flower,
            ..Default::default()
        },
        ScatterConfig {
            placement: UniformRandomPlacement {
                name: "shrubs".to_string(),
                count: 1200,
                min_height: 20.0,
                max_height: 42.0,
                scale_range: [0.8, 1.6],
                seed: 33,
                ..Default::default()
            },
            fallback: FallbackShape::Shrub,
            ..Default::default()
        },
    ]
}

impl SceneConfig {
    /// Read and validate a JSON scene file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SceneConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Override every seed (noise and placement) from one value.
    pub fn reseed(&mut self, seed: u32) {
        self.terrain.noise.seed = seed;
        let base = seed as u64;
        self.ground_cover.placement.seed = base.wrapping_mul(31).wrapping_add(1);
        for (i, layer) in self.scatter.iter_mut().enumerate() {
            layer.placement.seed = base.wrapping_mul(31).wrapping_add(2 + i as u64);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.terrain;
        if t.width < 2 || t.depth < 2 {
            return Err(ConfigError::TerrainSize(t.width, t.depth));
        }
        t.noise.validate()?;
        t.bands.validate()?;

        let vegetation = |name: &str, source| ConfigError::Vegetation {
            name: name.to_string(),
            source,
        };
        let cover = &self.ground_cover.placement;
        cover.validate().map_err(|e| vegetation(&cover.name, e))?;
        for layer in &self.scatter {
            let p = &layer.placement;
            p.validate().map_err(|e| vegetation(&p.name, e))?;
        }

        for [w, h] in [self.water.reflection_size, self.water.refraction_size] {
            if w == 0 || h == 0 {
                return Err(ConfigError::TargetSize(w, h));
            }
        }
        if !self.water.wave_speed.is_finite() {
            return Err(ConfigError::WaveSpeed(self.water.wave_speed));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "terrain": { "width": 64, "depth": 32 }, "water": { "height": 3.5 } }"#;
        let config: SceneConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.terrain.width, 64);
        assert_eq!(config.terrain.depth, 32);
        assert_eq!(config.terrain.noise, NoiseConfig::default());
        assert_eq!(config.water.height, 3.5);
        assert_eq!(config.water.reflection_size, [320, 180]);
        assert_eq!(config.scatter.len(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SceneConfig::default();
        let json = config.to_json().unwrap();
        let parsed: SceneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_tiny_terrain() {
        let mut config = SceneConfig::default();
        config.terrain.width = 1;
        assert!(matches!(config.validate(), Err(ConfigError::TerrainSize(1, 512))));
    }

    #[test]
    fn test_rejects_zero_target() {
        let mut config = SceneConfig::default();
        config.water.reflection_size = [0, 180];
        assert!(matches!(config.validate(), Err(ConfigError::TargetSize(0, 180))));
    }

    #[test]
    fn test_reports_bad_layer_by_name() {
        let mut config = SceneConfig::default();
        config.scatter[1].placement.min_height = 100.0;
        match config.validate() {
            Err(ConfigError::Vegetation { name, .. }) => assert_eq!(name, "shrubs"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_reseed_changes_every_seed() {
        let mut config = SceneConfig::default();
        config.reseed(1234);
        assert_eq!(config.terrain.noise.seed, 1234);
        let seeds: Vec<u64> = config.scatter.iter().map(|l| l.placement.seed).collect();
        assert_ne!(seeds[0], seeds[1]);
        assert_ne!(config.ground_cover.placement.seed, seeds[0]);
    }

    #[test]
    fn test_camera_build() {
        let camera = CameraConfig::default().build();
        assert_eq!(camera.position, Vec3::new(0.0, 50.0, 3.0));
        assert!((camera.pitch - (-10.0f32).to_radians()).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file() {
        let err = SceneConfig::load(Path::new("no/such/scene.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
