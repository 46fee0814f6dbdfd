//! Verdant Engine Library
//!
//! A procedural landscape renderer: fractal-noise heightfield terrain,
//! vegetation aligned to the terrain surface, a day/night sun and water
//! that reflects and refracts the scene around it.
//!
//! # Modules
//!
//! - [`render`] - wgpu device setup, render targets, meshes, uniforms and shaders
//! - [`camera`] - Free-flying camera
//! - [`assets`] - `.vmesh` model file format
//! - [`game`] - Terrain, vegetation, lighting, water and the scene renderer
//!
//! # Example
//!
//! ```ignore
//! use verdant_engine::game::config::SceneConfig;
//! use verdant_engine::game::terrain::Terrain;
//!
//! let config = SceneConfig::default();
//! let terrain = Terrain::generate(
//!     config.terrain.width,
//!     config.terrain.depth,
//!     &config.terrain.noise,
//! )?;
//! let h = terrain.height_at_world(0.0, 0.0);
//! ```

pub mod assets;
pub mod camera;
pub mod render;

// Landscape systems (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use camera::FlyCamera;
pub use render::*;
