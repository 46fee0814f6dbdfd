//! Scene Rendering
//!
//! wgpu pipelines for terrain, vegetation, the sun and the water composite,
//! and the [`SceneRenderer`] that ties them to the water pass sequence.

pub mod pipelines;
pub mod scene_renderer;

pub use pipelines::{SceneLayouts, ScenePipelines};
pub use scene_renderer::{SceneError, SceneRenderer};
