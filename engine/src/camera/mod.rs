//! Camera Module
//!
//! First-person fly camera with view and projection matrices.

pub mod fly_camera;

pub use fly_camera::FlyCamera;
