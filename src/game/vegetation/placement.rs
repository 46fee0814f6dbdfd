//! Instance Placement
//!
//! A placement strategy reads a [`Terrain`] and produces an immutable
//! [`InstanceSet`]. Every instance sits exactly on a grid cell's height and
//! is aligned to that cell's normal.

use glam::{Mat4, Vec3};
use thiserror::Error;

use crate::game::terrain::{NoiseConfigError, Terrain};
use crate::render::instancing::{MAX_VEGETATION_INSTANCES, VegetationInstance};

use super::alignment::InstanceTransform;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    #[error("grid spacing must be finite and at least {min}, got {0}", min = super::grid_noise::MIN_SPACING)]
    Spacing(f32),
    #[error("height band {min}..{max} is empty or not finite")]
    HeightBand { min: f32, max: f32 },
    #[error("scale range {min}..{max} must be positive and ascending")]
    ScaleRange { min: f32, max: f32 },
    #[error("density threshold must be within [0, 1], got {0}")]
    Threshold(f32),
    #[error("{requested} instances requested, the renderer holds at most {cap}")]
    TooManyInstances { requested: usize, cap: usize },
    #[error("placement noise: {0}")]
    Noise(#[from] NoiseConfigError),
}

/// Bookkeeping for a finished placement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementReport {
    /// Instance count asked for, when the strategy targets a count
    pub requested: Option<usize>,
    /// Candidate sites examined
    pub candidates: usize,
    pub placed: usize,
    pub rejected_by_height: usize,
    pub rejected_by_density: usize,
    /// Placement stopped early at the instance cap
    pub capped: bool,
}

impl PlacementReport {
    /// Instances requested but not placed.
    pub fn shortfall(&self) -> usize {
        self.requested
            .map(|r| r.saturating_sub(self.placed))
            .unwrap_or(0)
    }
}

/// Immutable result of a placement run for one visual asset.
#[derive(Debug, Clone)]
pub struct InstanceSet {
    name: String,
    model_up: Vec3,
    transforms: Vec<InstanceTransform>,
    report: PlacementReport,
}

impl InstanceSet {
    pub(crate) fn new(
        name: impl Into<String>,
        model_up: Vec3,
        transforms: Vec<InstanceTransform>,
        report: PlacementReport,
    ) -> Self {
        Self {
            name: name.into(),
            model_up,
            transforms,
            report,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_up(&self) -> Vec3 {
        self.model_up
    }

    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn report(&self) -> &PlacementReport {
        &self.report
    }

    pub fn matrices(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.transforms.iter().map(InstanceTransform::matrix)
    }

    /// GPU records for instanced drawing, all tinted `tint` (0xRRGGBBAA).
    pub fn gpu_instances(&self, tint: u32) -> Vec<VegetationInstance> {
        self.transforms
            .iter()
            .map(|t| {
                VegetationInstance::new(t.position.to_array(), t.rotation.to_array(), t.scale)
                    .with_tint(tint)
            })
            .collect()
    }
}

/// A way of scattering one asset over a terrain.
pub trait PlacementStrategy {
    /// Place instances of an asset whose authored up axis is `model_up`.
    fn place(&self, terrain: &Terrain, model_up: Vec3) -> Result<InstanceSet, PlacementError>;
}

pub(crate) fn check_instance_cap(requested: usize) -> Result<(), PlacementError> {
    if requested > MAX_VEGETATION_INSTANCES {
        return Err(PlacementError::TooManyInstances {
            requested,
            cap: MAX_VEGETATION_INSTANCES,
        });
    }
    Ok(())
}

pub(crate) fn check_scale_range(range: [f32; 2]) -> Result<(), PlacementError> {
    let [min, max] = range;
    if !(min.is_finite() && max.is_finite()) || min <= 0.0 || min > max {
        return Err(PlacementError::ScaleRange { min, max });
    }
    Ok(())
}

pub(crate) fn check_height_band(min: f32, max: f32) -> Result<(), PlacementError> {
    if !(min.is_finite() && max.is_finite()) || min > max {
        return Err(PlacementError::HeightBand { min, max });
    }
    Ok(())
}
