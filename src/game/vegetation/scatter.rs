//! Uniform Random Placement
//!
//! Sparse objects. Sites are drawn uniformly over the grid and kept only when
//! the terrain height lies inside [min_height, max_height]. What happens to
//! rejected draws is decided by the [`ShortfallPolicy`].

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::game::terrain::Terrain;

use super::alignment::InstanceTransform;
use super::placement::{
    InstanceSet, PlacementError, PlacementReport, PlacementStrategy, check_height_band,
    check_instance_cap, check_scale_range,
};

/// What to do when height rejections leave fewer instances than requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ShortfallPolicy {
    /// Draw exactly `count` sites and keep whatever lands in the band.
    #[default]
    Accept,
    /// Keep drawing until `count` instances are placed or
    /// `count * max_attempts_per_instance` draws are spent.
    Resample { max_attempts_per_instance: u32 },
}

impl ShortfallPolicy {
    fn draw_budget(self, count: usize) -> usize {
        match self {
            ShortfallPolicy::Accept => count,
            ShortfallPolicy::Resample {
                max_attempts_per_instance,
            } => count.saturating_mul(max_attempts_per_instance.max(1) as usize),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformRandomPlacement {
    pub name: String,
    pub count: usize,
    /// Accepted absolute height band in world units
    pub min_height: f32,
    pub max_height: f32,
    pub scale_range: [f32; 2],
    pub shortfall: ShortfallPolicy,
    pub seed: u64,
}

impl Default for UniformRandomPlacement {
    fn default() -> Self {
        Self {
            name: "shrubs".to_string(),
            count: 1500,
            min_height: 20.0,
            max_height: 40.0,
            scale_range: [0.8, 1.4],
            shortfall: ShortfallPolicy::Accept,
            seed: 11,
        }
    }
}

impl UniformRandomPlacement {
    pub fn validate(&self) -> Result<(), PlacementError> {
        check_height_band(self.min_height, self.max_height)?;
        check_scale_range(self.scale_range)?;
        check_instance_cap(self.count)
    }
}

impl PlacementStrategy for UniformRandomPlacement {
    fn place(&self, terrain: &Terrain, model_up: Vec3) -> Result<InstanceSet, PlacementError> {
        self.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let [scale_lo, scale_hi] = self.scale_range;
        let budget = self.shortfall.draw_budget(self.count);

        let mut report = PlacementReport {
            requested: Some(self.count),
            ..Default::default()
        };
        let mut transforms = Vec::with_capacity(self.count);

        while report.candidates < budget && transforms.len() < self.count {
            report.candidates += 1;
            let x = rng.gen_range(0..terrain.width()) as i32;
            let z = rng.gen_range(0..terrain.depth()) as i32;

            let height = terrain.get_height(x, z);
            if height < self.min_height || height > self.max_height {
                report.rejected_by_height += 1;
                continue;
            }

            let yaw = rng.gen_range(0.0..TAU);
            let scale = if scale_hi > scale_lo {
                rng.gen_range(scale_lo..scale_hi)
            } else {
                scale_lo
            };
            let site = terrain.grid_to_world(x as f32, z as f32, height);
            transforms.push(InstanceTransform::on_surface(
                site,
                terrain.get_normal(x, z),
                model_up,
                yaw,
                scale,
            ));
        }

        report.placed = transforms.len();
        if report.shortfall() > 0 {
            log::warn!(
                "'{}': placed {} of {} requested instances ({} draws outside {:.1}..{:.1})",
                self.name,
                report.placed,
                self.count,
                report.rejected_by_height,
                self.min_height,
                self.max_height
            );
        } else {
            log::info!("Placed {} '{}' instances", report.placed, self.name);
        }

        Ok(InstanceSet::new(self.name.clone(), model_up, transforms, report))
    }
}
