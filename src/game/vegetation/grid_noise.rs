//! Grid + Noise Placement
//!
//! Dense ground cover. Candidate sites lie on a regular lattice; a site is
//! kept when its normalized height is inside the band and a low-frequency
//! density noise exceeds a threshold. A second, higher-frequency noise picks
//! the instance scale.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::game::terrain::{GRID_STEP, NoiseConfig, NoiseField, Terrain};

use super::alignment::InstanceTransform;
use super::placement::{
    InstanceSet, PlacementError, PlacementReport, PlacementStrategy, check_height_band,
    check_instance_cap, check_scale_range,
};

/// Finest accepted lattice spacing. Finer lattices only revisit cells.
pub const MIN_SPACING: f32 = 0.1 * GRID_STEP;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridNoisePlacement {
    pub name: String,
    /// Lattice spacing in world units
    pub spacing: f32,
    /// Accepted normalized height band, [0, 1]
    pub height_band: [f32; 2],
    pub density_frequency: f32,
    /// Sites with density noise at or below this are skipped
    pub density_threshold: f32,
    pub scale_frequency: f32,
    pub scale_range: [f32; 2],
    pub max_instances: usize,
    pub seed: u64,
}

impl Default for GridNoisePlacement {
    fn default() -> Self {
        Self {
            name: "grass".to_string(),
            spacing: 2.0,
            height_band: [0.52, 0.8],
            density_frequency: 0.02,
            density_threshold: 0.42,
            scale_frequency: 0.15,
            scale_range: [0.8, 1.2],
            max_instances: 60_000,
            seed: 7,
        }
    }
}

impl GridNoisePlacement {
    pub fn validate(&self) -> Result<(), PlacementError> {
        if !self.spacing.is_finite() || self.spacing < MIN_SPACING {
            return Err(PlacementError::Spacing(self.spacing));
        }
        let [lo, hi] = self.height_band;
        check_height_band(lo, hi)?;
        if !(0.0..=1.0).contains(&self.density_threshold) {
            return Err(PlacementError::Threshold(self.density_threshold));
        }
        check_scale_range(self.scale_range)?;
        check_instance_cap(self.max_instances)
    }

    fn channel(&self, frequency: f32, seed_offset: u32) -> Result<NoiseField, PlacementError> {
        let config = NoiseConfig {
            amplitude: 1.0,
            frequency,
            octaves: 1,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: (self.seed as u32).wrapping_add(seed_offset),
        };
        Ok(NoiseField::new(config)?)
    }
}

/// Grid cells hit by lattice sites along one axis of `cells` samples, in
/// order and without repeats. Sites at `i * spacing` snap to the nearest cell.
fn lattice_cells(cells: u32, spacing: f32) -> Vec<i32> {
    let last = cells.saturating_sub(1) as i32;
    let steps = ((last as f32 * GRID_STEP) / spacing).floor() as u32;
    let mut hits: Vec<i32> = (0..=steps)
        .map(|i| ((i as f32 * spacing / GRID_STEP).round() as i32).min(last))
        .collect();
    hits.dedup();
    hits
}

impl PlacementStrategy for GridNoisePlacement {
    fn place(&self, terrain: &Terrain, model_up: Vec3) -> Result<InstanceSet, PlacementError> {
        self.validate()?;
        let density = self.channel(self.density_frequency, 0)?;
        let scale_noise = self.channel(self.scale_frequency, 1)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let [band_lo, band_hi] = self.height_band;
        let [scale_lo, scale_hi] = self.scale_range;
        let columns = lattice_cells(terrain.width(), self.spacing);
        let rows = lattice_cells(terrain.depth(), self.spacing);

        let mut report = PlacementReport::default();
        let mut transforms = Vec::new();

        'lattice: for &cz in &rows {
            for &cx in &columns {
                if transforms.len() >= self.max_instances {
                    report.capped = true;
                    break 'lattice;
                }
                report.candidates += 1;

                let normalized = terrain.normalized_height(cx, cz);
                if normalized < band_lo || normalized > band_hi {
                    report.rejected_by_height += 1;
                    continue;
                }

                let height = terrain.get_height(cx, cz);
                let site = terrain.grid_to_world(cx as f32, cz as f32, height);
                if density.unit_sample(site.x, site.z) <= self.density_threshold {
                    report.rejected_by_density += 1;
                    continue;
                }

                let scale_t = scale_noise.unit_sample(site.x, site.z);
                let scale = scale_lo + (scale_hi - scale_lo) * scale_t;
                let yaw = rng.gen_range(0.0..TAU);

                transforms.push(InstanceTransform::on_surface(
                    site,
                    terrain.get_normal(cx, cz),
                    model_up,
                    yaw,
                    scale,
                ));
            }
        }

        report.placed = transforms.len();
        log::info!(
            "Placed {} '{}' instances on a {}-unit lattice ({} candidates, {} out of band, {} sparse{})",
            report.placed,
            self.name,
            self.spacing,
            report.candidates,
            report.rejected_by_height,
            report.rejected_by_density,
            if report.capped { ", capped" } else { "" }
        );

        Ok(InstanceSet::new(self.name.clone(), model_up, transforms, report))
    }
}
