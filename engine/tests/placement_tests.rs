//! Placement Tests - Grid/Noise and Uniform Random Strategies
//!
//! Both strategies run against a shared terrain through the
//! `PlacementStrategy` trait.

use std::collections::HashSet;

use glam::{Quat, Vec3};
use verdant_engine::game::terrain::{NoiseConfig, Terrain};
use verdant_engine::game::vegetation::grid_noise::MIN_SPACING;
use verdant_engine::game::vegetation::{
    GridNoisePlacement, InstanceSet, InstanceTransform, PlacementError, PlacementStrategy,
    ShortfallPolicy, UniformRandomPlacement, align_up_to_normal,
};
use verdant_engine::render::MAX_VEGETATION_INSTANCES;

fn terrain() -> Terrain {
    let noise = NoiseConfig {
        amplitude: 40.0,
        frequency: 0.02,
        octaves: 4,
        lacunarity: 2.0,
        persistence: 0.5,
        seed: 5,
    };
    Terrain::generate(128, 128, &noise).unwrap()
}

fn flat_terrain() -> Terrain {
    let noise = NoiseConfig {
        amplitude: 0.0,
        ..Default::default()
    };
    Terrain::generate(32, 32, &noise).unwrap()
}

fn place_with(strategy: &dyn PlacementStrategy, terrain: &Terrain) -> InstanceSet {
    strategy.place(terrain, Vec3::Y).unwrap()
}

/// Every instance sits on its cell height and points along its cell normal.
fn assert_on_surface(terrain: &Terrain, set: &InstanceSet) {
    for t in set.transforms() {
        let g = terrain.world_to_grid(t.position.x, t.position.z);
        let (x, z) = (g.x.round() as i32, g.y.round() as i32);
        assert!((g.x - x as f32).abs() < 1e-3 && (g.y - z as f32).abs() < 1e-3);
        assert_eq!(t.position.y, terrain.get_height(x, z));

        let up = t.up(set.model_up());
        assert!((up - terrain.get_normal(x, z)).length() < 1e-4, "up {up} off normal");
    }
}

// ============================================================================
// Grid + Noise
// ============================================================================

#[test]
fn test_grid_instances_sit_on_surface() {
    let t = terrain();
    let set = place_with(&GridNoisePlacement::default(), &t);
    assert!(!set.is_empty());
    assert_on_surface(&t, &set);
}

#[test]
fn test_grid_respects_normalized_band() {
    let t = terrain();
    let placement = GridNoisePlacement::default();
    let set = place_with(&placement, &t);
    let [lo, hi] = placement.height_band;
    let (min, max) = t.height_range();
    for tr in set.transforms() {
        let n = (tr.position.y - min) / (max - min);
        assert!(n >= lo - 1e-4 && n <= hi + 1e-4);
    }
}

#[test]
fn test_grid_never_exceeds_max_instances() {
    let t = terrain();
    for cap in [0, 1, 17, 300] {
        let placement = GridNoisePlacement {
            spacing: 1.0,
            height_band: [0.0, 1.0],
            density_threshold: 0.0,
            max_instances: cap,
            ..Default::default()
        };
        let set = place_with(&placement, &t);
        assert!(set.len() <= cap);
    }
}

#[test]
fn test_grid_report_accounts_for_every_candidate() {
    let t = terrain();
    let set = place_with(&GridNoisePlacement::default(), &t);
    let r = set.report();
    assert_eq!(r.candidates, r.placed + r.rejected_by_height + r.rejected_by_density);
    assert_eq!(r.requested, None);
    assert_eq!(r.shortfall(), 0);
}

#[test]
fn test_grid_scale_within_range() {
    let placement = GridNoisePlacement {
        scale_range: [0.5, 0.75],
        ..Default::default()
    };
    let set = place_with(&placement, &terrain());
    assert!(set.transforms().iter().all(|t| (0.5..=0.75).contains(&t.scale)));
}

#[test]
fn test_fine_lattice_places_each_cell_once() {
    let t = flat_terrain();
    let placement = GridNoisePlacement {
        spacing: 0.4,
        height_band: [0.0, 1.0],
        density_threshold: 0.0,
        ..Default::default()
    };
    let set = place_with(&placement, &t);
    let cells: HashSet<(i32, i32)> = set
        .transforms()
        .iter()
        .map(|tr| {
            let g = t.world_to_grid(tr.position.x, tr.position.z);
            (g.x.round() as i32, g.y.round() as i32)
        })
        .collect();
    assert_eq!(cells.len(), set.len());
    assert_eq!(set.len(), 32 * 32);
    assert_eq!(set.report().candidates, 32 * 32);
}

#[test]
fn test_grid_rejects_vanishing_spacing() {
    for spacing in [1e-5, MIN_SPACING * 0.5, -1.0, f32::NAN] {
        let placement = GridNoisePlacement {
            spacing,
            ..Default::default()
        };
        assert!(matches!(
            placement.place(&flat_terrain(), Vec3::Y),
            Err(PlacementError::Spacing(_))
        ));
    }
    let finest = GridNoisePlacement {
        spacing: MIN_SPACING,
        ..Default::default()
    };
    assert!(finest.validate().is_ok());
}

#[test]
fn test_grid_is_deterministic() {
    let t = terrain();
    let a = place_with(&GridNoisePlacement::default(), &t);
    let b = place_with(&GridNoisePlacement::default(), &t);
    assert_eq!(a.transforms(), b.transforms());
}

// ============================================================================
// Uniform Random
// ============================================================================

#[test]
fn test_random_instances_sit_on_surface() {
    let t = terrain();
    let placement = UniformRandomPlacement {
        count: 250,
        min_height: -100.0,
        max_height: 100.0,
        ..Default::default()
    };
    let set = place_with(&placement, &t);
    assert_eq!(set.len(), 250);
    assert_on_surface(&t, &set);
}

#[test]
fn test_random_respects_absolute_band() {
    let t = terrain();
    let placement = UniformRandomPlacement {
        count: 500,
        min_height: 0.0,
        max_height: 15.0,
        shortfall: ShortfallPolicy::Resample {
            max_attempts_per_instance: 10,
        },
        ..Default::default()
    };
    let set = place_with(&placement, &t);
    assert!(set
        .transforms()
        .iter()
        .all(|tr| (0.0..=15.0).contains(&tr.position.y)));
}

#[test]
fn test_unreachable_band_places_nothing() {
    let placement = UniformRandomPlacement {
        count: 50,
        min_height: 1000.0,
        max_height: 2000.0,
        ..Default::default()
    };
    let set = place_with(&placement, &terrain());
    assert!(set.is_empty());
    assert_eq!(set.report().shortfall(), 50);
}

#[test]
fn test_same_seed_same_instances() {
    let t = terrain();
    let placement = UniformRandomPlacement {
        count: 100,
        min_height: -100.0,
        max_height: 100.0,
        seed: 99,
        ..Default::default()
    };
    let a = place_with(&placement, &t);
    let b = place_with(&placement, &t);
    assert_eq!(a.transforms(), b.transforms());

    let other = UniformRandomPlacement { seed: 100, ..placement };
    assert_ne!(place_with(&other, &t).transforms(), a.transforms());
}

#[test]
fn test_too_many_instances_rejected() {
    let placement = UniformRandomPlacement {
        count: MAX_VEGETATION_INSTANCES + 1,
        ..Default::default()
    };
    assert!(matches!(
        placement.place(&terrain(), Vec3::Y),
        Err(PlacementError::TooManyInstances { .. })
    ));
}

// ============================================================================
// Alignment
// ============================================================================

#[test]
fn test_flat_ground_alignment_is_pure_yaw() {
    let t = flat_terrain();
    let placement = UniformRandomPlacement {
        count: 20,
        min_height: -1.0,
        max_height: 1.0,
        ..Default::default()
    };
    let set = place_with(&placement, &t);
    assert_eq!(set.len(), 20);
    for tr in set.transforms() {
        let (axis, angle) = tr.rotation.to_axis_angle();
        assert!(angle.abs() < 1e-5 || (axis.abs() - Vec3::Y).length() < 1e-4);
    }
    assert_eq!(align_up_to_normal(Vec3::Y, t.get_normal(4, 4)), Quat::IDENTITY);
}

#[test]
fn test_custom_model_up_maps_to_normal() {
    let normal = Vec3::new(0.2, 0.95, 0.1).normalize();
    let model_up = Vec3::Z;
    let tr = InstanceTransform::on_surface(Vec3::ZERO, normal, model_up, 1.1, 2.0);
    assert!((tr.up(model_up) - normal).length() < 1e-5);

    let tip = tr.matrix().transform_point3(model_up);
    assert!((tip - normal * 2.0).length() < 1e-4);
}
