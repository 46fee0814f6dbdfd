//! Asset Tests - Model Files, Scene Config and Landscape Assembly

use std::path::PathBuf;

use glam::Vec3;
use verdant_engine::assets::{MeshFileError, MeshMetadata, load_mesh, save_mesh};
use verdant_engine::game::config::SceneConfig;
use verdant_engine::game::landscape::Landscape;
use verdant_engine::game::vegetation::{FallbackShape, ModelSource, VegetationModel};
use verdant_engine::render::primitives;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("verdant_{}_{}", std::process::id(), name))
}

fn scene_json_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/scene.json")
}

// ============================================================================
// Model Files
// ============================================================================

#[test]
fn test_vmesh_file_survives_disk() {
    let mesh = primitives::cone(0.5, 2.0, 6, [0.2, 0.5, 0.1, 1.0]);
    let path = temp_path("cone.vmesh");
    save_mesh(&path, &mesh, &MeshMetadata::named("Cone")).unwrap();

    let loaded = load_mesh(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.mesh, mesh);
    assert_eq!(loaded.metadata.name, "Cone");
    assert_eq!(loaded.metadata.up_axis, [0.0, 1.0, 0.0]);
}

#[test]
fn test_missing_vmesh_is_io_error() {
    let result = load_mesh(&temp_path("does_not_exist.vmesh"));
    assert!(matches!(result, Err(MeshFileError::Io(_))));
}

#[test]
fn test_model_loads_with_authored_up_axis() {
    let mesh = primitives::grass_blade([0.3, 0.6, 0.2, 1.0]);
    let path = temp_path("sideways.vmesh");
    let metadata = MeshMetadata {
        name: "Sideways Blade".to_string(),
        up_axis: [0.0, 0.0, 2.0],
    };
    save_mesh(&path, &mesh, &metadata).unwrap();

    let model = VegetationModel::load_or_fallback(Some(&path), FallbackShape::Shrub);
    std::fs::remove_file(&path).ok();

    assert_eq!(model.source, ModelSource::File(path.clone()));
    assert_eq!(model.up, Vec3::Z);
    assert_eq!(model.mesh, mesh);
}

#[test]
fn test_broken_model_falls_back() {
    let path = temp_path("garbage.vmesh");
    std::fs::write(&path, b"definitely not a mesh file, but long enough for a header").unwrap();

    let model = VegetationModel::load_or_fallback(Some(&path), FallbackShape::Flower);
    std::fs::remove_file(&path).ok();

    assert_eq!(model.source, ModelSource::Fallback(FallbackShape::Flower));
    assert_eq!(model.up, Vec3::Y);
    assert!(!model.mesh.is_empty());
}

// ============================================================================
// Scene Config
// ============================================================================

#[test]
fn test_bundled_scene_is_valid() {
    let config = SceneConfig::load(&scene_json_path()).unwrap();
    assert_eq!(config.terrain.width, 512);
    assert_eq!(config.scatter.len(), 2);
    assert!(config.lighting.time_scale > 0.0);
}

#[test]
fn test_missing_scene_file() {
    let result = SceneConfig::load(&temp_path("missing_scene.json"));
    assert!(result.is_err());
}

#[test]
fn test_reseed_changes_every_seed() {
    let mut config = SceneConfig::default();
    let before = config.clone();
    config.reseed(1234);

    assert_eq!(config.terrain.noise.seed, 1234);
    assert_ne!(config.ground_cover.placement.seed, before.ground_cover.placement.seed);
    let seeds: Vec<u64> = config.scatter.iter().map(|s| s.placement.seed).collect();
    assert_eq!(seeds.len(), 2);
    assert_ne!(seeds[0], seeds[1]);
}

// ============================================================================
// Landscape
// ============================================================================

#[test]
fn test_landscape_from_json() {
    let json = r#"{
        "terrain": { "width": 40, "depth": 40 },
        "ground_cover": { "name": "moss", "spacing": 3.0, "max_instances": 100 },
        "scatter": [
            { "name": "stones", "count": 12, "min_height": -500.0, "max_height": 500.0, "fallback": "shrub" }
        ]
    }"#;
    let config: SceneConfig = serde_json::from_str(json).unwrap();
    let landscape = Landscape::build(&config).unwrap();

    assert_eq!(landscape.terrain.width(), 40);
    assert_eq!(landscape.terrain_mesh.vertices.len(), 40 * 40);
    assert_eq!(landscape.layers.len(), 2);
    assert_eq!(landscape.layers[0].name(), "moss");
    assert!(landscape.layers[0].instances.len() <= 100);
    assert_eq!(landscape.layers[1].name(), "stones");
    assert_eq!(landscape.layers[1].instances.len(), 12);
    assert_eq!(
        landscape.instance_count(),
        landscape.layers[0].instances.len() + 12
    );
}

#[test]
fn test_landscape_rejects_invalid_layer() {
    let mut config = SceneConfig::default();
    config.terrain.width = 16;
    config.terrain.depth = 16;
    config.scatter[0].placement.min_height = 50.0;
    config.scatter[0].placement.max_height = 10.0;
    assert!(Landscape::build(&config).is_err());
}
