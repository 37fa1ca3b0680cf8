use basalt::core::approx::assert_relative_eq;
use basalt::core::geometry::Frustum;
use basalt::core::glam::{Mat4, Vec3A};
use basalt::core::ilattice::prelude::Extent;
use basalt::map::{CacheStatus, HeightField, NodeInstance, TerrainConfig, WorldUnits};
use basalt::renderer::{HeadlessBridge, RenderBridge};
use basalt::{BasaltConfig, Error, Terrain};

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

fn temp_path(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("basalt-terrain-test-{}-{}-{}", std::process::id(), name, n))
}

fn temp_config(name: &str) -> BasaltConfig {
    BasaltConfig {
        roughness_cache_path: temp_path(&format!("{}-roughness", name)),
        color_info_cache_path: temp_path(&format!("{}-color-info", name)),
        ..Default::default()
    }
}

fn remove_caches(config: &BasaltConfig) {
    let _ = std::fs::remove_file(&config.roughness_cache_path);
    let _ = std::fs::remove_file(&config.color_info_cache_path);
}

fn hills() -> HeightField {
    HeightField::from_fn(1025, 1025, |row, col| {
        let (x, z) = (col as f32 / 1024.0, row as f32 / 1024.0);
        (x * 9.0).sin() * (z * 7.0).cos() * 0.25 + 0.35
    })
    .unwrap()
}

fn everything() -> Frustum {
    Frustum::from_extent(Extent::from_min_and_lub(
        Vec3A::splat(-100.0),
        Vec3A::splat(10_000.0),
    ))
}

#[test]
fn second_load_hits_the_cache() {
    let config = temp_config("cache");

    let first = Terrain::load(hills(), &config).unwrap();
    assert_eq!(first.roughness_cache(), CacheStatus::Miss);
    assert_eq!(first.color_info_cache(), CacheStatus::Miss);

    let second = Terrain::load(hills(), &config).unwrap();
    assert_eq!(second.roughness_cache(), CacheStatus::Hit);
    assert_eq!(second.color_info_cache(), CacheStatus::Hit);
    assert_eq!(second.roughness(), first.roughness());
    assert_eq!(second.color_info(), first.color_info());

    // A different height field must not reuse the cached roughness.
    let flat = HeightField::from_fn(1025, 1025, |_, _| 0.0).unwrap();
    let third = Terrain::load(flat, &config).unwrap();
    assert_eq!(third.roughness_cache(), CacheStatus::Stale);
    assert!(third
        .roughness()
        .levels()
        .iter()
        .all(|level| level.values().iter().all(|&v| v == 0.0)));

    remove_caches(&config);
}

#[test]
fn update_then_draw() {
    let config = temp_config("draw");
    let mut terrain = Terrain::load(hills(), &config).unwrap();
    let mut bridge = HeadlessBridge::new();
    terrain.init_renderer(&mut bridge).unwrap();
    assert_eq!(bridge.resources().unwrap().instance_capacity, 24);

    let stats = terrain.update(WorldUnits(Vec3A::new(80.0, 50.0, 80.0)), &everything());
    assert_eq!(stats.instances, 7);

    let call = terrain.draw(&mut bridge, Mat4::IDENTITY).unwrap();
    assert_eq!(call.instance_count, 7);
    assert_eq!(call.vertices_per_instance, 16);
    assert_eq!(bridge.instance_bytes().len(), 7 * std::mem::size_of::<NodeInstance>());
    assert_eq!(bridge.draws().len(), 1);
    assert_eq!(terrain.frame_stats().frames, 1);

    // Far away, only the root is left.
    terrain.update(WorldUnits(Vec3A::new(1.0e6, 0.0, 1.0e6)), &everything());
    assert_eq!(terrain.selected(), &[NodeInstance::new(0, 0, 1024)]);

    remove_caches(&config);
}

#[test]
fn draw_requires_an_initialized_renderer() {
    let config = temp_config("uninit");
    let mut terrain = Terrain::load(hills(), &config).unwrap();
    terrain.update(WorldUnits(Vec3A::ZERO), &everything());

    let mut bridge = HeadlessBridge::new();
    assert!(matches!(terrain.draw(&mut bridge, Mat4::IDENTITY), Err(Error::Render(_))));

    remove_caches(&config);
}

#[test]
fn set_config_keeps_the_layout() {
    let config = temp_config("set-config");
    let mut terrain = Terrain::load(hills(), &config).unwrap();

    let uniform = terrain.config().with_uniform_patch_size(true).with_bumpiness(300.0);
    terrain.set_config(uniform).unwrap();
    assert_relative_eq!(terrain.uniforms().bumpiness, 300.0);
    let stats = terrain.update(WorldUnits(Vec3A::new(4096.0, 50.0, 4096.0)), &everything());
    assert_eq!(stats.instances, 16);

    let mut resized = *terrain.config();
    resized.node_size = 128;
    assert!(matches!(terrain.set_config(resized), Err(Error::LayoutChanged)));
    assert_eq!(terrain.config().node_size, 256);

    let invalid = terrain.config().with_bumpiness(-1.0);
    assert!(matches!(terrain.set_config(invalid), Err(Error::Config(_))));

    remove_caches(&config);
}

#[test]
fn config_file_round_trip() {
    let path = temp_path("config.ron");
    let mut config = BasaltConfig::default();
    config.terrain = TerrainConfig::default().with_bumpiness(42.0);
    config.height_bands.truncate(2);

    config.write_file(&path).unwrap();
    let read = BasaltConfig::read_file(&path).unwrap();
    assert_eq!(read, config);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn partial_config_file_uses_defaults() {
    let path = temp_path("partial.ron");
    std::fs::write(&path, "(terrain: (bumpiness: 12.5, features: (show_nodes: true)))").unwrap();

    let config = BasaltConfig::read_file(&path).unwrap();
    assert_relative_eq!(config.terrain.bumpiness, 12.5);
    assert_eq!(config.terrain.node_size, 256);
    assert!(config.terrain.features.show_nodes);
    assert!(config.terrain.features.lighting);
    assert_eq!(config.height_bands.len(), 4);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn bridge_is_object_safe() {
    let mut bridge: Box<dyn RenderBridge> = Box::new(HeadlessBridge::new());
    assert!(bridge.upload_instances(&[]).is_err());
}
