//! Runs terrain LOD selection headlessly over a synthetic height field and logs what each frame would draw.
//!
//! Usage: `basalt-select [config.ron]`. Set `RUST_LOG` to control verbosity.

use basalt::core::geometry::Frustum;
use basalt::core::glam::{Mat4, Vec3, Vec3A};
use basalt::map::{HeightField, WorldUnits};
use basalt::renderer::HeadlessBridge;
use basalt::{BasaltConfig, Error, Terrain};

use tracing_subscriber::EnvFilter;

const NUM_FRAMES: u32 = 120;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Reading config from {}", path);
            BasaltConfig::read_file(path)?
        }
        None => BasaltConfig::default(),
    };

    let height_field = HeightField::from_fn(1025, 1025, rolling_hills)?;
    let mut terrain = Terrain::load(height_field, &config)?;
    let mut bridge = HeadlessBridge::new();
    terrain.init_renderer(&mut bridge)?;

    let terrain_size = config.terrain.terrain_size;
    let eye_height = config.terrain.bumpiness * 1.5;
    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 1.0, terrain_size * 2.0);

    // Fly diagonally across the terrain, looking ahead and slightly down.
    for frame in 0..NUM_FRAMES {
        let t = frame as f32 / (NUM_FRAMES - 1) as f32;
        let eye = Vec3::new(t * terrain_size, eye_height, t * terrain_size);
        let target = eye + Vec3::new(1.0, -0.2, 1.0);
        let view_projection = projection * Mat4::look_at_rh(eye, target, Vec3::Y);
        let frustum = Frustum::from_view_projection(&view_projection);

        let stats = terrain.update(WorldUnits(Vec3A::from(eye)), &frustum);
        let call = terrain.draw(&mut bridge, view_projection)?;
        log::info!(
            "frame {:3}: {:4} instances x {} patches, {} nodes visited, {} culled",
            frame,
            call.instance_count,
            call.vertices_per_instance,
            stats.nodes_visited,
            stats.culled
        );
    }

    let frame_stats = terrain.frame_stats();
    log::info!(
        "{} frames, average selection {} us, longest {:?}",
        frame_stats.frames,
        frame_stats.average_selection_time_us,
        frame_stats.longest_selection_time
    );

    Ok(())
}

fn rolling_hills(row: u32, col: u32) -> f32 {
    let (x, z) = (col as f32 / 1024.0, row as f32 / 1024.0);
    let hills = (x * 9.0).sin() * (z * 7.0).cos() * 0.25 + 0.35;
    let ridges = ((x + z) * 41.0).sin().abs() * 0.05;
    (hills + ridges).clamp(0.0, 1.0)
}
