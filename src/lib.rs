//! Basalt: large heightmap terrain with quadtree level of detail.
//!
//! Load a [`HeightField`](crate::map::HeightField) into a [`Terrain`](crate::Terrain), hand its resources to a
//! [`RenderBridge`](crate::renderer::RenderBridge) once, then call [`Terrain::update`](crate::Terrain::update) and
//! [`Terrain::draw`](crate::Terrain::draw) every frame.

mod config;
mod error;
mod terrain;

pub use config::BasaltConfig;
pub use error::Error;
pub use terrain::{FrameStats, Terrain};

pub use basalt_map as map;
pub use basalt_map::core;
pub use basalt_renderer as renderer;
