//! The basalt terrain data model and per-frame LOD selection.
//!
//! # Height Field
//!
//! Terrain geometry comes from a [`HeightField`](crate::HeightField), a dense grid of height samples. The LOD quadtree
//! covers the height field truncated to even dimensions, while the full source grid stays available for neighborhood
//! sampling. One sample edge spans [`TerrainLayout::terrain_scale`](crate::TerrainLayout::terrain_scale) world units.
//!
//! ## Roughness
//!
//! Each fixed-size patch of samples gets a curvature estimate, normalized to `[0, 1]` at the finest level and averaged
//! into coarser levels like a mip chain. The resulting [`RoughnessPyramid`](crate::RoughnessPyramid) is expensive to
//! compute for large terrains, so it is persisted as an LZ4-compressed artifact keyed by a fingerprint of the height
//! field.
//!
//! # Quadtree Selection
//!
//! Every frame, a [`QuadtreeSelector`](crate::QuadtreeSelector) walks an implicit quadtree over the terrain. Nodes are
//! never materialized; a node is just `(row, col, size)`. Nodes outside the view frustum are dropped with their entire
//! subtree, and nodes close to the camera are split until they reach the configured node size. The leaves are written
//! out as [`NodeInstance`](crate::NodeInstance)s, which are copied into an
//! [`InstanceBuffer`](crate::InstanceBuffer) for the renderer.

mod artifact;
mod color_info;
mod config;
mod grid;
mod height_field;
mod instance;
mod layout;
mod quadtree;
mod roughness;
mod units;

pub use artifact::*;
pub use color_info::*;
pub use config::*;
pub use grid::*;
pub use height_field::*;
pub use instance::*;
pub use layout::*;
pub use quadtree::*;
pub use roughness::*;
pub use units::*;

pub use basalt_core as core;
