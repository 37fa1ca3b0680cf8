use crate::map::TerrainLayout;

use bytemuck::{cast_slice, Pod, Zeroable};
use static_assertions::const_assert_eq;
use std::mem;

/// The per-vertex data shared by every node instance: the offset of one patch within its node, in patch units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct TerrainPatch {
    /// `[col, row]`
    pub position: [f32; 2],
}

unsafe impl Zeroable for TerrainPatch {}
unsafe impl Pod for TerrainPatch {}

const_assert_eq!(mem::size_of::<TerrainPatch>(), 8);

/// A row-major grid of patch offsets covering one node. Each node instance is drawn as one control point per patch.
#[derive(Clone, Debug, PartialEq)]
pub struct PatchTemplate {
    patches_per_edge: u32,
    patches: Vec<TerrainPatch>,
}

impl PatchTemplate {
    pub fn new(patches_per_edge: u32) -> Self {
        let mut patches = Vec::with_capacity((patches_per_edge * patches_per_edge) as usize);
        for row in 0..patches_per_edge {
            for col in 0..patches_per_edge {
                patches.push(TerrainPatch {
                    position: [col as f32, row as f32],
                });
            }
        }
        Self {
            patches_per_edge,
            patches,
        }
    }

    pub fn from_layout(layout: &TerrainLayout) -> Self {
        Self::new(layout.patches_per_node_edge())
    }

    pub fn patches_per_edge(&self) -> u32 {
        self.patches_per_edge
    }

    pub fn num_patches(&self) -> u32 {
        self.patches.len() as u32
    }

    pub fn patches(&self) -> &[TerrainPatch] {
        &self.patches
    }

    pub fn as_bytes(&self) -> &[u8] {
        cast_slice(&self.patches)
    }
}
