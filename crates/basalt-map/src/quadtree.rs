use crate::core::geometry::{Containment, Frustum};
use crate::core::glam::Vec3A;
use crate::core::ilattice::prelude::Extent;
use crate::{units::*, NodeInstance, TerrainConfig, TerrainLayout};

/// A node of the implicit terrain quadtree: the square of samples with minimum corner `(row, col)` and edge length
/// `size`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeKey {
    pub row: u32,
    pub col: u32,
    pub size: u32,
}

impl NodeKey {
    pub fn new(row: u32, col: u32, size: u32) -> Self {
        Self { row, col, size }
    }

    pub fn root(size: u32) -> Self {
        Self::new(0, 0, size)
    }

    /// In visiting order: `(row, col)`, `(row, col + h)`, `(row + h, col)`, `(row + h, col + h)`.
    pub fn children(&self) -> [NodeKey; 4] {
        let h = self.size / 2;
        [
            Self::new(self.row, self.col, h),
            Self::new(self.row, self.col + h, h),
            Self::new(self.row + h, self.col, h),
            Self::new(self.row + h, self.col + h, h),
        ]
    }

    /// `(row, col)` of the node center.
    pub fn center(&self) -> SampleUnits<[u32; 2]> {
        let h = self.size / 2;
        SampleUnits([self.row + h, self.col + h])
    }

    /// The world-space box that bounds any terrain in this node, from height 0 up to `bumpiness`.
    pub fn world_extent(&self, terrain_scale: f32, bumpiness: f32) -> WorldUnits<Extent<Vec3A>> {
        let min = Vec3A::new(self.col as f32, 0.0, self.row as f32) * terrain_scale;
        let lub = Vec3A::new(
            (self.col + self.size) as f32 * terrain_scale,
            bumpiness,
            (self.row + self.size) as f32 * terrain_scale,
        );
        WorldUnits(Extent::from_min_and_lub(min, lub))
    }

    pub fn instance(&self) -> NodeInstance {
        NodeInstance::new(self.row, self.col, self.size)
    }
}

/// Everything quadtree selection needs to know about the terrain, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionParams {
    pub root_size: u32,
    pub node_size: u32,
    pub terrain_scale: f32,
    pub bumpiness: f32,
    pub frustum_culling: bool,
    pub uniform_patch_size: bool,
    pub max_leaf_nodes: usize,
}

impl SelectionParams {
    pub fn new(layout: &TerrainLayout, config: &TerrainConfig) -> Self {
        Self {
            root_size: layout.root_size(),
            node_size: layout.node_size(),
            terrain_scale: layout.terrain_scale(),
            bumpiness: config.bumpiness,
            frustum_culling: config.features.cpu_frustum_culling,
            uniform_patch_size: config.features.uniform_patch_size,
            max_leaf_nodes: layout.max_leaf_nodes(),
        }
    }
}

/// Counters from a single [`QuadtreeSelector::select`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SelectionStats {
    pub instances: usize,
    pub nodes_visited: usize,
    pub frustum_tests: usize,
    /// Nodes dropped with their entire subtree for being outside the frustum.
    pub culled: usize,
}

/// Chooses which quadtree nodes to draw, and at what size, for one view of the terrain.
///
/// The selector holds no per-frame state, so one selector can serve any number of views concurrently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadtreeSelector {
    params: SelectionParams,
}

impl QuadtreeSelector {
    pub fn new(params: SelectionParams) -> Self {
        Self { params }
    }

    pub fn from_layout(layout: &TerrainLayout, config: &TerrainConfig) -> Self {
        Self::new(SelectionParams::new(layout, config))
    }

    pub fn params(&self) -> &SelectionParams {
        &self.params
    }

    /// Replaces the contents of `out` with the selected leaf nodes in depth-first order.
    ///
    /// `out` is reserved up front for the worst case, so it never reallocates during the walk.
    pub fn select(
        &self,
        camera: WorldUnits<Vec3A>,
        frustum: &Frustum,
        out: &mut Vec<NodeInstance>,
    ) -> SelectionStats {
        out.clear();
        out.reserve(self.params.max_leaf_nodes);

        let camera = SampleUnits(camera.into_inner() / self.params.terrain_scale);
        let mut stats = SelectionStats::default();
        self.select_recursive(
            NodeKey::root(self.params.root_size),
            camera,
            frustum,
            self.params.frustum_culling,
            out,
            &mut stats,
        );
        stats.instances = out.len();

        log::trace!("{:?}", stats);

        stats
    }

    fn select_recursive(
        &self,
        node: NodeKey,
        camera: SampleUnits<Vec3A>,
        frustum: &Frustum,
        mut culling: bool,
        out: &mut Vec<NodeInstance>,
        stats: &mut SelectionStats,
    ) {
        stats.nodes_visited += 1;

        if culling {
            stats.frustum_tests += 1;
            let WorldUnits(aabb) = node.world_extent(self.params.terrain_scale, self.params.bumpiness);
            match frustum.classify_aabb(&aabb) {
                Containment::Disjoint => {
                    stats.culled += 1;
                    return;
                }
                // Every descendant is inside too.
                Containment::Contains => culling = false,
                Containment::Intersects => {}
            }
        }

        if self.should_subdivide(node, camera) {
            for child in node.children() {
                self.select_recursive(child, camera, frustum, culling, out, stats);
            }
        } else {
            out.push(node.instance());
        }
    }

    fn should_subdivide(&self, node: NodeKey, SampleUnits(camera): SampleUnits<Vec3A>) -> bool {
        if node.size / 2 < self.params.node_size {
            return false;
        }
        if self.params.uniform_patch_size {
            return true;
        }
        let SampleUnits([center_row, center_col]) = node.center();
        let size = node.size as f32;
        (camera.x - center_col as f32).abs() < size && (camera.z - center_row as f32).abs() < size
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
