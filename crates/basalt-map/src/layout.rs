use crate::{ConfigError, HeightField, TerrainConfig};

/// Sizes derived from a [`HeightField`] and [`TerrainConfig`] that stay fixed for the lifetime of a terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TerrainLayout {
    num_rows: u32,
    num_cols: u32,
    root_size: u32,
    node_size: u32,
    patch_size: u32,
    terrain_scale: f32,
}

impl TerrainLayout {
    pub fn new(height_field: &HeightField, config: &TerrainConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let extent = height_field.extent();
        let root_size = padded_root_size(extent, config.node_size);
        if root_size != extent {
            log::debug!(
                "Terrain extent {} is not a power-of-two multiple of node size {}; padding the quadtree root to {}",
                extent,
                config.node_size,
                root_size
            );
        }

        Ok(Self {
            num_rows: height_field.num_rows(),
            num_cols: height_field.num_cols(),
            root_size,
            node_size: config.node_size,
            patch_size: config.patch_size,
            terrain_scale: config.terrain_size / extent as f32,
        })
    }

    #[inline]
    pub fn num_rows(&self) -> u32 {
        self.num_rows
    }

    #[inline]
    pub fn num_cols(&self) -> u32 {
        self.num_cols
    }

    /// Edge length of the quadtree root, in samples. Always `node_size` times a power of two, so every split halves a
    /// node exactly. Nodes past the terrain extent cover no samples.
    #[inline]
    pub fn root_size(&self) -> u32 {
        self.root_size
    }

    #[inline]
    pub fn node_size(&self) -> u32 {
        self.node_size
    }

    #[inline]
    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    /// World units per sample.
    #[inline]
    pub fn terrain_scale(&self) -> f32 {
        self.terrain_scale
    }

    #[inline]
    pub fn patches_per_node_edge(&self) -> u32 {
        self.node_size / self.patch_size
    }

    /// The number of control points drawn per node instance.
    #[inline]
    pub fn patches_per_node(&self) -> u32 {
        self.patches_per_node_edge() * self.patches_per_node_edge()
    }

    #[inline]
    pub fn num_patch_rows(&self) -> u32 {
        self.num_rows / self.patch_size
    }

    #[inline]
    pub fn num_patch_cols(&self) -> u32 {
        self.num_cols / self.patch_size
    }

    /// How many times the root can be split before its children would be smaller than `node_size`.
    pub fn max_depth(&self) -> u32 {
        let mut depth = 0;
        let mut size = self.root_size;
        while size / 2 >= self.node_size {
            size /= 2;
            depth += 1;
        }
        depth
    }

    /// The most leaves a single selection can produce: a complete quadtree of [`Self::max_depth`].
    pub fn max_leaf_nodes(&self) -> usize {
        1usize << (2 * self.max_depth())
    }

    /// Capacity of the GPU-facing instance buffer: 1.5x the number of node-sized tiles, but never less than
    /// [`Self::max_leaf_nodes`].
    pub fn instance_capacity(&self) -> usize {
        let extent = self.num_rows.max(self.num_cols);
        let tiles_per_edge = (extent / self.node_size) as usize;
        let heuristic = tiles_per_edge * tiles_per_edge * 3 / 2;
        heuristic.max(self.max_leaf_nodes())
    }
}

/// The smallest `node_size * 2^k` that is at least `extent`.
fn padded_root_size(extent: u32, node_size: u32) -> u32 {
    let tiles_per_edge = (extent + node_size - 1) / node_size;
    node_size * tiles_per_edge.max(1).next_power_of_two()
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
