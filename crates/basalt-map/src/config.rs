use serde::{Deserialize, Serialize};

/// Tunable terrain parameters. Changing a config means building a new one; consumers hold it by value.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Edge length of the whole terrain in world units.
    pub terrain_size: f32,
    /// Edge length of the smallest quadtree node, in height field samples. Must be a power of two.
    pub node_size: u32,
    /// Edge length of one roughness and tessellation patch, in height field samples. Must be a power of two no larger
    /// than `node_size`.
    pub patch_size: u32,
    /// World-space height of a sample with value 1.0. Also the top of every node's bounding box.
    pub bumpiness: f32,
    pub min_pixels_per_triangle: f32,
    /// How many times the colormap repeats across the terrain.
    pub colormap_repeat: f32,
    /// Scales how strongly roughness affects tessellation.
    pub roughness_modificator: f32,
    pub features: TerrainFeatures,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            terrain_size: 8192.0,
            node_size: 256,
            patch_size: 64,
            bumpiness: 100.0,
            min_pixels_per_triangle: 3.0,
            colormap_repeat: 128.0,
            roughness_modificator: 1.0,
            features: TerrainFeatures::default(),
        }
    }
}

/// Feature toggles. Only `cpu_frustum_culling` and `uniform_patch_size` change quadtree selection; the rest are passed
/// through to the renderer.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct TerrainFeatures {
    pub lighting: bool,
    pub cpu_frustum_culling: bool,
    pub gpu_frustum_culling: bool,
    pub height_texture: bool,
    pub slope_texture: bool,
    pub roughness: bool,
    pub anti_shimmering: bool,
    /// Debug visualization of node boundaries.
    pub show_nodes: bool,
    /// Subdivide every node down to `node_size`, regardless of the camera.
    pub uniform_patch_size: bool,
    /// Tessellate every patch at full resolution.
    pub brute_force: bool,
    pub colormap: bool,
}

impl Default for TerrainFeatures {
    fn default() -> Self {
        Self {
            lighting: true,
            cpu_frustum_culling: true,
            gpu_frustum_culling: true,
            height_texture: true,
            slope_texture: true,
            roughness: true,
            anti_shimmering: false,
            show_nodes: false,
            uniform_patch_size: false,
            brute_force: false,
            colormap: false,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("terrain size must be positive and finite, got {0}")]
    TerrainSize(f32),
    #[error("node size must be a power of two, got {0}")]
    NodeSize(u32),
    #[error("patch size must be a power of two, got {0}")]
    PatchSize(u32),
    #[error("patch size {patch_size} is larger than node size {node_size}")]
    PatchLargerThanNode { patch_size: u32, node_size: u32 },
    #[error("bumpiness must be finite and non-negative, got {0}")]
    Bumpiness(f32),
}

impl TerrainConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.terrain_size.is_finite() && self.terrain_size > 0.0) {
            return Err(ConfigError::TerrainSize(self.terrain_size));
        }
        if !self.node_size.is_power_of_two() {
            return Err(ConfigError::NodeSize(self.node_size));
        }
        if !self.patch_size.is_power_of_two() {
            return Err(ConfigError::PatchSize(self.patch_size));
        }
        if self.patch_size > self.node_size {
            return Err(ConfigError::PatchLargerThanNode {
                patch_size: self.patch_size,
                node_size: self.node_size,
            });
        }
        if !(self.bumpiness.is_finite() && self.bumpiness >= 0.0) {
            return Err(ConfigError::Bumpiness(self.bumpiness));
        }
        Ok(())
    }

    /// True if switching from `self` to `other` changes the terrain layout, which invalidates derived data.
    pub fn layout_differs(&self, other: &Self) -> bool {
        self.terrain_size != other.terrain_size
            || self.node_size != other.node_size
            || self.patch_size != other.patch_size
    }

    pub fn with_bumpiness(mut self, bumpiness: f32) -> Self {
        self.bumpiness = bumpiness;
        self
    }

    pub fn with_min_pixels_per_triangle(mut self, min_pixels_per_triangle: f32) -> Self {
        self.min_pixels_per_triangle = min_pixels_per_triangle;
        self
    }

    pub fn with_colormap_repeat(mut self, colormap_repeat: f32) -> Self {
        self.colormap_repeat = colormap_repeat;
        self
    }

    pub fn with_roughness_modificator(mut self, roughness_modificator: f32) -> Self {
        self.roughness_modificator = roughness_modificator;
        self
    }

    pub fn with_features(mut self, features: TerrainFeatures) -> Self {
        self.features = features;
        self
    }

    pub fn with_cpu_frustum_culling(mut self, enabled: bool) -> Self {
        self.features.cpu_frustum_culling = enabled;
        self
    }

    pub fn with_uniform_patch_size(mut self, enabled: bool) -> Self {
        self.features.uniform_patch_size = enabled;
        self
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
