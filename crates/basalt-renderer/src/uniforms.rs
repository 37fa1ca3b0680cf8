use crate::map::{TerrainConfig, TerrainFeatures, TerrainLayout};

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;
use std::mem;

/// Slope values (the y component of the unit normal) between which the slope texture fades in.
pub const SLOPE_RANGE: [f32; 2] = [0.8, 1.0];

pub mod feature_bits {
    pub const LIGHTING: u32 = 1 << 0;
    pub const GPU_FRUSTUM_CULLING: u32 = 1 << 1;
    pub const HEIGHT_TEXTURE: u32 = 1 << 2;
    pub const SLOPE_TEXTURE: u32 = 1 << 3;
    pub const ROUGHNESS: u32 = 1 << 4;
    pub const ANTI_SHIMMERING: u32 = 1 << 5;
    pub const SHOW_NODES: u32 = 1 << 6;
    pub const BRUTE_FORCE: u32 = 1 << 7;
    pub const COLORMAP: u32 = 1 << 8;
}

/// Terrain shader constants. Only changes when the [`TerrainConfig`] does.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct TerrainUniforms {
    pub terrain_scale: f32,
    pub terrain_size: f32,
    pub min_patch_size: f32,
    pub min_node_size: f32,
    pub slope_range: [f32; 2],
    pub bumpiness: f32,
    pub min_pixels_per_triangle: f32,
    pub colormap_repeat: f32,
    pub roughness_modificator: f32,
    pub feature_bits: u32,
    _padding: u32,
}

unsafe impl Zeroable for TerrainUniforms {}
unsafe impl Pod for TerrainUniforms {}

const_assert_eq!(mem::size_of::<TerrainUniforms>(), 48);

impl TerrainUniforms {
    pub fn new(layout: &TerrainLayout, config: &TerrainConfig) -> Self {
        Self {
            terrain_scale: layout.terrain_scale(),
            terrain_size: config.terrain_size,
            min_patch_size: layout.patch_size() as f32,
            min_node_size: layout.node_size() as f32,
            slope_range: SLOPE_RANGE,
            bumpiness: config.bumpiness,
            min_pixels_per_triangle: config.min_pixels_per_triangle,
            colormap_repeat: config.colormap_repeat,
            roughness_modificator: config.roughness_modificator,
            feature_bits: pack_features(&config.features),
            _padding: 0,
        }
    }

    pub fn has_feature(&self, bit: u32) -> bool {
        self.feature_bits & bit != 0
    }
}

/// CPU-only toggles (frustum culling and uniform patch size) have no bit.
pub fn pack_features(features: &TerrainFeatures) -> u32 {
    use feature_bits::*;

    [
        (features.lighting, LIGHTING),
        (features.gpu_frustum_culling, GPU_FRUSTUM_CULLING),
        (features.height_texture, HEIGHT_TEXTURE),
        (features.slope_texture, SLOPE_TEXTURE),
        (features.roughness, ROUGHNESS),
        (features.anti_shimmering, ANTI_SHIMMERING),
        (features.show_nodes, SHOW_NODES),
        (features.brute_force, BRUTE_FORCE),
        (features.colormap, COLORMAP),
    ]
    .iter()
    .filter(|(enabled, _)| *enabled)
    .fold(0, |bits, (_, bit)| bits | bit)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::map::HeightField;

    #[test]
    fn uniforms_from_default_config() {
        let field = HeightField::from_fn(2049, 2049, |_, _| 0.0).unwrap();
        let config = TerrainConfig::default();
        let layout = TerrainLayout::new(&field, &config).unwrap();
        let uniforms = TerrainUniforms::new(&layout, &config);

        assert_eq!(uniforms.terrain_scale, 4.0);
        assert_eq!(uniforms.min_patch_size, 64.0);
        assert_eq!(uniforms.min_node_size, 256.0);
        assert_eq!(uniforms.slope_range, [0.8, 1.0]);
        assert!(uniforms.has_feature(feature_bits::LIGHTING));
        assert!(uniforms.has_feature(feature_bits::ROUGHNESS));
        assert!(!uniforms.has_feature(feature_bits::SHOW_NODES));
        assert!(!uniforms.has_feature(feature_bits::BRUTE_FORCE));
    }

    #[test]
    fn every_feature_has_its_own_bit() {
        let all = TerrainFeatures {
            lighting: true,
            cpu_frustum_culling: true,
            gpu_frustum_culling: true,
            height_texture: true,
            slope_texture: true,
            roughness: true,
            anti_shimmering: true,
            show_nodes: true,
            uniform_patch_size: true,
            brute_force: true,
            colormap: true,
        };
        assert_eq!(pack_features(&all), (1 << 9) - 1);
    }
}
