use crate::map::{HeightBand, TerrainConfig, DEFAULT_HEIGHT_BANDS};

use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything needed to load a [`Terrain`](crate::Terrain), usually read from a RON file.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct BasaltConfig {
    pub terrain: TerrainConfig,
    /// Where the roughness pyramid is cached between runs.
    pub roughness_cache_path: PathBuf,
    /// Where the color info map is cached between runs.
    pub color_info_cache_path: PathBuf,
    /// Ascending height bands for ground texturing.
    pub height_bands: Vec<HeightBand>,
}

impl Default for BasaltConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            roughness_cache_path: PathBuf::from("basalt_roughness.bslt"),
            color_info_cache_path: PathBuf::from("basalt_color_info.bslt"),
            height_bands: DEFAULT_HEIGHT_BANDS.to_vec(),
        }
    }
}

impl BasaltConfig {
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, ron::Error> {
        let reader = std::fs::File::open(path)?;

        ron::de::from_reader(reader)
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), ron::Error> {
        let text = ron::ser::to_string_pretty(self, PrettyConfig::default())?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
