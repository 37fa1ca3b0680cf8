use crate::{Artifact, ArtifactKey, Grid2, HeightField};

use ahash::RandomState;
use serde::{Deserialize, Serialize};
use std::hash::{BuildHasher, Hasher};

/// A range of heights that share a ground texture. Neighboring bands may overlap so the shader can blend them.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct HeightBand {
    pub start: f32,
    pub end: f32,
}

impl HeightBand {
    pub const fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }
}

/// Sand, grass, stone and snow.
pub const DEFAULT_HEIGHT_BANDS: [HeightBand; 4] = [
    HeightBand::new(0.0, 0.02),
    HeightBand::new(0.005, 0.15),
    HeightBand::new(0.1, 0.3),
    HeightBand::new(0.15, 1.0),
];

/// An RGBA8 texel per source sample that tells the terrain shader which two [`HeightBand`]s to blend.
///
/// Texel channels are `[lower band, upper band, upper band start, lower band end]`, with the last two quantized from
/// `[0, 1]` heights. Texel rows are stored bottom-up, so storage row 0 holds the last row of the height field.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorInfoMap {
    texels: Grid2<[u8; 4]>,
}

impl ColorInfoMap {
    /// `bands` must be sorted by ascending `start`. No bands produces an all-zero map.
    pub fn build(height_field: &HeightField, bands: &[HeightBand]) -> Self {
        let rows = height_field.source_rows();
        let cols = height_field.source_cols();
        if bands.is_empty() {
            log::warn!("No height bands configured; color info is all zeros");
            return Self::from_texels(Grid2::from_fn(rows, cols, |_, _| [0; 4]));
        }

        let texels = Grid2::from_fn(rows, cols, |storage_row, col| {
            let height = height_field.height(rows - 1 - storage_row, col);
            band_texel(bands, height)
        });

        Self::from_texels(texels)
    }

    pub fn from_texels(texels: Grid2<[u8; 4]>) -> Self {
        Self { texels }
    }

    /// The texel for height field sample `(row, col)`.
    pub fn texel(&self, row: u32, col: u32) -> Option<[u8; 4]> {
        let storage_row = self.texels.rows().checked_sub(row + 1)?;
        self.texels.get(storage_row, col).copied()
    }

    /// All texels in storage order, ready for upload.
    pub fn texels(&self) -> &Grid2<[u8; 4]> {
        &self.texels
    }
}

/// Digest of `bands`, used as the [`ArtifactKey::parameter`] of a persisted [`ColorInfoMap`].
pub fn bands_fingerprint(bands: &[HeightBand]) -> u64 {
    let mut hasher = RandomState::with_seeds(0x636f_6c6f_7273, 1, 2, 3).build_hasher();
    hasher.write_usize(bands.len());
    for band in bands {
        hasher.write_u32(band.start.to_bits());
        hasher.write_u32(band.end.to_bits());
    }
    hasher.finish()
}

fn band_texel(bands: &[HeightBand], height: f32) -> [u8; 4] {
    let mut upper = 0;
    while upper + 1 < bands.len() && height > bands[upper + 1].start {
        upper += 1;
    }
    let lower = upper.saturating_sub(1);

    [
        lower as u8,
        upper as u8,
        quantize(bands[upper].start),
        quantize(bands[lower].end),
    ]
}

fn quantize(x: f32) -> u8 {
    // Float to int casts saturate.
    (x * 255.0) as u8
}

impl Artifact for ColorInfoMap {
    const KIND: u32 = 2;

    type Element = [u8; 4];

    fn artifact_levels(&self) -> &[Grid2<[u8; 4]>] {
        std::slice::from_ref(&self.texels)
    }

    fn from_artifact_levels(_key: ArtifactKey, levels: Vec<Grid2<[u8; 4]>>) -> Self {
        let texels = levels
            .into_iter()
            .next()
            .unwrap_or_else(|| Grid2::from_fn(0, 0, |_, _| [0; 4]));
        Self::from_texels(texels)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn texels_pick_overlapping_bands() {
        let bands = &DEFAULT_HEIGHT_BANDS;
        // Below every band start but the first.
        assert_eq!(band_texel(bands, 0.0), [0, 0, 0, 5]);
        // Inside the sand/grass overlap.
        assert_eq!(band_texel(bands, 0.01), [0, 1, 1, 5]);
        // Stone, blending down into grass.
        assert_eq!(band_texel(bands, 0.12), [1, 2, 25, 38]);
        // Everything above the snow line.
        assert_eq!(band_texel(bands, 0.9), [2, 3, 38, 76]);
        assert_eq!(band_texel(bands, 5.0), [2, 3, 38, 76]);
    }

    #[test]
    fn rows_are_stored_bottom_up() {
        let field = HeightField::from_fn(3, 2, |row, _| if row == 2 { 0.5 } else { 0.0 }).unwrap();
        let map = ColorInfoMap::build(&field, &DEFAULT_HEIGHT_BANDS);

        // Covers the full source grid, including the odd last row.
        assert_eq!((map.texels().rows(), map.texels().cols()), (3, 2));

        let high = band_texel(&DEFAULT_HEIGHT_BANDS, 0.5);
        let low = band_texel(&DEFAULT_HEIGHT_BANDS, 0.0);
        assert_eq!(map.texels()[[0, 0]], high);
        assert_eq!(map.texels()[[2, 1]], low);
        assert_eq!(map.texel(2, 0), Some(high));
        assert_eq!(map.texel(0, 1), Some(low));
        assert_eq!(map.texel(3, 0), None);
    }

    #[test]
    fn no_bands_is_all_zeros() {
        let field = HeightField::from_fn(4, 4, |row, col| (row + col) as f32).unwrap();
        let map = ColorInfoMap::build(&field, &[]);
        assert!(map.texels().values().iter().all(|t| *t == [0; 4]));
    }

    #[test]
    fn band_fingerprint_tracks_bands() {
        let mut edited = DEFAULT_HEIGHT_BANDS;
        edited[2].end = 0.35;
        assert_eq!(bands_fingerprint(&DEFAULT_HEIGHT_BANDS), bands_fingerprint(&DEFAULT_HEIGHT_BANDS));
        assert_ne!(bands_fingerprint(&DEFAULT_HEIGHT_BANDS), bands_fingerprint(&edited));
    }
}
