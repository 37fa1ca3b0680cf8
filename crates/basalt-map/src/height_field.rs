use crate::Grid2;

use ahash::RandomState;
use std::hash::{BuildHasher, Hasher};

// Arbitrary, but must never change, or every persisted artifact becomes stale.
const FINGERPRINT_SEEDS: [u64; 4] = [
    0x6261_7361_6c74_0001,
    0x9e37_79b9_7f4a_7c15,
    0xc2b2_ae3d_27d4_eb4f,
    0x1656_67b1_9e37_79f9,
];

#[derive(Debug, thiserror::Error)]
pub enum HeightFieldError {
    #[error("height field has {actual} samples, expected {rows} x {cols}")]
    SampleCount { rows: u32, cols: u32, actual: usize },
    #[error("height field must be at least 2 x 2 samples, got {rows} x {cols}")]
    TooSmall { rows: u32, cols: u32 },
}

/// An immutable grid of height samples.
///
/// The terrain covered by the quadtree is the source grid truncated to even dimensions ([`Self::num_rows`] x
/// [`Self::num_cols`]). Sample reads may still reach the last odd row or column of the source grid.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    samples: Grid2<f32>,
}

impl HeightField {
    pub fn new(rows: u32, cols: u32, samples: Vec<f32>) -> Result<Self, HeightFieldError> {
        let actual = samples.len();
        let samples = Grid2::from_values(rows, cols, samples).ok_or(HeightFieldError::SampleCount {
            rows,
            cols,
            actual,
        })?;
        Self::from_grid(samples)
    }

    pub fn from_fn(
        rows: u32,
        cols: u32,
        f: impl FnMut(u32, u32) -> f32,
    ) -> Result<Self, HeightFieldError> {
        Self::from_grid(Grid2::from_fn(rows, cols, f))
    }

    pub fn from_grid(samples: Grid2<f32>) -> Result<Self, HeightFieldError> {
        if samples.rows() < 2 || samples.cols() < 2 {
            return Err(HeightFieldError::TooSmall {
                rows: samples.rows(),
                cols: samples.cols(),
            });
        }
        Ok(Self { samples })
    }

    /// Panics if `(row, col)` is outside of the source grid.
    #[inline]
    pub fn height(&self, row: u32, col: u32) -> f32 {
        self.samples[[row, col]]
    }

    pub fn get_height(&self, row: u32, col: u32) -> Option<f32> {
        self.samples.get(row, col).copied()
    }

    /// Number of rows covered by the terrain; always even.
    #[inline]
    pub fn num_rows(&self) -> u32 {
        (self.samples.rows() / 2) * 2
    }

    /// Number of columns covered by the terrain; always even.
    #[inline]
    pub fn num_cols(&self) -> u32 {
        (self.samples.cols() / 2) * 2
    }

    /// The edge length of the square covering the whole terrain.
    #[inline]
    pub fn extent(&self) -> u32 {
        self.num_rows().max(self.num_cols())
    }

    #[inline]
    pub fn source_rows(&self) -> u32 {
        self.samples.rows()
    }

    #[inline]
    pub fn source_cols(&self) -> u32 {
        self.samples.cols()
    }

    #[inline]
    pub fn source_extent(&self) -> u32 {
        self.source_rows().max(self.source_cols())
    }

    pub fn samples(&self) -> &Grid2<f32> {
        &self.samples
    }

    /// A 64-bit digest of the source dimensions and every sample's bit pattern, used to key persisted artifacts.
    ///
    /// Stable for a given build of this crate; a different digest only costs a rebuild of cached data.
    pub fn fingerprint(&self) -> u64 {
        let [k0, k1, k2, k3] = FINGERPRINT_SEEDS;
        let mut hasher = RandomState::with_seeds(k0, k1, k2, k3).build_hasher();
        hasher.write_u32(self.source_rows());
        hasher.write_u32(self.source_cols());
        for &h in self.samples.values() {
            hasher.write_u32(h.to_bits());
        }
        hasher.finish()
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
