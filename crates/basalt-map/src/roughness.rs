use crate::{Artifact, ArtifactKey, Grid2, HeightField};

use itertools::iproduct;
use std::time::Instant;

/// One level of a [`RoughnessPyramid`], indexed by `[patch_row, patch_col]`.
pub type RoughnessLevel = Grid2<f32>;

/// Per-patch terrain roughness at every LOD.
///
/// Level 0 has one value per `patch_size x patch_size` block of samples, normalized to `[0, 1]` by the roughest patch.
/// Every coarser level halves both dimensions (never below 1) and stores the mean of the 2x2 children below it. Coarser
/// levels are *not* re-normalized.
#[derive(Clone, Debug, PartialEq)]
pub struct RoughnessPyramid {
    patch_size: u32,
    levels: Vec<RoughnessLevel>,
}

/// `1 + floor(log2(max(num_patch_rows, num_patch_cols)))`, or 0 if there are no patches.
pub fn num_roughness_levels(num_patch_rows: u32, num_patch_cols: u32) -> u32 {
    let max_dim = num_patch_rows.max(num_patch_cols);
    u32::BITS - max_dim.leading_zeros()
}

impl RoughnessPyramid {
    /// Computes the pyramid from scratch. This visits every interior sample of `height_field` once.
    pub fn build(height_field: &HeightField, patch_size: u32) -> Self {
        if patch_size == 0 {
            log::warn!("Patch size 0 has no patches; roughness is empty");
            return Self::from_levels(patch_size, Vec::new());
        }

        let start = Instant::now();

        let num_patch_rows = height_field.num_rows() / patch_size;
        let num_patch_cols = height_field.num_cols() / patch_size;
        let num_levels = num_roughness_levels(num_patch_rows, num_patch_cols);
        if num_levels == 0 {
            log::warn!(
                "Terrain of {}x{} samples is smaller than one {}x{} patch; roughness is empty",
                height_field.num_rows(),
                height_field.num_cols(),
                patch_size,
                patch_size
            );
            return Self::from_levels(patch_size, Vec::new());
        }

        let mut levels = Vec::with_capacity(num_levels as usize);
        levels.push(build_level0(height_field, patch_size, num_patch_rows, num_patch_cols));
        for _ in 1..num_levels {
            let child_level = &levels[levels.len() - 1];
            let parent_level = downsample(child_level);
            levels.push(parent_level);
        }

        log::info!(
            "Built {} roughness levels from {}x{} patches in {:?}",
            num_levels,
            num_patch_rows,
            num_patch_cols,
            start.elapsed()
        );

        Self::from_levels(patch_size, levels)
    }

    pub fn from_levels(patch_size: u32, levels: Vec<RoughnessLevel>) -> Self {
        Self { patch_size, levels }
    }

    pub fn patch_size(&self) -> u32 {
        self.patch_size
    }

    pub fn num_levels(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn levels(&self) -> &[RoughnessLevel] {
        &self.levels
    }

    pub fn level(&self, level: u32) -> Option<&RoughnessLevel> {
        self.levels.get(level as usize)
    }

    pub fn roughness(&self, level: u32, patch_row: u32, patch_col: u32) -> Option<f32> {
        self.level(level)?.get(patch_row, patch_col).copied()
    }

    /// Roughness of the quadtree node at `(row, col)` with edge length `size`, all in samples.
    ///
    /// The level is chosen so one patch covers the whole node, clamped to the coarsest level. Nodes falling outside the
    /// patch grid (the ragged edge of a non-square terrain) read the nearest patch.
    pub fn node_roughness(&self, row: u32, col: u32, size: u32) -> f32 {
        if self.levels.is_empty() || self.patch_size == 0 {
            return 0.0;
        }
        let patches_per_edge = (size / self.patch_size).max(1);
        let level = (u32::BITS - 1 - patches_per_edge.leading_zeros()).min(self.num_levels() - 1);
        let grid = &self.levels[level as usize];
        let level_patch_size = self.patch_size << level;
        let patch_row = (row / level_patch_size).min(grid.rows() - 1);
        let patch_col = (col / level_patch_size).min(grid.cols() - 1);
        grid[[patch_row, patch_col]]
    }
}

impl Artifact for RoughnessPyramid {
    const KIND: u32 = 1;

    type Element = f32;

    fn artifact_levels(&self) -> &[RoughnessLevel] {
        &self.levels
    }

    fn from_artifact_levels(key: ArtifactKey, levels: Vec<RoughnessLevel>) -> Self {
        Self::from_levels(key.parameter as u32, levels)
    }
}

fn build_level0(
    height_field: &HeightField,
    patch_size: u32,
    num_patch_rows: u32,
    num_patch_cols: u32,
) -> RoughnessLevel {
    // The source grid may be a little larger than the terrain, so sample patches are scaled up to match.
    let sample_patch_size = (patch_size as f32
        * (height_field.source_extent() as f32 / height_field.extent() as f32))
        as u32;

    let mut level = Grid2::from_fn(num_patch_rows, num_patch_cols, |patch_row, patch_col| {
        patch_roughness(height_field, patch_row, patch_col, sample_patch_size)
    });

    let max_roughness = level.values().iter().copied().fold(0.0f32, f32::max);
    if max_roughness > 0.0 {
        for value in level.values_mut() {
            *value /= max_roughness;
        }
    } else {
        log::warn!("Terrain is perfectly flat; all roughness values are zero");
    }

    level
}

/// The largest deviation of any sample in the patch from the midpoint of its opposing neighbors, in any of 4 directions.
fn patch_roughness(
    height_field: &HeightField,
    patch_row: u32,
    patch_col: u32,
    sample_patch_size: u32,
) -> f32 {
    let row = patch_row * sample_patch_size;
    let col = patch_col * sample_patch_size;

    // Samples on the edge of the height field don't have a full neighborhood.
    let rows = row.max(1)..(row + sample_patch_size).min(height_field.source_rows() - 1);
    let cols = col.max(1)..(col + sample_patch_size).min(height_field.source_cols() - 1);

    iproduct!(rows, cols).fold(0.0f32, |roughness, (r, c)| {
        roughness.max(sample_curvature(height_field, r, c))
    })
}

fn sample_curvature(height_field: &HeightField, r: u32, c: u32) -> f32 {
    let h = |r, c| height_field.height(r, c);
    let center = h(r, c);
    let opposing_sums = [
        // straight
        h(r, c - 1) + h(r, c + 1),
        h(r - 1, c) + h(r + 1, c),
        // diagonal
        h(r - 1, c - 1) + h(r + 1, c + 1),
        h(r + 1, c - 1) + h(r - 1, c + 1),
    ];
    opposing_sums
        .iter()
        .fold(0.0, |max, sum| f32::max(max, (sum * 0.5 - center).abs()))
}

/// Takes the **mean** of each 2x2 block of `child`.
fn downsample(child: &RoughnessLevel) -> RoughnessLevel {
    let rows = (child.rows() / 2).max(1);
    let cols = (child.cols() / 2).max(1);
    let last_row = child.rows() - 1;
    let last_col = child.cols() - 1;
    Grid2::from_fn(rows, cols, |row, col| {
        let r0 = 2 * row;
        let c0 = 2 * col;
        let r1 = (r0 + 1).min(last_row);
        let c1 = (c0 + 1).min(last_col);
        (child[[r0, c0]] + child[[r0, c1]] + child[[r1, c0]] + child[[r1, c1]]) / 4.0
    })
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
    use crate::core::approx::assert_relative_eq;

    fn bumpy_field(rows: u32, cols: u32) -> HeightField {
        HeightField::from_fn(rows, cols, |row, col| {
            let (r, c) = (row as f32, col as f32);
            (r * 0.37).sin() * (c * 0.21).cos() + 0.05 * ((row * 7 + col * 13) % 5) as f32
        })
        .unwrap()
    }

    #[test]
    fn level_count_from_patch_grid() {
        assert_eq!(num_roughness_levels(4, 4), 3);
        assert_eq!(num_roughness_levels(1, 1), 1);
        assert_eq!(num_roughness_levels(5, 2), 3);
        assert_eq!(num_roughness_levels(8, 3), 4);
        assert_eq!(num_roughness_levels(0, 0), 0);
    }

    #[test]
    fn four_by_four_patches_have_three_levels() {
        let pyramid = RoughnessPyramid::build(&bumpy_field(32, 32), 8);
        assert_eq!(pyramid.num_levels(), 3);
        let dims: Vec<_> = pyramid.levels().iter().map(|l| (l.rows(), l.cols())).collect();
        assert_eq!(dims, [(4, 4), (2, 2), (1, 1)]);
    }

    #[test]
    fn flat_terrain_has_zero_roughness() {
        let field = HeightField::from_fn(32, 32, |_, _| 0.25).unwrap();
        let pyramid = RoughnessPyramid::build(&field, 8);
        for level in pyramid.levels() {
            for &value in level.values() {
                assert!(!value.is_nan());
                assert_eq!(value, 0.0);
            }
        }
    }

    #[test]
    fn level0_is_normalized() {
        let pyramid = RoughnessPyramid::build(&bumpy_field(64, 64), 8);
        let level0 = pyramid.level(0).unwrap();
        let max = level0.values().iter().copied().fold(0.0f32, f32::max);
        assert_relative_eq!(max, 1.0);
        assert!(level0.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn coarse_levels_are_means_of_children() {
        let pyramid = RoughnessPyramid::build(&bumpy_field(64, 64), 4);
        assert_eq!(pyramid.num_levels(), 5);
        for level in 1..pyramid.num_levels() {
            let parent = pyramid.level(level).unwrap();
            let child = pyramid.level(level - 1).unwrap();
            for (row, col) in iproduct!(0..parent.rows(), 0..parent.cols()) {
                let mean = (child[[2 * row, 2 * col]]
                    + child[[2 * row, 2 * col + 1]]
                    + child[[2 * row + 1, 2 * col]]
                    + child[[2 * row + 1, 2 * col + 1]])
                    / 4.0;
                assert_relative_eq!(parent[[row, col]], mean, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn single_spike_is_the_roughest_patch() {
        // A spike in the middle of patch (1, 2) is the only curvature in the terrain.
        let field = HeightField::from_fn(32, 32, |row, col| if (row, col) == (12, 20) { 4.0 } else { 0.0 })
            .unwrap();
        let pyramid = RoughnessPyramid::build(&field, 8);
        let level0 = pyramid.level(0).unwrap();
        assert_eq!(level0[[1, 2]], 1.0);
        // Patches away from the spike are perfectly flat.
        assert_eq!(level0[[0, 0]], 0.0);
        assert_eq!(level0[[3, 3]], 0.0);
    }

    #[test]
    fn curvature_on_patch_boundaries_counts() {
        // The spike sits on the first row of patch (1, 0), so its upper neighbor row belongs to patch (0, 0).
        let field = HeightField::from_fn(16, 16, |row, col| if (row, col) == (8, 3) { 2.0 } else { 0.0 })
            .unwrap();
        let pyramid = RoughnessPyramid::build(&field, 8);
        let level0 = pyramid.level(0).unwrap();
        assert_eq!(level0[[1, 0]], 1.0);
        // Sample (7, 3) sees the spike as a neighbor: |(0 + 2) / 2 - 0| = 1, half of the spike's own deviation.
        assert_relative_eq!(level0[[0, 0]], 0.5);
    }

    #[test]
    fn non_square_terrain_reaches_a_single_patch() {
        let pyramid = RoughnessPyramid::build(&bumpy_field(16, 64), 8);
        let dims: Vec<_> = pyramid.levels().iter().map(|l| (l.rows(), l.cols())).collect();
        assert_eq!(dims, [(2, 8), (1, 4), (1, 2), (1, 1)]);
    }

    #[test]
    fn node_roughness_picks_matching_level() {
        let pyramid = RoughnessPyramid::build(&bumpy_field(64, 64), 8);
        assert_eq!(pyramid.node_roughness(8, 16, 8), pyramid.roughness(0, 1, 2).unwrap());
        assert_eq!(pyramid.node_roughness(32, 0, 32), pyramid.roughness(2, 1, 0).unwrap());
        // Bigger than the whole terrain clamps to the coarsest level.
        assert_eq!(pyramid.node_roughness(0, 0, 1024), pyramid.roughness(3, 0, 0).unwrap());
    }

    #[test]
    fn tiny_terrain_has_no_levels() {
        let pyramid = RoughnessPyramid::build(&bumpy_field(4, 4), 8);
        assert_eq!(pyramid.num_levels(), 0);
        assert_eq!(pyramid.node_roughness(0, 0, 4), 0.0);
    }

    #[test]
    fn zero_patch_size_builds_an_empty_pyramid() {
        let pyramid = RoughnessPyramid::build(&bumpy_field(64, 64), 0);
        assert_eq!(pyramid.num_levels(), 0);
        assert_eq!(pyramid.patch_size(), 0);
        assert_eq!(pyramid.node_roughness(0, 0, 32), 0.0);
    }
}
