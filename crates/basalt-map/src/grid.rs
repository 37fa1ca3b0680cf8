use ndshape::{RuntimeShape, Shape};
use std::ops::{Index, IndexMut};

/// A dense, row-major 2D array. Use [`Index`] and [`IndexMut`] to access values with `[row, col]` coordinates.
///
/// Linearization is delegated to an [`ndshape`] shape of `[cols, rows]`, so columns are the fastest-varying axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2<T> {
    rows: u32,
    cols: u32,
    values: Vec<T>,
}

impl<T> Grid2<T> {
    /// Returns `None` unless `values.len() == rows * cols`.
    pub fn from_values(rows: u32, cols: u32, values: Vec<T>) -> Option<Self> {
        (values.len() == rows as usize * cols as usize).then(|| Self { rows, cols, values })
    }

    pub fn from_fn(rows: u32, cols: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let shape = grid_shape(rows, cols);
        let values = (0..shape.size())
            .map(|i| {
                let [col, row] = shape.delinearize(i);
                f(row, col)
            })
            .collect();
        Self { rows, cols, values }
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn shape(&self) -> RuntimeShape<u32, 2> {
        grid_shape(self.rows, self.cols)
    }

    #[inline]
    pub fn linearize(&self, row: u32, col: u32) -> usize {
        self.shape().linearize([col, row]) as usize
    }

    pub fn get(&self, row: u32, col: u32) -> Option<&T> {
        (row < self.rows && col < self.cols).then(|| &self.values[self.linearize(row, col)])
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values
    }
}

#[inline]
fn grid_shape(rows: u32, cols: u32) -> RuntimeShape<u32, 2> {
    RuntimeShape::<u32, 2>::new([cols, rows])
}

impl<T> Index<[u32; 2]> for Grid2<T> {
    type Output = T;

    #[inline]
    fn index(&self, [row, col]: [u32; 2]) -> &Self::Output {
        debug_assert!(row < self.rows && col < self.cols);
        &self.values[self.linearize(row, col)]
    }
}

impl<T> IndexMut<[u32; 2]> for Grid2<T> {
    #[inline]
    fn index_mut(&mut self, [row, col]: [u32; 2]) -> &mut Self::Output {
        debug_assert!(row < self.rows && col < self.cols);
        let i = self.linearize(row, col);
        &mut self.values[i]
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
