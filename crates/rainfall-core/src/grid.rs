//! Square row-major matrices and the per-cell simulation state.
use serde::{Deserialize, Serialize};

/// An N×N matrix stored row-major in one contiguous buffer.
///
/// The dimension is fixed at construction, so accessors index directly and
/// panic on out-of-range coordinates rather than returning `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    /// Row-major values, length `size * size`.
    pub data: Vec<T>,
    pub size: usize,
}

impl<T: Copy> Matrix<T> {
    /// Create a `size × size` matrix filled with `fill`.
    pub fn filled(size: usize, fill: T) -> Self {
        Self { data: vec![fill; size * size], size }
    }

    /// Wrap an existing row-major buffer. Panics if the length is not `size²`.
    pub fn from_vec(size: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), size * size, "matrix buffer must hold size² values");
        Self { data, size }
    }

    /// Build from a closure evaluated at every `(row, col)`.
    pub fn from_fn(size: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let data = (0..size)
            .flat_map(|r| (0..size).map(move |c| (r, c)))
            .map(|(r, c)| f(r, c))
            .collect();
        Self { data, size }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        debug_assert!(row < self.size && col < self.size);
        self.data[row * self.size + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: T) {
        debug_assert!(row < self.size && col < self.size);
        self.data[row * self.size + col] = val;
    }

    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.size..(row + 1) * self.size]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks(self.size.max(1))
    }
}

impl Matrix<f32> {
    pub fn zeros(size: usize) -> Self {
        Self::filled(size, 0.0)
    }

    /// Sum of all cells, accumulated in f64.
    pub fn total(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum()
    }

    pub fn fill_zero(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
    }
}

/// Elevation plus the three mutable water layers of one simulation.
///
/// `elevation` never changes after construction. `current_rain`, `trickle_in`
/// and `absorbed` are mutated by the step engine and the merge phase.
#[derive(Debug, Clone)]
pub struct GridModel {
    pub elevation: Matrix<i32>,
    /// Unabsorbed water sitting on each cell.
    pub current_rain: Matrix<f32>,
    /// Outflow delivered to each cell this step by same-band neighbours.
    /// Writes from other bands go to the boundary lock table instead.
    pub trickle_in: Matrix<f32>,
    /// Cumulative absorbed water; the simulation output.
    pub absorbed: Matrix<f32>,
}

impl GridModel {
    pub fn new(elevation: Matrix<i32>) -> Self {
        let n = elevation.size;
        Self {
            elevation,
            current_rain: Matrix::zeros(n),
            trickle_in: Matrix::zeros(n),
            absorbed: Matrix::zeros(n),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.elevation.size
    }

    /// Fold this step's band-local trickle into `current_rain`, then zero it.
    pub fn merge_trickle(&mut self) {
        for (rain, inflow) in self.current_rain.data.iter_mut().zip(self.trickle_in.data.iter_mut()) {
            *rain += *inflow;
            *inflow = 0.0;
        }
    }

    /// True when no cell holds unabsorbed water.
    pub fn is_dry(&self) -> bool {
        self.current_rain.data.iter().all(|&v| v == 0.0)
    }
}
