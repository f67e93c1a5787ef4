//! Dense per-field numeric arrays.

use crate::grid::{CellCoord, Shape};

/// A dense array of `f64` values over the snapshot grid.
///
/// Stored with the last axis fastest, so linear traversal visits cells
/// x outer, y middle, z inner.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldArray {
    shape: Shape,
    data: Vec<f64>,
}

impl FieldArray {
    /// Wrap `data` with the given shape.
    ///
    /// Returns `None` if the number of values does not match the shape.
    pub fn new(shape: &[usize], data: Vec<f64>) -> Option<Self> {
        let expected = shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))?;
        if data.len() != expected {
            return None;
        }
        Some(Self {
            shape: shape.iter().copied().collect(),
            data,
        })
    }

    /// An array of the given shape filled with `value`.
    pub fn filled(shape: &[usize], value: f64) -> Self {
        let len = shape.iter().product();
        Self {
            shape: shape.iter().copied().collect(),
            data: vec![value; len],
        }
    }

    /// An array of the given shape filled with zeros.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Extents, outermost axis first.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the array holds no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The values in traversal order.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the values in traversal order.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Linear position of a cell, or `None` if out of bounds or of the
    /// wrong rank.
    pub fn linear_index(&self, coord: &[u32]) -> Option<usize> {
        if coord.len() != self.shape.len() {
            return None;
        }
        let mut idx = 0usize;
        for (&c, &extent) in coord.iter().zip(self.shape.iter()) {
            let c = c as usize;
            if c >= extent {
                return None;
            }
            idx = idx * extent + c;
        }
        Some(idx)
    }

    /// Coordinate of the cell at a linear position.
    ///
    /// Inverse of [`linear_index`](Self::linear_index); `index` must be
    /// less than [`len`](Self::len).
    pub fn coord_of(&self, index: usize) -> CellCoord {
        let mut rest = index;
        let mut coord: smallvec::SmallVec<[u32; 3]> = self.shape.iter().map(|_| 0).collect();
        for (slot, &extent) in coord.iter_mut().zip(self.shape.iter()).rev() {
            *slot = (rest % extent) as u32;
            rest /= extent;
        }
        CellCoord(coord)
    }

    /// Value at a cell.
    pub fn get(&self, coord: &[u32]) -> Option<f64> {
        self.linear_index(coord).map(|i| self.data[i])
    }

    /// Mutable reference to a cell.
    pub fn get_mut(&mut self, coord: &[u32]) -> Option<&mut f64> {
        let i = self.linear_index(coord)?;
        self.data.get_mut(i)
    }
}
