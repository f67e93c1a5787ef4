//! Grid dimensions, array shapes, and the [`CellCoord`] type.

use smallvec::{smallvec, SmallVec};
use std::fmt;

use crate::error::LoadError;

/// Raw z extent that marks a 2-D snapshot.
pub const NZ_2D_SENTINEL: i32 = -1;

/// Extents of a dense field array, outermost axis first.
pub type Shape = SmallVec<[usize; 3]>;

/// Extents of a structured snapshot grid.
///
/// A 2-D grid has no z extent. Constructed from the raw `(nx, ny, nz)`
/// triple a backend reports, where `nz == -1` means 2-D.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridDims {
    nx: u32,
    ny: u32,
    nz: Option<u32>,
}

impl GridDims {
    /// A 3-D grid. Every extent must be at least 1.
    pub fn new_3d(nx: u32, ny: u32, nz: u32) -> Result<Self, LoadError> {
        Self::checked(nx, ny, Some(nz))
    }

    /// A 2-D grid. Both extents must be at least 1.
    pub fn new_2d(nx: u32, ny: u32) -> Result<Self, LoadError> {
        Self::checked(nx, ny, None)
    }

    /// Interpret a raw backend triple, honouring the 2-D sentinel.
    pub fn from_raw(nx: i32, ny: i32, nz: i32) -> Result<Self, LoadError> {
        let invalid = || LoadError::InvalidDimensions { nx, ny, nz };
        let x = u32::try_from(nx).map_err(|_| invalid())?;
        let y = u32::try_from(ny).map_err(|_| invalid())?;
        let z = if nz == NZ_2D_SENTINEL {
            None
        } else {
            Some(u32::try_from(nz).map_err(|_| invalid())?)
        };
        Self::checked(x, y, z).map_err(|_| invalid())
    }

    fn checked(nx: u32, ny: u32, nz: Option<u32>) -> Result<Self, LoadError> {
        let dims = Self { nx, ny, nz };
        let (rx, ry, rz) = dims.to_raw();
        let positive = nx >= 1 && ny >= 1 && nz.is_none_or(|z| z >= 1);
        let fits = nx <= i32::MAX as u32
            && ny <= i32::MAX as u32
            && nz.is_none_or(|z| z <= i32::MAX as u32);
        if !positive || !fits || dims.checked_cell_count().is_none() {
            return Err(LoadError::InvalidDimensions {
                nx: rx,
                ny: ry,
                nz: rz,
            });
        }
        Ok(dims)
    }

    /// The raw `(nx, ny, nz)` triple, with `nz == -1` for 2-D.
    pub fn to_raw(&self) -> (i32, i32, i32) {
        (
            self.nx as i32,
            self.ny as i32,
            self.nz.map_or(NZ_2D_SENTINEL, |z| z as i32),
        )
    }

    /// Number of cells along x.
    pub fn nx(&self) -> u32 {
        self.nx
    }

    /// Number of cells along y.
    pub fn ny(&self) -> u32 {
        self.ny
    }

    /// Number of cells along z, `None` for a 2-D grid.
    pub fn nz(&self) -> Option<u32> {
        self.nz
    }

    /// 2 or 3.
    pub fn spatial_rank(&self) -> usize {
        if self.nz.is_some() {
            3
        } else {
            2
        }
    }

    /// Array shape for fields on this grid (trailing axis omitted in 2-D).
    pub fn shape(&self) -> Shape {
        match self.nz {
            Some(z) => smallvec![self.nx as usize, self.ny as usize, z as usize],
            None => smallvec![self.nx as usize, self.ny as usize],
        }
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        // Construction guarantees the product fits.
        self.checked_cell_count().unwrap_or(0)
    }

    fn checked_cell_count(&self) -> Option<usize> {
        let xy = (self.nx as usize).checked_mul(self.ny as usize)?;
        match self.nz {
            Some(z) => xy.checked_mul(z as usize),
            None => Some(xy),
        }
    }
}

impl fmt::Display for GridDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nz {
            Some(z) => write!(f, "{}x{}x{}", self.nx, self.ny, z),
            None => write!(f, "{}x{}", self.nx, self.ny),
        }
    }
}

/// Index of one cell, outermost axis first.
///
/// Two components for 2-D grids, three for 3-D. Displays as
/// `(ix, iy, iz)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord(pub SmallVec<[u32; 3]>);

impl CellCoord {
    /// The coordinate components.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl From<[u32; 3]> for CellCoord {
    fn from(c: [u32; 3]) -> Self {
        Self(SmallVec::from_buf(c))
    }
}

impl From<[u32; 2]> for CellCoord {
    fn from(c: [u32; 2]) -> Self {
        Self(c.into_iter().collect())
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}
