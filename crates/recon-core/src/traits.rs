//! Backend abstraction traits for snapshot reading.

use std::path::Path;

use crate::error::LoadError;
use crate::snapshot::Snapshot;

/// Low-level access to one snapshot's contents.
///
/// This is the accessor contract a format backend fulfils. The engine
/// never talks to it directly: [`Snapshot::materialize`] pulls every
/// field through it up front, so no check ever sees partial data.
pub trait SnapshotSource {
    /// Raw grid extents `(nx, ny, nz)`; `nz == -1` means 2-D.
    fn dimensions(&self) -> Result<(i32, i32, i32), LoadError>;

    /// Number of named data fields.
    fn field_count(&self) -> Result<usize, LoadError>;

    /// The first `count` field names in positional order, trimmed of
    /// any padding.
    fn field_names(&self, count: usize) -> Result<Vec<String>, LoadError>;

    /// Dense values for one field, last axis fastest.
    ///
    /// `shape` is the grid shape the caller expects; a backend may use it
    /// to size buffers or reject mismatched data.
    fn field_array(&self, name: &str, shape: &[usize]) -> Result<Vec<f64>, LoadError>;

    /// Snapshot timestamp.
    fn time(&self) -> Result<f64, LoadError>;
}

/// Opens snapshot files by path.
///
/// One implementation per storage format. `Send + Sync` so a single
/// backend can serve a pool of batch workers.
pub trait SnapshotBackend: Send + Sync {
    /// Load and fully materialize the snapshot at `path`.
    fn open(&self, path: &Path) -> Result<Snapshot, LoadError>;
}
