//! File-system backend.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use recon_core::{LoadError, Snapshot, SnapshotBackend};
use tracing::debug;

use crate::reader::PlotfileReader;
use crate::writer::write_snapshot;

/// Opens plotfiles from disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlotfileBackend;

impl PlotfileBackend {
    /// Create a backend.
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotBackend for PlotfileBackend {
    fn open(&self, path: &Path) -> Result<Snapshot, LoadError> {
        let file = File::open(path)?;
        let reader = PlotfileReader::open(BufReader::new(file))?;
        debug!(
            path = %path.display(),
            dims = %reader.header().dims,
            fields = reader.header().field_count(),
            time = reader.header().time,
            "decoded plotfile header"
        );
        reader.read_all()?.into_snapshot()
    }
}

/// Write `snapshot` to a new plotfile at `path`, replacing any existing file.
pub fn write_plotfile(path: &Path, snapshot: &Snapshot) -> Result<(), LoadError> {
    let file = File::create(path)?;
    write_snapshot(BufWriter::new(file), snapshot)?;
    debug!(path = %path.display(), fields = snapshot.field_count(), "wrote plotfile");
    Ok(())
}
