//! Driver error type.

use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};

use recon_core::{LayoutError, LoadError};

/// A per-file failure that stops that file from being checked.
#[derive(Debug)]
pub enum ReconError {
    /// The backend could not load the snapshot.
    Load {
        /// File being processed.
        path: PathBuf,
        /// Underlying backend error.
        source: LoadError,
    },
    /// The snapshot does not fit the positional layout.
    Layout {
        /// File being processed.
        path: PathBuf,
        /// Underlying layout error.
        source: LayoutError,
    },
}

impl ReconError {
    /// The file the error belongs to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Load { path, .. } | Self::Layout { path, .. } => path,
        }
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, source } => {
                write!(f, "failed to load {}: {source}", path.display())
            }
            Self::Layout { path, source } => {
                write!(f, "layout error in {}: {source}", path.display())
            }
        }
    }
}

impl Error for ReconError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Load { source, .. } => Some(source),
            Self::Layout { source, .. } => Some(source),
        }
    }
}
