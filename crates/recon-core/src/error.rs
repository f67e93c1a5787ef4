//! Error types for snapshot loading and field-layout interpretation.
//!
//! Split by phase: [`LoadError`] covers everything up to a fully
//! materialized snapshot, [`LayoutError`] covers the engine's positional
//! interpretation of an already-loaded snapshot.

use std::error::Error;
use std::fmt;
use std::io;

/// Errors raised while a backend produces a snapshot.
///
/// Any of these means no snapshot exists; the checks never run on
/// partially loaded data.
#[derive(Debug)]
pub enum LoadError {
    /// The underlying reader failed (missing file, permission, truncation).
    Io(io::Error),
    /// The file does not start with the expected magic bytes.
    InvalidMagic,
    /// The container format version is not supported by this build.
    UnsupportedVersion {
        /// The version found in the file.
        found: u8,
    },
    /// The container is structurally corrupt.
    Malformed {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The grid extents are not a valid 2-D or 3-D grid.
    InvalidDimensions {
        /// Raw x extent.
        nx: i32,
        /// Raw y extent.
        ny: i32,
        /// Raw z extent (`-1` marks a 2-D grid).
        nz: i32,
    },
    /// Two fields share the same name.
    DuplicateField {
        /// The repeated name.
        name: String,
    },
    /// The backend has no data for a field it listed.
    MissingField {
        /// The field that could not be read.
        name: String,
    },
    /// A field's data does not match the grid shape.
    ShapeMismatch {
        /// The offending field.
        name: String,
        /// Number of values implied by the grid.
        expected: usize,
        /// Number of values the backend returned.
        found: usize,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::InvalidMagic => write!(f, "invalid magic bytes (expected b\"RCPF\")"),
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported format version {found}")
            }
            Self::Malformed { detail } => write!(f, "malformed snapshot: {detail}"),
            Self::InvalidDimensions { nx, ny, nz } => {
                write!(f, "invalid grid dimensions ({nx}, {ny}, {nz})")
            }
            Self::DuplicateField { name } => write!(f, "duplicate field '{name}'"),
            Self::MissingField { name } => write!(f, "no data for field '{name}'"),
            Self::ShapeMismatch {
                name,
                expected,
                found,
            } => write!(
                f,
                "field '{name}' has {found} values, grid requires {expected}"
            ),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Errors raised when a loaded snapshot does not follow the fixed
/// field-ordering convention.
///
/// Fatal for the snapshot: reading an unrelated field by position would
/// produce a meaningless verdict.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    /// A layout-derived field position falls outside the field list.
    OffsetOutOfRange {
        /// Name of the logical role that was being resolved.
        role: String,
        /// The computed position.
        offset: usize,
        /// Number of fields in the snapshot.
        field_count: usize,
    },
    /// Two fields that are scanned in lockstep have different shapes.
    ShapeMismatch {
        /// Name of the first field.
        left: String,
        /// Name of the second field.
        right: String,
        /// Shape of the first field.
        left_shape: Vec<usize>,
        /// Shape of the second field.
        right_shape: Vec<usize>,
    },
    /// Strict layout checking found a field count other than the one the
    /// convention implies for this many species.
    FieldCountMismatch {
        /// Derived species count.
        species: usize,
        /// Field count the convention requires.
        expected: usize,
        /// Field count found in the snapshot.
        found: usize,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetOutOfRange {
                role,
                offset,
                field_count,
            } => write!(
                f,
                "{role} resolves to field {offset}, but the snapshot has only {field_count} fields"
            ),
            Self::ShapeMismatch {
                left,
                right,
                left_shape,
                right_shape,
            } => write!(
                f,
                "fields '{left}' {left_shape:?} and '{right}' {right_shape:?} differ in shape"
            ),
            Self::FieldCountMismatch {
                species,
                expected,
                found,
            } => write!(
                f,
                "{species} species require {expected} fields, snapshot has {found}"
            ),
        }
    }
}

impl Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_is_exposed_as_source() {
        let err = LoadError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn offset_error_names_role_and_bounds() {
        let err = LayoutError::OffsetOutOfRange {
            role: "enthalpy consistency".into(),
            offset: 10,
            field_count: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("enthalpy consistency"));
        assert!(msg.contains("10"));
        assert!(msg.contains("8"));
    }
}
