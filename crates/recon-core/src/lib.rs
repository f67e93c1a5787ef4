//! Core types and traits for the recon consistency checker.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions shared by the rest of the workspace:
//! grid dimensions and cell coordinates, dense per-field arrays, the
//! materialized [`Snapshot`], error types, and the backend traits that
//! decouple the consistency engine from any particular file format.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod grid;
pub mod snapshot;
pub mod traits;

pub use error::{LayoutError, LoadError};
pub use field::FieldArray;
pub use grid::{CellCoord, GridDims, Shape, NZ_2D_SENTINEL};
pub use snapshot::Snapshot;
pub use traits::{SnapshotBackend, SnapshotSource};
