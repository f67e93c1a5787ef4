//! Binary plotfile backend for recon snapshots.
//!
//! Reads and writes a self-describing container holding one snapshot:
//! grid extents, timestamp, fixed-width field names, and dense `f64`
//! field data.
//!
//! # Architecture
//!
//! - [`PlotfileReader`] decodes from any `Read` source into a [`Plotfile`]
//! - [`Plotfile`] implements [`SnapshotSource`](recon_core::SnapshotSource)
//! - [`PlotfileBackend`] implements [`SnapshotBackend`](recon_core::SnapshotBackend)
//!   over files on disk
//! - [`PlotfileWriter`] encodes to any `Write` sink, used to fabricate
//!   fixtures
//! - All I/O goes through a small hand-written codec (no serde dependency)
//!
//! # Format
//!
//! ```text
//! [MAGIC "RCPF"] [VERSION u8]
//! [time f64] [nx i32] [ny i32] [nz i32]     nz = -1 for 2-D
//! [ncomp u32] [ncomp x name: 20 bytes, space or NUL padded]
//! [ncomp x field: cells x f64, last axis fastest]
//! ```
//!
//! Integers and floats are little-endian. Nothing may follow the last
//! field.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod backend;
pub mod codec;
pub mod reader;
pub mod types;
pub mod writer;

pub use backend::{write_plotfile, PlotfileBackend};
pub use reader::{Plotfile, PlotfileReader};
pub use types::PlotfileHeader;
pub use writer::{write_snapshot, PlotfileWriter};

/// Magic bytes at the start of every plotfile.
pub const MAGIC: [u8; 4] = *b"RCPF";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

/// Width in bytes of a stored field name.
pub const NAME_WIDTH: usize = 20;
