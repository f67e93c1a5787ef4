//! Batch driver for the reaction consistency checker.
//!
//! Opens each snapshot file through a [`SnapshotBackend`](recon_core::SnapshotBackend),
//! runs the [`recon_check`] engine over it, and renders a plain-text
//! report. Files can be processed on a worker pool; output order always
//! follows input order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod driver;
pub mod error;
pub mod parallel;
pub mod report;

pub use config::{FailurePolicy, ReportOptions, RunConfig};
pub use driver::{check_file, run_batch, BatchSummary};
pub use error::ReconError;
pub use report::write_report;
