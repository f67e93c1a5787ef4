//! Reaction consistency engine.
//!
//! Interprets a snapshot's flat field list through a fixed positional
//! [`FieldLayout`], then runs three per-cell checks:
//!
//! - **mass-fraction balance**: `omegadot * dt` matches the change in each
//!   species' mass fraction;
//! - **enthalpy balance**: `h_new` matches `h_old + (H_nuc + H_ext) * dt`;
//! - **heating gating**: `H_nuc` / `H_ext` are exactly zero when burning /
//!   heating is disabled.
//!
//! Each check reduces a field to a [`CheckResult`]: pass/fail, the first
//! violating cell, and the maximum observed value. [`Comparison`] selects
//! between the literal signed comparison and a magnitude comparison.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod engine;
pub mod layout;
pub mod result;
pub mod scan;
pub mod species;

pub use config::{
    CheckConfig, ConfigError, DEFAULT_ENTHALPY_TOLERANCE, DEFAULT_OMEGADOT_TOLERANCE,
};
pub use engine::ConsistencyEngine;
pub use layout::{FieldLayout, FieldRole, PREFIX_FIELD_COUNT};
pub use result::{CheckResult, HeatingResults, SnapshotReport, ViolationKind};
pub use scan::{scan_tolerance, Comparison, ScanSummary};
pub use species::{derive_species_count, species_label, SPECIES_PREFIX};
