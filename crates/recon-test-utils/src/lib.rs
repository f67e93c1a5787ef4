//! Test utilities and mock types for recon development.
//!
//! Provides a [`SnapshotBuilder`] that lays out fields the way the
//! reaction test writes them, a [`MockSource`] implementing
//! [`SnapshotSource`], and a [`MockBackend`] implementing
//! [`SnapshotBackend`] over an in-memory path table.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod builder;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use recon_core::{GridDims, LoadError, Snapshot, SnapshotBackend, SnapshotSource};

pub use builder::{
    conforming_field_names, enthalpy_err_name, external_heating_name, new_fraction_name,
    nuclear_heating_name, old_fraction_name, omegadot_err_name, SnapshotBuilder, PREFIX_NAMES,
};

/// Mock implementation of [`SnapshotSource`].
///
/// Serves the contents of a [`Snapshot`], optionally padding names the
/// way fixed-width backends do, or failing on one field.
pub struct MockSource {
    dims: GridDims,
    names: Vec<String>,
    data: HashMap<String, Vec<f64>>,
    time: f64,
    fail_on: Option<String>,
    pad_names_to: Option<usize>,
}

impl MockSource {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let names: Vec<String> = snapshot.field_names().map(str::to_string).collect();
        let data = names
            .iter()
            .filter_map(|n| snapshot.field(n).map(|a| (n.clone(), a.as_slice().to_vec())))
            .collect();
        Self {
            dims: snapshot.dims(),
            names,
            data,
            time: snapshot.time(),
            fail_on: None,
            pad_names_to: None,
        }
    }

    /// Report [`LoadError::MissingField`] when `name` is requested.
    pub fn fail_on(mut self, name: impl Into<String>) -> Self {
        self.fail_on = Some(name.into());
        self
    }

    /// Pad every name with trailing spaces to `width` before handing it
    /// out raw; [`field_names`](SnapshotSource::field_names) still trims.
    pub fn pad_names_to(mut self, width: usize) -> Self {
        self.pad_names_to = Some(width);
        self
    }

    /// Names exactly as the simulated backend stores them.
    pub fn raw_names(&self) -> Vec<String> {
        match self.pad_names_to {
            Some(w) => self.names.iter().map(|n| format!("{n:<w$}")).collect(),
            None => self.names.clone(),
        }
    }
}

impl SnapshotSource for MockSource {
    fn dimensions(&self) -> Result<(i32, i32, i32), LoadError> {
        Ok(self.dims.to_raw())
    }

    fn field_count(&self) -> Result<usize, LoadError> {
        Ok(self.names.len())
    }

    fn field_names(&self, count: usize) -> Result<Vec<String>, LoadError> {
        Ok(self
            .raw_names()
            .into_iter()
            .take(count)
            .map(|n| n.trim().to_string())
            .collect())
    }

    fn field_array(&self, name: &str, _shape: &[usize]) -> Result<Vec<f64>, LoadError> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(LoadError::MissingField { name: name.into() });
        }
        self.data
            .get(name)
            .cloned()
            .ok_or_else(|| LoadError::MissingField { name: name.into() })
    }

    fn time(&self) -> Result<f64, LoadError> {
        Ok(self.time)
    }
}

/// What a [`MockBackend`] returns for a registered path.
#[derive(Clone, Debug)]
pub enum MockEntry {
    Snapshot(Snapshot),
    /// Behave as if the file does not exist.
    Missing,
    /// Behave as if the file is corrupt.
    Corrupt(String),
}

/// Mock implementation of [`SnapshotBackend`].
///
/// Unregistered paths behave as missing files. Every `open` call is
/// recorded so tests can assert which files a driver touched.
#[derive(Default)]
pub struct MockBackend {
    entries: HashMap<PathBuf, MockEntry>,
    opened: Mutex<Vec<PathBuf>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, path: impl Into<PathBuf>, snapshot: Snapshot) -> Self {
        self.entries
            .insert(path.into(), MockEntry::Snapshot(snapshot));
        self
    }

    pub fn with_entry(mut self, path: impl Into<PathBuf>, entry: MockEntry) -> Self {
        self.entries.insert(path.into(), entry);
        self
    }

    /// Paths passed to `open`, in call order.
    pub fn opened(&self) -> Vec<PathBuf> {
        self.opened
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl SnapshotBackend for MockBackend {
    fn open(&self, path: &Path) -> Result<Snapshot, LoadError> {
        if let Ok(mut opened) = self.opened.lock() {
            opened.push(path.to_path_buf());
        }
        match self.entries.get(path) {
            Some(MockEntry::Snapshot(s)) => Ok(s.clone()),
            Some(MockEntry::Corrupt(detail)) => Err(LoadError::Malformed {
                detail: detail.clone(),
            }),
            Some(MockEntry::Missing) | None => Err(LoadError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))),
        }
    }
}
