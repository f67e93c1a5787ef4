//! Synthetic snapshots laid out like reaction-test output.
//!
//! Positions, with `N` species:
//!
//! ```text
//! 0..4           density, rhoh, h, tfromp
//! 4..4+N         X_<sp>          new mass fractions
//! 4+N..4+2N      Xold_<sp>       old mass fractions
//! 4+2N           H_nuc
//! 5+2N           rho_Hnuc
//! 6+2N           H_ext
//! 7+2N..7+3N     <sp> wdot_err   omegadot * dt - dX
//! 7+3N           h_err           h_new - (h_old + (H_nuc + H_ext) * dt)
//! ```

use indexmap::IndexMap;
use recon_core::{FieldArray, GridDims, Snapshot};

/// Non-species fields that precede the species blocks.
pub const PREFIX_NAMES: [&str; 4] = ["density", "rhoh", "h", "tfromp"];

pub fn new_fraction_name(species: &str) -> String {
    format!("X_{species}")
}

pub fn old_fraction_name(species: &str) -> String {
    format!("Xold_{species}")
}

pub fn omegadot_err_name(species: &str) -> String {
    format!("{species} wdot_err")
}

pub fn nuclear_heating_name() -> String {
    "H_nuc".to_string()
}

pub fn external_heating_name() -> String {
    "H_ext".to_string()
}

pub fn enthalpy_err_name() -> String {
    "h_err".to_string()
}

/// Field names in conforming order for the given species.
pub fn conforming_field_names(species: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = PREFIX_NAMES.iter().map(|s| s.to_string()).collect();
    names.extend(species.iter().map(|s| new_fraction_name(s)));
    names.extend(species.iter().map(|s| old_fraction_name(s)));
    names.push(nuclear_heating_name());
    names.push("rho_Hnuc".to_string());
    names.push(external_heating_name());
    names.extend(species.iter().map(|s| omegadot_err_name(s)));
    names.push(enthalpy_err_name());
    names
}

/// Builds a conforming snapshot with every field zeroed, then lets the
/// test inject values.
///
/// Setters panic on unknown field names or out-of-range cells; this is
/// test scaffolding.
pub struct SnapshotBuilder {
    dims: GridDims,
    time: f64,
    fields: IndexMap<String, FieldArray>,
}

impl SnapshotBuilder {
    pub fn new(dims: GridDims, species: &[&str]) -> Self {
        let shape = dims.shape();
        let fields = conforming_field_names(species)
            .into_iter()
            .map(|n| (n, FieldArray::zeros(&shape)))
            .collect();
        Self {
            dims,
            time: 0.0,
            fields,
        }
    }

    /// An `n x n x n` grid.
    pub fn cube(n: u32, species: &[&str]) -> Self {
        let dims = GridDims::new_3d(n, n, n).expect("cube extent must be positive");
        Self::new(dims, species)
    }

    /// A 2-D `nx x ny` grid.
    pub fn plane(nx: u32, ny: u32, species: &[&str]) -> Self {
        let dims = GridDims::new_2d(nx, ny).expect("plane extents must be positive");
        Self::new(dims, species)
    }

    pub fn time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    /// Set one cell of a field.
    pub fn set(mut self, name: &str, coord: &[u32], value: f64) -> Self {
        let array = self
            .fields
            .get_mut(name)
            .unwrap_or_else(|| panic!("no field named '{name}'"));
        *array
            .get_mut(coord)
            .unwrap_or_else(|| panic!("cell {coord:?} out of range for '{name}'")) = value;
        self
    }

    /// Fill every cell of a field.
    pub fn fill(mut self, name: &str, value: f64) -> Self {
        let array = self
            .fields
            .get_mut(name)
            .unwrap_or_else(|| panic!("no field named '{name}'"));
        array.as_mut_slice().fill(value);
        self
    }

    pub fn omegadot_err(self, species: &str, coord: &[u32], value: f64) -> Self {
        self.set(&omegadot_err_name(species), coord, value)
    }

    pub fn enthalpy_err(self, coord: &[u32], value: f64) -> Self {
        self.set(&enthalpy_err_name(), coord, value)
    }

    pub fn nuclear_heating(self, coord: &[u32], value: f64) -> Self {
        self.set(&nuclear_heating_name(), coord, value)
    }

    pub fn external_heating(self, coord: &[u32], value: f64) -> Self {
        self.set(&external_heating_name(), coord, value)
    }

    /// Append an extra trailing field, breaking conformance.
    pub fn push_field(mut self, name: &str) -> Self {
        let shape = self.dims.shape();
        self.fields
            .insert(name.to_string(), FieldArray::zeros(&shape));
        self
    }

    /// Drop the last `n` fields, breaking conformance.
    pub fn truncate(mut self, n: usize) -> Self {
        let keep = self.fields.len().saturating_sub(n);
        self.fields.truncate(keep);
        self
    }

    pub fn build(self) -> Snapshot {
        Snapshot::from_parts(self.dims, self.fields, self.time)
            .expect("builder fields always match the grid")
    }
}
