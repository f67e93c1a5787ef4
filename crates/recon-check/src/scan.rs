//! Cell scan reduction.
//!
//! Every check visits each cell of a field once, in traversal order, and
//! reduces it to (any violation, first violating cell, violation count,
//! max tracked value). The running max starts at `0.0` and only grows on
//! a strictly greater tracked value, so NaN never becomes the max.

use recon_core::{CellCoord, FieldArray};

/// How cell values are compared against tolerances and tracked for the
/// reported maximum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Comparison {
    /// `value > tolerance`; max tracks the raw value. Large negative
    /// excursions are neither flagged nor reported.
    #[default]
    Literal,
    /// `|value| > tolerance` (NaN counts as exceeding); max tracks `|value|`.
    Magnitude,
}

impl Comparison {
    /// Whether `value` breaches `tolerance`.
    pub fn exceeds(self, value: f64, tolerance: f64) -> bool {
        match self {
            Self::Literal => value > tolerance,
            Self::Magnitude => value.is_nan() || value.abs() > tolerance,
        }
    }

    /// The quantity fed to max tracking.
    pub fn tracked(self, value: f64) -> f64 {
        match self {
            Self::Literal => value,
            Self::Magnitude => value.abs(),
        }
    }
}

/// Result of scanning one field.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanSummary {
    /// First violating cell in traversal order.
    pub first_violation: Option<CellCoord>,
    /// Number of violating cells.
    pub violations: usize,
    /// Largest tracked value, or `0.0` if none exceeded it.
    pub max_observed: f64,
}

impl ScanSummary {
    /// `true` if no cell violated.
    pub fn passed(&self) -> bool {
        self.violations == 0
    }
}

/// Incremental form of the reduction, for scanning several fields in
/// lockstep.
#[derive(Clone, Debug)]
pub(crate) struct ScanAccumulator {
    first_violation: Option<usize>,
    violations: usize,
    max_observed: f64,
}

impl ScanAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            first_violation: None,
            violations: 0,
            max_observed: 0.0,
        }
    }

    pub(crate) fn observe(&mut self, index: usize, violated: bool, tracked: f64) {
        if violated {
            self.violations += 1;
            if self.first_violation.is_none() {
                self.first_violation = Some(index);
            }
        }
        if tracked > self.max_observed {
            self.max_observed = tracked;
        }
    }

    pub(crate) fn finish(self, array: &FieldArray) -> ScanSummary {
        ScanSummary {
            first_violation: self.first_violation.map(|i| array.coord_of(i)),
            violations: self.violations,
            max_observed: self.max_observed,
        }
    }
}

/// Scan a field for cells exceeding `tolerance`.
pub fn scan_tolerance(array: &FieldArray, tolerance: f64, comparison: Comparison) -> ScanSummary {
    let mut acc = ScanAccumulator::new();
    for (i, &v) in array.as_slice().iter().enumerate() {
        acc.observe(i, comparison.exceeds(v, tolerance), comparison.tracked(v));
    }
    acc.finish(array)
}
