//! Check results and the per-snapshot report.

use recon_core::CellCoord;

use crate::scan::ScanSummary;

/// What kind of rule a violating cell broke; selects the example message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// A consistency value exceeded its tolerance.
    Tolerance,
    /// Nuclear heating was nonzero with burning disabled.
    Burn,
    /// External heating was nonzero with heating disabled.
    Heat,
}

impl ViolationKind {
    /// Example message naming the violating cell.
    pub fn message(self, cell: &CellCoord) -> String {
        match self {
            Self::Tolerance => format!("ERROR: Cell {cell} exceeds tolerance."),
            Self::Burn => format!("BURN ERROR: Cell {cell} is not 0.0."),
            Self::Heat => format!("HEAT ERROR: Cell {cell} is not 0.0."),
        }
    }
}

/// Outcome of one check over one field.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckResult {
    /// Label the result is reported under.
    pub label: String,
    /// Full name of the scanned field.
    pub field_name: String,
    /// Position of the scanned field.
    pub field_index: usize,
    /// `true` if no cell violated the rule.
    pub passed: bool,
    /// Message naming the first violating cell.
    pub example: Option<String>,
    /// The first violating cell in traversal order.
    pub first_violation: Option<CellCoord>,
    /// Number of violating cells.
    pub violations: usize,
    /// Largest value seen (raw or magnitude, per the comparison mode).
    pub max_observed: f64,
}

impl CheckResult {
    pub(crate) fn from_summary(
        label: impl Into<String>,
        field_name: &str,
        field_index: usize,
        kind: ViolationKind,
        summary: ScanSummary,
    ) -> Self {
        Self {
            label: label.into(),
            field_name: field_name.to_string(),
            field_index,
            passed: summary.passed(),
            example: summary.first_violation.as_ref().map(|c| kind.message(c)),
            first_violation: summary.first_violation,
            violations: summary.violations,
            max_observed: summary.max_observed,
        }
    }

    /// The example message, or `""` when the check passed.
    pub fn example_message(&self) -> &str {
        self.example.as_deref().unwrap_or("")
    }
}

/// Results of the heating gating check.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatingResults {
    /// Nuclear heating, gated by burning.
    pub nuclear: CheckResult,
    /// External heating, gated by heating.
    pub external: CheckResult,
}

/// Every check result for one snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotReport {
    /// Snapshot timestamp.
    pub time: f64,
    /// Derived species count.
    pub species_count: usize,
    /// One result per species, in species order.
    pub mass_fractions: Vec<CheckResult>,
    /// Enthalpy balance.
    pub enthalpy: CheckResult,
    /// Heating gating.
    pub heating: HeatingResults,
}

impl SnapshotReport {
    /// All results in report order.
    pub fn results(&self) -> impl Iterator<Item = &CheckResult> + '_ {
        self.mass_fractions
            .iter()
            .chain(std::iter::once(&self.enthalpy))
            .chain([&self.heating.nuclear, &self.heating.external])
    }

    /// Results that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> + '_ {
        self.results().filter(|r| !r.passed)
    }

    /// `true` if every check passed.
    pub fn passed(&self) -> bool {
        self.results().all(|r| r.passed)
    }
}
