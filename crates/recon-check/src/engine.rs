//! The [`ConsistencyEngine`].

use recon_core::{FieldArray, LayoutError, Snapshot};

use crate::config::CheckConfig;
use crate::layout::{FieldLayout, FieldRole};
use crate::result::{CheckResult, HeatingResults, SnapshotReport, ViolationKind};
use crate::scan::{scan_tolerance, Comparison, ScanAccumulator};
use crate::species::{derive_species_count, species_label};

/// Runs the reaction consistency checks over one snapshot.
///
/// The species count is derived once at construction and fixes the
/// field layout for the engine's lifetime. Checks only read the
/// snapshot and may run any number of times in any order.
///
/// # Examples
///
/// ```
/// use recon_check::ConsistencyEngine;
/// use recon_test_utils::SnapshotBuilder;
///
/// let snapshot = SnapshotBuilder::cube(2, &["He4", "C12"])
///     .omegadot_err("C12", &[1, 1, 0], 3e-17)
///     .build();
/// let engine = ConsistencyEngine::new(snapshot);
/// assert_eq!(engine.species_count(), 2);
///
/// let results = engine.check_mass_fraction_balance(1.1e-17).unwrap();
/// assert!(results[0].passed);
/// assert!(!results[1].passed);
/// assert_eq!(results[1].label, "C12");
/// assert_eq!(results[1].max_observed, 3e-17);
/// ```
#[derive(Clone, Debug)]
pub struct ConsistencyEngine {
    snapshot: Snapshot,
    layout: FieldLayout,
    comparison: Comparison,
}

impl ConsistencyEngine {
    /// Wrap a snapshot, deriving its species count and layout.
    pub fn new(snapshot: Snapshot) -> Self {
        let species = derive_species_count(snapshot.field_names());
        Self {
            snapshot,
            layout: FieldLayout::new(species),
            comparison: Comparison::Literal,
        }
    }

    /// Like [`new`](Self::new), but reject snapshots whose field count is
    /// not exactly the one the layout implies.
    pub fn strict(snapshot: Snapshot) -> Result<Self, LayoutError> {
        let engine = Self::new(snapshot);
        let found = engine.snapshot.field_count();
        if !engine.layout.conforms(found) {
            return Err(LayoutError::FieldCountMismatch {
                species: engine.layout.species_count(),
                expected: engine.layout.expected_field_count(),
                found,
            });
        }
        Ok(engine)
    }

    /// Build with the layout strictness and comparison mode of `config`.
    pub fn from_config(snapshot: Snapshot, config: &CheckConfig) -> Result<Self, LayoutError> {
        let engine = if config.strict_layout {
            Self::strict(snapshot)?
        } else {
            Self::new(snapshot)
        };
        Ok(engine.with_comparison(config.comparison))
    }

    /// Switch the comparison mode.
    pub fn with_comparison(mut self, comparison: Comparison) -> Self {
        self.comparison = comparison;
        self
    }

    /// The wrapped snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Number of species derived from the field names.
    pub fn species_count(&self) -> usize {
        self.layout.species_count()
    }

    /// The layout derived from the species count.
    pub fn layout(&self) -> FieldLayout {
        self.layout
    }

    /// The active comparison mode.
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    fn field(&self, role: FieldRole) -> Result<(usize, &str, &FieldArray), LayoutError> {
        let index = self.layout.resolve(role, self.snapshot.field_count())?;
        let (name, array) =
            self.snapshot
                .field_at(index)
                .ok_or_else(|| LayoutError::OffsetOutOfRange {
                    role: role.to_string(),
                    offset: index,
                    field_count: self.snapshot.field_count(),
                })?;
        Ok((index, name, array))
    }

    /// Check `omegadot * dt` against the change in mass fraction for every
    /// species.
    ///
    /// A cell fails when its consistency value exceeds `tolerance`. Returns
    /// one result per species in species order; empty when there are no
    /// species. All species offsets are resolved before any scan runs.
    pub fn check_mass_fraction_balance(
        &self,
        tolerance: f64,
    ) -> Result<Vec<CheckResult>, LayoutError> {
        let fields = (0..self.species_count())
            .map(|s| self.field(FieldRole::OmegadotConsistency(s)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(fields
            .into_iter()
            .map(|(index, name, array)| {
                let summary = scan_tolerance(array, tolerance, self.comparison);
                CheckResult::from_summary(
                    species_label(name),
                    name,
                    index,
                    ViolationKind::Tolerance,
                    summary,
                )
            })
            .collect())
    }

    /// Check `h_new` against `h_old + (H_nuc + H_ext) * dt`.
    pub fn check_enthalpy_balance(&self, tolerance: f64) -> Result<CheckResult, LayoutError> {
        let (index, name, array) = self.field(FieldRole::EnthalpyConsistency)?;
        let summary = scan_tolerance(array, tolerance, self.comparison);
        Ok(CheckResult::from_summary(
            name,
            name,
            index,
            ViolationKind::Tolerance,
            summary,
        ))
    }

    /// Check that heating sources are exactly zero when their process is
    /// disabled.
    ///
    /// Both fields are scanned in lockstep. The gates only decide
    /// `passed`; the max value is tracked either way.
    pub fn check_heating_gating(
        &self,
        heating_enabled: bool,
        burning_enabled: bool,
    ) -> Result<HeatingResults, LayoutError> {
        let (nuc_index, nuc_name, nuc) = self.field(FieldRole::NuclearHeating)?;
        let (ext_index, ext_name, ext) = self.field(FieldRole::ExternalHeating)?;
        if nuc.shape() != ext.shape() {
            return Err(LayoutError::ShapeMismatch {
                left: nuc_name.to_string(),
                right: ext_name.to_string(),
                left_shape: nuc.shape().to_vec(),
                right_shape: ext.shape().to_vec(),
            });
        }

        let mut nuc_acc = ScanAccumulator::new();
        let mut ext_acc = ScanAccumulator::new();
        for (i, (&n, &e)) in nuc.as_slice().iter().zip(ext.as_slice()).enumerate() {
            nuc_acc.observe(i, !burning_enabled && n != 0.0, self.comparison.tracked(n));
            ext_acc.observe(i, !heating_enabled && e != 0.0, self.comparison.tracked(e));
        }

        Ok(HeatingResults {
            nuclear: CheckResult::from_summary(
                nuc_name,
                nuc_name,
                nuc_index,
                ViolationKind::Burn,
                nuc_acc.finish(nuc),
            ),
            external: CheckResult::from_summary(
                ext_name,
                ext_name,
                ext_index,
                ViolationKind::Heat,
                ext_acc.finish(ext),
            ),
        })
    }

    /// Run all three checks with the tolerances and gates of `config`.
    ///
    /// The comparison mode is the engine's own; build the engine with
    /// [`from_config`](Self::from_config) to take it from `config` too.
    pub fn run(&self, config: &CheckConfig) -> Result<SnapshotReport, LayoutError> {
        Ok(SnapshotReport {
            time: self.snapshot.time(),
            species_count: self.species_count(),
            mass_fractions: self.check_mass_fraction_balance(config.omegadot_tolerance)?,
            enthalpy: self.check_enthalpy_balance(config.enthalpy_tolerance)?,
            heating: self.check_heating_gating(config.heating_enabled, config.burning_enabled)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_core::{CellCoord, FieldArray, GridDims};
    use recon_test_utils::SnapshotBuilder;

    const TOL: f64 = 1.1e-17;

    #[test]
    fn zero_species_yields_no_mass_fraction_results() {
        let engine = ConsistencyEngine::new(SnapshotBuilder::cube(2, &[]).build());
        assert_eq!(engine.species_count(), 0);
        assert!(engine.check_mass_fraction_balance(TOL).unwrap().is_empty());
    }

    #[test]
    fn zero_species_on_tiny_snapshot_never_indexes() {
        let dims = GridDims::new_3d(1, 1, 1).unwrap();
        let snap = Snapshot::from_parts(
            dims,
            vec![("density".to_string(), FieldArray::zeros(&[1, 1, 1]))],
            0.0,
        )
        .unwrap();
        let engine = ConsistencyEngine::new(snap);
        assert!(engine.check_mass_fraction_balance(TOL).unwrap().is_empty());
        assert!(engine.check_enthalpy_balance(100.0).is_err());
    }

    #[test]
    fn all_zero_consistency_passes() {
        let engine =
            ConsistencyEngine::new(SnapshotBuilder::cube(3, &["He4", "C12", "O16"]).build());
        let results = engine.check_mass_fraction_balance(TOL).unwrap();
        assert_eq!(results.len(), 3);
        for r in &results {
            assert!(r.passed, "{}", r.label);
            assert_eq!(r.max_observed, 0.0);
            assert_eq!(r.example, None);
        }
        let labels: Vec<_> = results.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["He4", "C12", "O16"]);
    }

    #[test]
    fn single_cell_over_tolerance() {
        let bad = TOL + 1e-18;
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(3, &["He4", "C12"])
                .omegadot_err("He4", &[2, 0, 1], bad)
                .build(),
        );
        let results = engine.check_mass_fraction_balance(TOL).unwrap();
        let he4 = &results[0];
        assert!(!he4.passed);
        assert_eq!(he4.max_observed, bad);
        assert_eq!(he4.violations, 1);
        assert_eq!(he4.first_violation, Some(CellCoord::from([2, 0, 1])));
        assert_eq!(he4.example_message(), "ERROR: Cell (2, 0, 1) exceeds tolerance.");
        assert!(results[1].passed);
    }

    #[test]
    fn mass_fraction_field_index_follows_layout() {
        let engine = ConsistencyEngine::new(SnapshotBuilder::cube(1, &["He4", "C12"]).build());
        let results = engine.check_mass_fraction_balance(TOL).unwrap();
        assert_eq!(results[0].field_index, 11);
        assert_eq!(results[1].field_index, 12);
        assert_eq!(results[1].field_name, "C12 wdot_err");
    }

    #[test]
    fn enthalpy_check_reports_first_cell() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["C12"])
                .enthalpy_err(&[1, 1, 1], 500.0)
                .enthalpy_err(&[0, 1, 0], 150.0)
                .build(),
        );
        let r = engine.check_enthalpy_balance(100.0).unwrap();
        assert!(!r.passed);
        assert_eq!(r.violations, 2);
        assert_eq!(r.max_observed, 500.0);
        assert_eq!(r.example_message(), "ERROR: Cell (0, 1, 0) exceeds tolerance.");
        assert_eq!(r.label, "h_err");
    }

    #[test]
    fn enthalpy_negative_only_reports_zero_max() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["C12"])
                .fill("h_err", -1e6)
                .build(),
        );
        let r = engine.check_enthalpy_balance(100.0).unwrap();
        assert!(r.passed);
        assert_eq!(r.max_observed, 0.0);
    }

    #[test]
    fn magnitude_mode_flags_negative_enthalpy() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["C12"])
                .enthalpy_err(&[0, 0, 1], -1e6)
                .build(),
        )
        .with_comparison(Comparison::Magnitude);
        let r = engine.check_enthalpy_balance(100.0).unwrap();
        assert!(!r.passed);
        assert_eq!(r.max_observed, 1e6);
    }

    #[test]
    fn magnitude_mode_tracks_heating_magnitude() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["C12"])
                .nuclear_heating(&[1, 0, 1], -3.0)
                .external_heating(&[0, 1, 0], -7.0)
                .build(),
        )
        .with_comparison(Comparison::Magnitude);

        let h = engine.check_heating_gating(true, true).unwrap();
        assert!(h.nuclear.passed);
        assert!(h.external.passed);
        assert_eq!(h.nuclear.max_observed, 3.0);
        assert_eq!(h.external.max_observed, 7.0);

        let gated = engine.check_heating_gating(false, false).unwrap();
        assert_eq!(
            gated.nuclear.example_message(),
            "BURN ERROR: Cell (1, 0, 1) is not 0.0."
        );
        assert_eq!(
            gated.external.example_message(),
            "HEAT ERROR: Cell (0, 1, 0) is not 0.0."
        );
    }

    #[test]
    fn heating_gating_external_disabled() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["C12"])
                .external_heating(&[0, 1, 1], 2.5)
                .build(),
        );
        let h = engine.check_heating_gating(false, true).unwrap();
        assert!(h.nuclear.passed);
        assert!(!h.external.passed);
        assert_eq!(h.external.max_observed, 2.5);
        assert_eq!(h.external.example_message(), "HEAT ERROR: Cell (0, 1, 1) is not 0.0.");
        assert_eq!(h.nuclear.max_observed, 0.0);
    }

    #[test]
    fn heating_gating_burning_disabled_flags_negative_heating() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["C12"])
                .nuclear_heating(&[1, 0, 0], -3.0)
                .build(),
        );
        let h = engine.check_heating_gating(true, false).unwrap();
        assert!(!h.nuclear.passed);
        assert_eq!(h.nuclear.example_message(), "BURN ERROR: Cell (1, 0, 0) is not 0.0.");
        // Literal max tracking never reports the negative value.
        assert_eq!(h.nuclear.max_observed, 0.0);
        assert!(h.external.passed);
    }

    #[test]
    fn heating_enabled_tracks_max_without_failing() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["C12"])
                .fill("H_nuc", 1e12)
                .nuclear_heating(&[1, 1, 0], 4e12)
                .fill("H_ext", 7.0)
                .build(),
        );
        let h = engine.check_heating_gating(true, true).unwrap();
        assert!(h.nuclear.passed);
        assert!(h.external.passed);
        assert_eq!(h.nuclear.max_observed, 4e12);
        assert_eq!(h.external.max_observed, 7.0);
    }

    #[test]
    fn checks_are_idempotent() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["He4"])
                .omegadot_err("He4", &[0, 0, 0], 1.0)
                .build(),
        );
        let first = engine.run(&CheckConfig::default()).unwrap();
        let second = engine.run(&CheckConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn truncated_snapshot_is_a_layout_error() {
        let snap = SnapshotBuilder::cube(1, &["He4", "C12"]).truncate(2).build();
        let engine = ConsistencyEngine::new(snap);
        let err = engine.check_mass_fraction_balance(TOL).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::OffsetOutOfRange { offset: 12, field_count: 12, .. }
        ));
        assert!(engine.check_enthalpy_balance(100.0).is_err());
        assert!(engine.check_heating_gating(false, true).is_ok());
    }

    #[test]
    fn strict_rejects_extra_fields() {
        let snap = SnapshotBuilder::cube(1, &["He4"]).push_field("extra").build();
        assert!(ConsistencyEngine::new(snap.clone()).run(&CheckConfig::default()).is_ok());
        assert_eq!(
            ConsistencyEngine::strict(snap).unwrap_err(),
            LayoutError::FieldCountMismatch {
                species: 1,
                expected: 11,
                found: 12,
            }
        );
    }

    #[test]
    fn from_config_applies_comparison_and_strictness() {
        let config = CheckConfig {
            comparison: Comparison::Magnitude,
            strict_layout: true,
            ..CheckConfig::default()
        };
        let engine =
            ConsistencyEngine::from_config(SnapshotBuilder::cube(1, &["He4"]).build(), &config)
                .unwrap();
        assert_eq!(engine.comparison(), Comparison::Magnitude);
    }

    #[test]
    fn two_dimensional_snapshot() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::plane(3, 4, &["He4"])
                .omegadot_err("He4", &[2, 3], 1.0)
                .build(),
        );
        let r = &engine.check_mass_fraction_balance(TOL).unwrap()[0];
        assert_eq!(r.example_message(), "ERROR: Cell (2, 3) exceeds tolerance.");
    }

    #[test]
    fn run_collects_everything() {
        let engine = ConsistencyEngine::new(
            SnapshotBuilder::cube(2, &["He4", "C12"]).time(3.5).build(),
        );
        let report = engine.run(&CheckConfig::default()).unwrap();
        assert_eq!(report.time, 3.5);
        assert_eq!(report.species_count, 2);
        assert_eq!(report.results().count(), 5);
        assert!(report.passed());
        assert_eq!(report.failures().count(), 0);
    }
}
