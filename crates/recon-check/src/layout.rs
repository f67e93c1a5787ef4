//! The fixed positional field layout of reaction-test snapshots.
//!
//! Fields are not looked up by name. Every logical role sits at a
//! position computed from the species count `N`:
//!
//! | Role | Position |
//! |------|----------|
//! | non-species prefix (density, rhoh, h, tfromp) | `0..4` |
//! | new mass fractions | `4 + s` |
//! | old mass fractions | `4 + N + s` |
//! | nuclear heating | `4 + 2N` |
//! | density-weighted nuclear heating | `5 + 2N` |
//! | external heating | `6 + 2N` |
//! | omegadot consistency | `7 + 2N + s` |
//! | enthalpy consistency | `7 + 3N` |
//!
//! A conforming snapshot therefore has `8 + 3N` fields, with the
//! enthalpy consistency field last.

use std::fmt;

use recon_core::LayoutError;

/// Number of non-species fields ahead of the first species block.
pub const PREFIX_FIELD_COUNT: usize = 4;

const NEW_FRACTION_BASE: usize = PREFIX_FIELD_COUNT;
const NUCLEAR_HEATING_BASE: usize = PREFIX_FIELD_COUNT;
const NUCLEAR_HEATING_DENSITY_BASE: usize = PREFIX_FIELD_COUNT + 1;
const EXTERNAL_HEATING_BASE: usize = PREFIX_FIELD_COUNT + 2;
const OMEGADOT_BASE: usize = PREFIX_FIELD_COUNT + 3;
const ENTHALPY_BASE: usize = PREFIX_FIELD_COUNT + 3;

/// A logical field role in the layout.
///
/// Species-indexed roles carry the species index `s` in `[0, N)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// One of the non-species leading fields.
    Prefix(usize),
    /// Mass fraction after the burn step.
    NewMassFraction(usize),
    /// Mass fraction before the burn step.
    OldMassFraction(usize),
    /// Nuclear energy generation rate `H_nuc`.
    NuclearHeating,
    /// `rho * H_nuc`; carried by the format but not checked.
    NuclearHeatingDensity,
    /// External heating rate `H_ext`.
    ExternalHeating,
    /// `omegadot * dt - (X_new - X_old)` for one species.
    OmegadotConsistency(usize),
    /// `h_new - (h_old + (H_nuc + H_ext) * dt)`.
    EnthalpyConsistency,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix(i) => write!(f, "prefix field {i}"),
            Self::NewMassFraction(s) => write!(f, "new mass fraction of species {s}"),
            Self::OldMassFraction(s) => write!(f, "old mass fraction of species {s}"),
            Self::NuclearHeating => write!(f, "nuclear heating"),
            Self::NuclearHeatingDensity => write!(f, "density-weighted nuclear heating"),
            Self::ExternalHeating => write!(f, "external heating"),
            Self::OmegadotConsistency(s) => write!(f, "omegadot consistency of species {s}"),
            Self::EnthalpyConsistency => write!(f, "enthalpy consistency"),
        }
    }
}

/// Maps [`FieldRole`]s to field positions for a given species count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    species: usize,
}

impl FieldLayout {
    /// Layout for `species` species.
    pub const fn new(species: usize) -> Self {
        Self { species }
    }

    /// The species count the layout was built for.
    pub fn species_count(&self) -> usize {
        self.species
    }

    /// Position of a role.
    ///
    /// Species indices are not range checked here; an index `>= N` lands
    /// on a neighbouring block. Use [`resolve`](Self::resolve) to bound
    /// the result by the actual field count.
    pub fn offset(&self, role: FieldRole) -> usize {
        let n = self.species;
        match role {
            FieldRole::Prefix(i) => i,
            FieldRole::NewMassFraction(s) => NEW_FRACTION_BASE + s,
            FieldRole::OldMassFraction(s) => NEW_FRACTION_BASE + n + s,
            FieldRole::NuclearHeating => NUCLEAR_HEATING_BASE + 2 * n,
            FieldRole::NuclearHeatingDensity => NUCLEAR_HEATING_DENSITY_BASE + 2 * n,
            FieldRole::ExternalHeating => EXTERNAL_HEATING_BASE + 2 * n,
            FieldRole::OmegadotConsistency(s) => OMEGADOT_BASE + 2 * n + s,
            FieldRole::EnthalpyConsistency => ENTHALPY_BASE + 3 * n,
        }
    }

    /// Position of a role, checked against a snapshot's field count.
    pub fn resolve(&self, role: FieldRole, field_count: usize) -> Result<usize, LayoutError> {
        let offset = self.offset(role);
        if offset >= field_count {
            return Err(LayoutError::OffsetOutOfRange {
                role: role.to_string(),
                offset,
                field_count,
            });
        }
        Ok(offset)
    }

    /// Field count of a snapshot that follows the convention exactly.
    pub fn expected_field_count(&self) -> usize {
        ENTHALPY_BASE + 3 * self.species + 1
    }

    /// Whether a field count matches the convention.
    pub fn conforms(&self, field_count: usize) -> bool {
        field_count == self.expected_field_count()
    }

    /// Every role in positional order.
    pub fn roles(&self) -> impl Iterator<Item = FieldRole> {
        let n = self.species;
        (0..PREFIX_FIELD_COUNT)
            .map(FieldRole::Prefix)
            .chain((0..n).map(FieldRole::NewMassFraction))
            .chain((0..n).map(FieldRole::OldMassFraction))
            .chain([
                FieldRole::NuclearHeating,
                FieldRole::NuclearHeatingDensity,
                FieldRole::ExternalHeating,
            ])
            .chain((0..n).map(FieldRole::OmegadotConsistency))
            .chain(std::iter::once(FieldRole::EnthalpyConsistency))
    }

    /// The role occupying a position, if any.
    pub fn role_at(&self, index: usize) -> Option<FieldRole> {
        self.roles().nth(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn enthalpy_is_last_for_conforming_counts() {
        for n in [0usize, 1, 5] {
            let layout = FieldLayout::new(n);
            assert_eq!(
                layout.offset(FieldRole::EnthalpyConsistency),
                layout.expected_field_count() - 1,
                "species = {n}"
            );
            assert_eq!(layout.offset(FieldRole::EnthalpyConsistency), 7 + 3 * n);
        }
    }

    #[test]
    fn new_fraction_block_starts_after_prefix() {
        for n in [0usize, 1, 5] {
            let layout = FieldLayout::new(n);
            assert_eq!(layout.offset(FieldRole::NewMassFraction(0)), 4);
        }
    }

    #[test]
    fn heating_offsets() {
        let layout = FieldLayout::new(3);
        assert_eq!(layout.offset(FieldRole::NuclearHeating), 10);
        assert_eq!(layout.offset(FieldRole::NuclearHeatingDensity), 11);
        assert_eq!(layout.offset(FieldRole::ExternalHeating), 12);
        assert_eq!(layout.offset(FieldRole::OmegadotConsistency(0)), 13);
        assert_eq!(layout.offset(FieldRole::OmegadotConsistency(2)), 15);
        assert_eq!(layout.offset(FieldRole::EnthalpyConsistency), 16);
    }

    #[test]
    fn resolve_rejects_out_of_range() {
        let layout = FieldLayout::new(2);
        assert_eq!(layout.resolve(FieldRole::EnthalpyConsistency, 14), Ok(13));
        let err = layout
            .resolve(FieldRole::EnthalpyConsistency, 13)
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::OffsetOutOfRange {
                role: "enthalpy consistency".into(),
                offset: 13,
                field_count: 13,
            }
        );
    }

    #[test]
    fn role_at_inverts_offset() {
        let layout = FieldLayout::new(2);
        assert_eq!(layout.role_at(0), Some(FieldRole::Prefix(0)));
        assert_eq!(layout.role_at(5), Some(FieldRole::NewMassFraction(1)));
        assert_eq!(layout.role_at(6), Some(FieldRole::OldMassFraction(0)));
        assert_eq!(layout.role_at(13), Some(FieldRole::EnthalpyConsistency));
        assert_eq!(layout.role_at(14), None);
    }

    proptest! {
        #[test]
        fn roles_tile_positions_without_gaps(n in 0usize..40) {
            let layout = FieldLayout::new(n);
            let offsets: Vec<usize> = layout.roles().map(|r| layout.offset(r)).collect();
            let expected: Vec<usize> = (0..layout.expected_field_count()).collect();
            prop_assert_eq!(offsets, expected);
        }
    }
}
