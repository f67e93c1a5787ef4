//! Species-count derivation.

/// Name prefix that marks a species mass-fraction field.
pub const SPECIES_PREFIX: &str = "X_";

/// Count the fields whose name starts with [`SPECIES_PREFIX`].
///
/// Only the new mass-fraction block carries the prefix, so the count is
/// the number of species regardless of where the named fields sit.
pub fn derive_species_count<'a>(names: impl IntoIterator<Item = &'a str>) -> usize {
    names
        .into_iter()
        .filter(|name| name.starts_with(SPECIES_PREFIX))
        .count()
}

/// The label a per-species consistency field is reported under: the
/// first whitespace-separated token of its name.
pub fn species_label(field_name: &str) -> &str {
    field_name.split_whitespace().next().unwrap_or(field_name)
}
