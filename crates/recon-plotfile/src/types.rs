//! Data types for the plotfile header.

use recon_core::GridDims;

/// Everything in a plotfile ahead of the field data.
///
/// # Examples
///
/// ```
/// use recon_core::GridDims;
/// use recon_plotfile::PlotfileHeader;
///
/// let header = PlotfileHeader {
///     time: 0.5,
///     dims: GridDims::new_2d(16, 16).unwrap(),
///     names: vec!["density".into(), "h".into()],
/// };
/// assert_eq!(header.field_count(), 2);
/// assert_eq!(header.dims.cell_count(), 256);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PlotfileHeader {
    /// Snapshot timestamp.
    pub time: f64,
    /// Grid extents.
    pub dims: GridDims,
    /// Field names in positional order.
    pub names: Vec<String>,
}

impl PlotfileHeader {
    /// Number of fields the file carries.
    pub fn field_count(&self) -> usize {
        self.names.len()
    }
}
