//! The materialized [`Snapshot`].

use indexmap::IndexMap;

use crate::error::LoadError;
use crate::field::FieldArray;
use crate::grid::GridDims;
use crate::traits::SnapshotSource;

/// One time slice of grid data with named per-cell fields.
///
/// Field order is meaningful: the consistency engine locates fields by
/// position, and the insertion order of the field map is that position.
/// Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    dims: GridDims,
    fields: IndexMap<String, FieldArray>,
    time: f64,
}

impl Snapshot {
    /// Assemble a snapshot from already-decoded parts.
    ///
    /// Fails if a name repeats or any array does not have the grid shape.
    pub fn from_parts(
        dims: GridDims,
        fields: impl IntoIterator<Item = (String, FieldArray)>,
        time: f64,
    ) -> Result<Self, LoadError> {
        let shape = dims.shape();
        let mut map = IndexMap::new();
        for (name, array) in fields {
            if array.shape() != shape.as_slice() {
                return Err(LoadError::ShapeMismatch {
                    name,
                    expected: dims.cell_count(),
                    found: array.len(),
                });
            }
            if map.contains_key(&name) {
                return Err(LoadError::DuplicateField { name });
            }
            map.insert(name, array);
        }
        Ok(Self {
            dims,
            fields: map,
            time,
        })
    }

    /// Pull a complete snapshot through a backend accessor.
    ///
    /// Queries happen in a fixed order: dimensions, field count, names,
    /// every field's data, then time.
    pub fn materialize(source: &dyn SnapshotSource) -> Result<Self, LoadError> {
        let (nx, ny, nz) = source.dimensions()?;
        let dims = GridDims::from_raw(nx, ny, nz)?;
        let count = source.field_count()?;
        let names = source.field_names(count)?;
        if names.len() != count {
            return Err(LoadError::Malformed {
                detail: format!("backend listed {} names for {count} fields", names.len()),
            });
        }
        let shape = dims.shape();
        let mut fields = Vec::with_capacity(count);
        for name in names {
            let data = source.field_array(&name, &shape)?;
            let found = data.len();
            let array =
                FieldArray::new(&shape, data).ok_or_else(|| LoadError::ShapeMismatch {
                    name: name.clone(),
                    expected: dims.cell_count(),
                    found,
                })?;
            fields.push((name, array));
        }
        let time = source.time()?;
        Self::from_parts(dims, fields, time)
    }

    /// Grid extents.
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// 2 or 3.
    pub fn spatial_rank(&self) -> usize {
        self.dims.spatial_rank()
    }

    /// Number of named fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Field names in positional order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    /// Name of the field at a position.
    pub fn field_name(&self, index: usize) -> Option<&str> {
        self.fields.get_index(index).map(|(name, _)| name.as_str())
    }

    /// Field data by name.
    pub fn field(&self, name: &str) -> Option<&FieldArray> {
        self.fields.get(name)
    }

    /// Name and data of the field at a position.
    pub fn field_at(&self, index: usize) -> Option<(&str, &FieldArray)> {
        self.fields
            .get_index(index)
            .map(|(name, array)| (name.as_str(), array))
    }

    /// Snapshot timestamp.
    pub fn time(&self) -> f64 {
        self.time
    }
}
