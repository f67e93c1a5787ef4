//! Plotfile decoding.

use std::io::Read;

use recon_core::{LoadError, Snapshot, SnapshotSource};

use crate::codec;
use crate::types::PlotfileHeader;

/// Streaming plotfile reader.
///
/// Validates the header on open, then decodes every field on
/// [`read_all`](Self::read_all).
///
/// # Examples
///
/// ```
/// use recon_core::{FieldArray, GridDims, Snapshot};
/// use recon_plotfile::{write_snapshot, PlotfileReader};
///
/// let dims = GridDims::new_2d(1, 2).unwrap();
/// let field = FieldArray::new(&[1, 2], vec![0.25, 0.75]).unwrap();
/// let snapshot = Snapshot::from_parts(dims, [("X_C12".to_string(), field)], 1.5).unwrap();
///
/// let bytes = write_snapshot(Vec::new(), &snapshot).unwrap();
/// let reader = PlotfileReader::open(bytes.as_slice()).unwrap();
/// assert_eq!(reader.header().field_count(), 1);
///
/// let decoded = reader.read_all().unwrap().into_snapshot().unwrap();
/// assert_eq!(decoded, snapshot);
/// ```
pub struct PlotfileReader<R: Read> {
    reader: R,
    header: PlotfileHeader,
}

impl<R: Read> PlotfileReader<R> {
    /// Open a plotfile stream, validating magic, version and extents.
    pub fn open(mut reader: R) -> Result<Self, LoadError> {
        let header = codec::decode_header(&mut reader)?;
        Ok(Self { reader, header })
    }

    /// The decoded header.
    pub fn header(&self) -> &PlotfileHeader {
        &self.header
    }

    /// Decode every field and require the stream to end after the last.
    pub fn read_all(mut self) -> Result<Plotfile, LoadError> {
        let cells = self.header.dims.cell_count();
        let mut data = Vec::with_capacity(self.header.field_count());
        for _ in 0..self.header.field_count() {
            data.push(codec::decode_field(&mut self.reader, cells)?);
        }
        codec::expect_end(&mut self.reader)?;
        Ok(Plotfile {
            header: self.header,
            data,
        })
    }
}

/// A fully decoded plotfile.
#[derive(Clone, Debug, PartialEq)]
pub struct Plotfile {
    header: PlotfileHeader,
    data: Vec<Vec<f64>>,
}

impl Plotfile {
    /// The plotfile header.
    pub fn header(&self) -> &PlotfileHeader {
        &self.header
    }

    /// Convert into an engine snapshot through the [`SnapshotSource`] contract.
    pub fn into_snapshot(self) -> Result<Snapshot, LoadError> {
        Snapshot::materialize(&self)
    }
}

impl SnapshotSource for Plotfile {
    fn dimensions(&self) -> Result<(i32, i32, i32), LoadError> {
        Ok(self.header.dims.to_raw())
    }

    fn field_count(&self) -> Result<usize, LoadError> {
        Ok(self.header.field_count())
    }

    fn field_names(&self, count: usize) -> Result<Vec<String>, LoadError> {
        if count > self.header.field_count() {
            return Err(LoadError::Malformed {
                detail: format!(
                    "requested {count} names but only {} stored",
                    self.header.field_count()
                ),
            });
        }
        Ok(self.header.names[..count].to_vec())
    }

    fn field_array(&self, name: &str, shape: &[usize]) -> Result<Vec<f64>, LoadError> {
        let index = self
            .header
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| LoadError::MissingField {
                name: name.to_string(),
            })?;
        let values = &self.data[index];
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(LoadError::ShapeMismatch {
                name: name.to_string(),
                expected,
                found: values.len(),
            });
        }
        Ok(values.clone())
    }

    fn time(&self) -> Result<f64, LoadError> {
        Ok(self.header.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::write_snapshot;
    use recon_test_utils::SnapshotBuilder;

    fn sample() -> Snapshot {
        SnapshotBuilder::cube(2, &["C12", "O16"])
            .time(3.25)
            .omegadot_err("O16", &[1, 0, 1], 4.0e-15)
            .nuclear_heating(&[0, 1, 0], 12.0)
            .build()
    }

    #[test]
    fn decoded_snapshot_matches_written() {
        let snapshot = sample();
        let bytes = write_snapshot(Vec::new(), &snapshot).unwrap();
        let decoded = PlotfileReader::open(bytes.as_slice())
            .unwrap()
            .read_all()
            .unwrap()
            .into_snapshot()
            .unwrap();
        assert_eq!(decoded, snapshot);
        assert_eq!(decoded.time(), 3.25);
    }

    #[test]
    fn truncated_payload_fails() {
        let bytes = write_snapshot(Vec::new(), &sample()).unwrap();
        let short = &bytes[..bytes.len() - 8];
        let reader = PlotfileReader::open(short).unwrap();
        assert!(matches!(reader.read_all(), Err(LoadError::Io(_))));
    }

    #[test]
    fn trailing_bytes_fail() {
        let mut bytes = write_snapshot(Vec::new(), &sample()).unwrap();
        bytes.extend_from_slice(&[0, 0, 0]);
        let reader = PlotfileReader::open(bytes.as_slice()).unwrap();
        assert!(matches!(
            reader.read_all(),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn duplicate_names_rejected_on_materialize() {
        let mut bytes = Vec::new();
        let header = PlotfileHeader {
            time: 0.0,
            dims: recon_core::GridDims::new_2d(1, 1).unwrap(),
            names: vec!["h".into(), "h".into()],
        };
        codec::encode_header(&mut bytes, &header).unwrap();
        codec::encode_field(&mut bytes, &[1.0]).unwrap();
        codec::encode_field(&mut bytes, &[2.0]).unwrap();

        let plotfile = PlotfileReader::open(bytes.as_slice())
            .unwrap()
            .read_all()
            .unwrap();
        assert!(matches!(
            plotfile.into_snapshot(),
            Err(LoadError::DuplicateField { .. })
        ));
    }

    #[test]
    fn source_rejects_unknown_field() {
        let bytes = write_snapshot(Vec::new(), &sample()).unwrap();
        let plotfile = PlotfileReader::open(bytes.as_slice())
            .unwrap()
            .read_all()
            .unwrap();
        assert!(matches!(
            plotfile.field_array("nope", &[2, 2, 2]),
            Err(LoadError::MissingField { .. })
        ));
        assert!(matches!(
            plotfile.field_array("density", &[3]),
            Err(LoadError::ShapeMismatch { expected: 3, found: 8, .. })
        ));
    }
}
