//! Plotfile encoding.

use std::io::Write;

use recon_core::{LoadError, Snapshot};

use crate::codec;
use crate::types::PlotfileHeader;

/// Streaming plotfile writer.
///
/// Writes the header on construction; fields are then appended in
/// header order.
pub struct PlotfileWriter<W: Write> {
    writer: W,
    header: PlotfileHeader,
    fields_written: usize,
}

impl<W: Write> PlotfileWriter<W> {
    /// Create a writer and encode the header.
    pub fn new(mut writer: W, header: PlotfileHeader) -> Result<Self, LoadError> {
        codec::encode_header(&mut writer, &header)?;
        Ok(Self {
            writer,
            header,
            fields_written: 0,
        })
    }

    /// Append the next field's values, last axis fastest.
    pub fn write_field(&mut self, values: &[f64]) -> Result<(), LoadError> {
        let Some(name) = self.header.names.get(self.fields_written) else {
            return Err(LoadError::Malformed {
                detail: format!(
                    "header declares {} fields, cannot write another",
                    self.header.field_count()
                ),
            });
        };
        let cells = self.header.dims.cell_count();
        if values.len() != cells {
            return Err(LoadError::ShapeMismatch {
                name: name.clone(),
                expected: cells,
                found: values.len(),
            });
        }
        codec::encode_field(&mut self.writer, values)?;
        self.fields_written += 1;
        Ok(())
    }

    /// Number of fields written so far.
    pub fn fields_written(&self) -> usize {
        self.fields_written
    }

    /// Flush and return the sink. Every declared field must be written.
    pub fn finish(mut self) -> Result<W, LoadError> {
        if self.fields_written != self.header.field_count() {
            let name = self.header.names[self.fields_written].clone();
            return Err(LoadError::MissingField { name });
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Encode a whole snapshot into `writer`.
pub fn write_snapshot<W: Write>(writer: W, snapshot: &Snapshot) -> Result<W, LoadError> {
    let header = PlotfileHeader {
        time: snapshot.time(),
        dims: snapshot.dims(),
        names: snapshot.field_names().map(str::to_string).collect(),
    };
    let mut out = PlotfileWriter::new(writer, header)?;
    for index in 0..snapshot.field_count() {
        if let Some((_, array)) = snapshot.field_at(index) {
            out.write_field(array.as_slice())?;
        }
    }
    out.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_core::GridDims;

    fn header() -> PlotfileHeader {
        PlotfileHeader {
            time: 0.0,
            dims: GridDims::new_2d(2, 2).unwrap(),
            names: vec!["density".into(), "h".into()],
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let mut w = PlotfileWriter::new(Vec::new(), header()).unwrap();
        assert!(matches!(
            w.write_field(&[1.0, 2.0]),
            Err(LoadError::ShapeMismatch { expected: 4, found: 2, .. })
        ));
    }

    #[test]
    fn rejects_extra_field() {
        let mut w = PlotfileWriter::new(Vec::new(), header()).unwrap();
        w.write_field(&[0.0; 4]).unwrap();
        w.write_field(&[0.0; 4]).unwrap();
        assert!(w.write_field(&[0.0; 4]).is_err());
        assert_eq!(w.fields_written(), 2);
    }

    #[test]
    fn finish_requires_all_fields() {
        let mut w = PlotfileWriter::new(Vec::new(), header()).unwrap();
        w.write_field(&[0.0; 4]).unwrap();
        match w.finish() {
            Err(LoadError::MissingField { name }) => assert_eq!(name, "h"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn payload_size_matches_grid() {
        let mut w = PlotfileWriter::new(Vec::new(), header()).unwrap();
        w.write_field(&[1.0; 4]).unwrap();
        w.write_field(&[2.0; 4]).unwrap();
        let bytes = w.finish().unwrap();
        let header_len = 4 + 1 + 8 + 12 + 4 + 2 * crate::NAME_WIDTH;
        assert_eq!(bytes.len(), header_len + 2 * 4 * 8);
    }
}
