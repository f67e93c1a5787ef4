//! Binary encode/decode for the plotfile format.
//!
//! All integers and floats are little-endian. Names are fixed-width and
//! padded; field data has no per-field framing, its length follows from
//! the grid extents.

use std::io::{Read, Write};

use recon_core::{GridDims, LoadError};

use crate::types::PlotfileHeader;
use crate::{FORMAT_VERSION, MAGIC, NAME_WIDTH};

/// Upper bound on up-front allocation driven by counts read from a file.
const MAX_PREALLOC: usize = 1 << 16;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), LoadError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), LoadError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), LoadError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f64.
pub fn write_f64_le(w: &mut dyn Write, v: f64) -> Result<(), LoadError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a name padded with spaces to [`NAME_WIDTH`] bytes.
pub fn write_name(w: &mut dyn Write, name: &str) -> Result<(), LoadError> {
    let bytes = name.as_bytes();
    if bytes.len() > NAME_WIDTH {
        return Err(LoadError::Malformed {
            detail: format!("field name '{name}' exceeds {NAME_WIDTH} bytes"),
        });
    }
    let mut buf = [b' '; NAME_WIDTH];
    buf[..bytes.len()].copy_from_slice(bytes);
    w.write_all(&buf)?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, LoadError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, LoadError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, LoadError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

/// Read a little-endian f64.
pub fn read_f64_le(r: &mut dyn Read) -> Result<f64, LoadError> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

/// Read a fixed-width name, trimming space and NUL padding.
pub fn read_name(r: &mut dyn Read) -> Result<String, LoadError> {
    let mut buf = [0u8; NAME_WIDTH];
    r.read_exact(&mut buf)?;
    let raw = std::str::from_utf8(&buf).map_err(|e| LoadError::Malformed {
        detail: format!("invalid UTF-8 in field name: {e}"),
    })?;
    Ok(raw.trim_matches(|c: char| c == ' ' || c == '\0').to_string())
}

// ── Header encode/decode ────────────────────────────────────────

/// Encode the plotfile header (magic, version, time, extents, names).
pub fn encode_header(w: &mut dyn Write, header: &PlotfileHeader) -> Result<(), LoadError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;

    write_f64_le(w, header.time)?;
    let (nx, ny, nz) = header.dims.to_raw();
    write_i32_le(w, nx)?;
    write_i32_le(w, ny)?;
    write_i32_le(w, nz)?;

    let count = u32::try_from(header.names.len()).map_err(|_| LoadError::Malformed {
        detail: format!("{} fields exceed u32::MAX", header.names.len()),
    })?;
    write_u32_le(w, count)?;
    for name in &header.names {
        write_name(w, name)?;
    }
    Ok(())
}

/// Decode and validate the plotfile header.
pub fn decode_header(r: &mut dyn Read) -> Result<PlotfileHeader, LoadError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(LoadError::InvalidMagic);
    }

    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(LoadError::UnsupportedVersion { found: version });
    }

    let time = read_f64_le(r)?;
    let nx = read_i32_le(r)?;
    let ny = read_i32_le(r)?;
    let nz = read_i32_le(r)?;
    let dims = GridDims::from_raw(nx, ny, nz)?;

    let count = read_u32_le(r)? as usize;
    let mut names = Vec::with_capacity(count.min(MAX_PREALLOC));
    for _ in 0..count {
        names.push(read_name(r)?);
    }

    Ok(PlotfileHeader { time, dims, names })
}

// ── Field encode/decode ─────────────────────────────────────────

/// Encode one field's values.
pub fn encode_field(w: &mut dyn Write, values: &[f64]) -> Result<(), LoadError> {
    for &v in values {
        write_f64_le(w, v)?;
    }
    Ok(())
}

/// Decode one field of `cells` values.
///
/// Allocation grows with the data actually read, so a corrupt extent
/// fails on truncation instead of on a huge up-front allocation.
pub fn decode_field(r: &mut dyn Read, cells: usize) -> Result<Vec<f64>, LoadError> {
    let mut values = Vec::with_capacity(cells.min(MAX_PREALLOC));
    for _ in 0..cells {
        values.push(read_f64_le(r)?);
    }
    Ok(values)
}

/// Require that the stream is exhausted.
pub fn expect_end(r: &mut dyn Read) -> Result<(), LoadError> {
    let mut probe = [0u8; 1];
    loop {
        match r.read(&mut probe) {
            Ok(0) => return Ok(()),
            Ok(_) => {
                return Err(LoadError::Malformed {
                    detail: "trailing bytes after last field".into(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(LoadError::Io(e)),
        }
    }
}
