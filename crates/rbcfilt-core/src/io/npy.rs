//! Reader and writer for NumPy `.npy` files holding a 2D numeric array.

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use ndarray::{Array2, ShapeBuilder};

use crate::consts::{NPY_HEADER_ALIGNMENT, NPY_MAGIC};
use crate::error::{FilterError, Result};

/// Element type declared by the `descr` header field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NpyDtype {
    F64,
    F32,
    I64,
    I32,
    U8,
}

impl NpyDtype {
    pub fn size(&self) -> usize {
        match self {
            Self::F64 | Self::I64 => 8,
            Self::F32 | Self::I32 => 4,
            Self::U8 => 1,
        }
    }
}

/// Parsed `.npy` header.
#[derive(Clone, Debug, PartialEq)]
pub struct NpyHeader {
    pub dtype: NpyDtype,
    pub big_endian: bool,
    pub fortran_order: bool,
    pub shape: (usize, usize),
    /// Byte offset of the first array element.
    pub data_offset: usize,
}

pub fn is_npy(bytes: &[u8]) -> bool {
    bytes.starts_with(NPY_MAGIC)
}

pub fn parse_header(bytes: &[u8]) -> Result<NpyHeader> {
    if !is_npy(bytes) {
        return Err(FilterError::Npy("missing \\x93NUMPY magic".into()));
    }
    if bytes.len() < 10 {
        return Err(FilterError::Npy("file too small for header".into()));
    }

    let major = bytes[6];
    let (header_len, header_start) = match major {
        1 => (LittleEndian::read_u16(&bytes[8..10]) as usize, 10),
        2 | 3 => {
            if bytes.len() < 12 {
                return Err(FilterError::Npy("file too small for header".into()));
            }
            (LittleEndian::read_u32(&bytes[8..12]) as usize, 12)
        }
        v => return Err(FilterError::Npy(format!("unsupported format version {}", v))),
    };

    let data_offset = header_start + header_len;
    if bytes.len() < data_offset {
        return Err(FilterError::Npy("header truncated".into()));
    }
    let header = std::str::from_utf8(&bytes[header_start..data_offset])
        .map_err(|_| FilterError::Npy("header is not text".into()))?;

    let descr = dict_value(header, "descr")?;
    let descr = descr.trim_matches(|c: char| c == '\'' || c == '"');
    let (big_endian, dtype) = parse_descr(descr)?;

    let fortran_order = match dict_value(header, "fortran_order")? {
        "True" => true,
        "False" => false,
        other => {
            return Err(FilterError::Npy(format!(
                "bad fortran_order value `{}`",
                other
            )))
        }
    };

    let shape = parse_shape(dict_value(header, "shape")?)?;

    Ok(NpyHeader {
        dtype,
        big_endian,
        fortran_order,
        shape,
        data_offset,
    })
}

/// Decode a complete `.npy` file into a row-major `f64` array.
pub fn parse_npy(bytes: &[u8]) -> Result<Array2<f64>> {
    let header = parse_header(bytes)?;
    let (rows, cols) = header.shape;
    let (count, needed) = rows
        .checked_mul(cols)
        .and_then(|count| {
            count
                .checked_mul(header.dtype.size())
                .map(|needed| (count, needed))
        })
        .ok_or_else(|| FilterError::Npy(format!("shape ({}, {}) too large", rows, cols)))?;
    let payload = &bytes[header.data_offset..];
    if payload.len() < needed {
        return Err(FilterError::Npy(format!(
            "expected {} data bytes, found {}",
            needed,
            payload.len()
        )));
    }

    let mut cursor = Cursor::new(&payload[..needed]);
    let values = if header.big_endian {
        read_values::<BigEndian>(&mut cursor, header.dtype, count)?
    } else {
        read_values::<LittleEndian>(&mut cursor, header.dtype, count)?
    };

    let array = if header.fortran_order {
        Array2::from_shape_vec((rows, cols).f(), values)
    } else {
        Array2::from_shape_vec((rows, cols), values)
    }
    .map_err(|e| FilterError::Npy(e.to_string()))?;

    Ok(array.as_standard_layout().into_owned())
}

fn read_values<B: ByteOrder>(
    cursor: &mut Cursor<&[u8]>,
    dtype: NpyDtype,
    count: usize,
) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let v = match dtype {
            NpyDtype::F64 => cursor.read_f64::<B>()?,
            NpyDtype::F32 => cursor.read_f32::<B>()? as f64,
            NpyDtype::I64 => cursor.read_i64::<B>()? as f64,
            NpyDtype::I32 => cursor.read_i32::<B>()? as f64,
            NpyDtype::U8 => cursor.read_u8()? as f64,
        };
        values.push(v);
    }
    Ok(values)
}

/// Raw text of `key`'s value in the header dict literal.
fn dict_value<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let quoted = format!("'{}'", key);
    let start = header
        .find(&quoted)
        .ok_or_else(|| FilterError::Npy(format!("header has no `{}` key", key)))?;
    let rest = header[start + quoted.len()..].trim_start();
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| FilterError::Npy(format!("malformed `{}` entry", key)))?
        .trim_start();

    let end = if rest.starts_with('(') {
        rest.find(')').map(|i| i + 1)
    } else if rest.starts_with('\'') || rest.starts_with('"') {
        rest[1..].find(|c: char| c == '\'' || c == '"').map(|i| i + 2)
    } else {
        rest.find(|c: char| c == ',' || c == '}')
    }
    .ok_or_else(|| FilterError::Npy(format!("unterminated `{}` value", key)))?;

    Ok(rest[..end].trim())
}

fn parse_descr(descr: &str) -> Result<(bool, NpyDtype)> {
    let (order, kind) = descr.split_at(descr.len().min(1));
    let big_endian = match order {
        "<" | "|" | "=" => false,
        ">" => true,
        _ => return Err(FilterError::Npy(format!("unknown byte order in `{}`", descr))),
    };
    let dtype = match kind {
        "f8" => NpyDtype::F64,
        "f4" => NpyDtype::F32,
        "i8" => NpyDtype::I64,
        "i4" => NpyDtype::I32,
        "u1" => NpyDtype::U8,
        _ => return Err(FilterError::Npy(format!("unsupported dtype `{}`", descr))),
    };
    Ok((big_endian, dtype))
}

fn parse_shape(text: &str) -> Result<(usize, usize)> {
    let inner = text.trim_start_matches('(').trim_end_matches(')');
    let dims: Vec<usize> = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| FilterError::Npy(format!("bad shape entry `{}`", s)))
        })
        .collect::<Result<_>>()?;
    match dims.as_slice() {
        [rows, cols] => Ok((*rows, *cols)),
        _ => Err(FilterError::Npy(format!(
            "expected a 2D array, got shape {}",
            text
        ))),
    }
}

/// Write `data` as a version 1.0 little-endian `f8` array in C order.
pub fn write_npy<W: Write>(writer: &mut W, data: &Array2<f64>) -> Result<()> {
    let (rows, cols) = data.dim();
    let dict = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({}, {}), }}",
        rows, cols
    );
    // magic (6) + version (2) + header length (2) + dict + padding + '\n'
    let unpadded = 10 + dict.len() + 1;
    let padding = (NPY_HEADER_ALIGNMENT - unpadded % NPY_HEADER_ALIGNMENT) % NPY_HEADER_ALIGNMENT;
    let header_len = dict.len() + padding + 1;

    writer.write_all(NPY_MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_u16::<LittleEndian>(header_len as u16)?;
    writer.write_all(dict.as_bytes())?;
    writer.write_all(&vec![b' '; padding])?;
    writer.write_all(b"\n")?;

    for &v in data.iter() {
        writer.write_f64::<LittleEndian>(v)?;
    }
    Ok(())
}

pub fn save_npy(path: &Path, data: &Array2<f64>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_npy(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}
