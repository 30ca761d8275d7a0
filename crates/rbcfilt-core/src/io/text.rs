use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::Array2;

use crate::error::{FilterError, Result};

/// Parse a whitespace-delimited matrix: one row per line, blank lines and
/// `#` comments ignored.
pub fn parse_matrix(bytes: &[u8]) -> Result<Array2<f64>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| FilterError::MatrixFormat(format!("not UTF-8 text: {}", e)))?;

    let mut values = Vec::new();
    let mut cols: Option<usize> = None;
    let mut rows = 0usize;

    for (line_no, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let before = values.len();
        for token in content.split_whitespace() {
            let v: f64 = token.parse().map_err(|_| {
                FilterError::MatrixFormat(format!(
                    "line {}: `{}` is not a number",
                    line_no + 1,
                    token
                ))
            })?;
            values.push(v);
        }

        let width = values.len() - before;
        match cols {
            None => cols = Some(width),
            Some(c) if c != width => {
                return Err(FilterError::MatrixFormat(format!(
                    "line {}: expected {} columns, found {}",
                    line_no + 1,
                    c,
                    width
                )));
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let cols = cols.ok_or_else(|| FilterError::MatrixFormat("no data rows".into()))?;
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| FilterError::MatrixFormat(e.to_string()))
}

/// Write a matrix as space-separated `%.18e` values, one row per line.
pub fn write_matrix<W: Write>(writer: &mut W, data: &Array2<f64>) -> Result<()> {
    for row in data.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{:.18e}", v)).collect();
        writeln!(writer, "{}", line.join(" "))?;
    }
    Ok(())
}

pub fn save_text_matrix(path: &Path, data: &Array2<f64>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_matrix(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}
