use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::frame::FilteredFrame;

/// Pixels whose cropped value is strictly above the frame's mean, row-major.
///
/// When the recorded modes resolve to the center bin alone on this frame's
/// shape the field is constant inside the cell, so every nonzero pixel is
/// returned instead.
pub fn threshold_coords(frame: &FilteredFrame) -> Vec<(usize, usize)> {
    let dc_only = frame.modes.is_dc_only(frame.dim());
    frame
        .ifft_nonzero
        .indexed_iter()
        .filter(|&(_, &v)| if dc_only { v != 0.0 } else { v > frame.mean })
        .map(|(idx, _)| idx)
        .collect()
}

/// One `(row, col)` per line.
pub fn write_coords<W: Write>(writer: &mut W, coords: &[(usize, usize)]) -> Result<()> {
    for (row, col) in coords {
        writeln!(writer, "({}, {})", row, col)?;
    }
    Ok(())
}

/// Threshold `frame` and write the coordinate list to `path`.
/// Returns the number of exported pixels.
pub fn export_coords(frame: &FilteredFrame, path: &Path) -> Result<usize> {
    let coords = threshold_coords(frame);
    let mut writer = BufWriter::new(File::create(path)?);
    write_coords(&mut writer, &coords)?;
    writer.flush()?;
    Ok(coords.len())
}
