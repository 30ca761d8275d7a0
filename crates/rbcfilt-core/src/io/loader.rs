use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use ndarray::Array2;
use tracing::debug;

use crate::consts::FRAME_EXTENSIONS;
use crate::error::{FilterError, Result};
use crate::frame::{Frame, FrameMetadata};
use crate::mask::BoundaryMask;

use super::naming::{natural_key, split_frame_name};
use super::{npy, text};

/// Load a 2D matrix, trying the text format first and falling back to `.npy`.
///
/// I/O failures are returned as-is; a file neither parser accepts becomes
/// [`FilterError::Load`] carrying both parse errors.
pub fn load_matrix(path: &Path) -> Result<Array2<f64>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Err(FilterError::Load {
            path: path.to_path_buf(),
            reason: "file is empty".into(),
        });
    }
    let mmap = unsafe { Mmap::map(&file)? };

    match text::parse_matrix(&mmap) {
        Ok(data) => Ok(data),
        Err(text_err) => {
            debug!(path = %path.display(), %text_err, "Not a text matrix, trying .npy");
            npy::parse_npy(&mmap).map_err(|npy_err| FilterError::Load {
                path: path.to_path_buf(),
                reason: format!("{}; {}", text_err, npy_err),
            })
        }
    }
}

/// Load one frame and tag it with its sequence index and source path.
pub fn load_frame(path: &Path, frame_index: usize) -> Result<Frame> {
    let data = load_matrix(path)?;
    Ok(Frame::with_metadata(
        data,
        FrameMetadata {
            frame_index,
            source: Some(path.to_path_buf()),
        },
    ))
}

pub fn load_boundary(path: &Path) -> Result<BoundaryMask> {
    Ok(BoundaryMask::new(load_matrix(path)?))
}

/// Frame files under `input`, in natural order.
///
/// A file path is returned as the only frame. A directory is scanned (not
/// recursively) for files with a frame extension.
pub fn discover_frames(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut frames = Vec::new();
    for entry in std::fs::read_dir(input)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_frame = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FRAME_EXTENSIONS.contains(&e));
        if is_frame {
            frames.push(path);
        }
    }

    if frames.is_empty() {
        return Err(FilterError::EmptySequence);
    }

    frames.sort_by_cached_key(|p| {
        natural_key(&p.file_name().map(|n| n.to_string_lossy()).unwrap_or_default())
    });
    Ok(frames)
}

/// Split a concatenated cell recording into frames.
///
/// Each non-blank line holds one frame raveled in row-major order, with as
/// many values as the boundary has pixels. Frames are returned already
/// multiplied by the boundary.
pub fn split_concatenated(path: &Path, boundary: &BoundaryMask) -> Result<Vec<Array2<f64>>> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Err(FilterError::Load {
            path: path.to_path_buf(),
            reason: "file is empty".into(),
        });
    }
    let mmap = unsafe { Mmap::map(&file)? };
    let text = std::str::from_utf8(&mmap).map_err(|e| FilterError::Load {
        path: path.to_path_buf(),
        reason: format!("not UTF-8 text: {}", e),
    })?;

    let (rows, cols) = boundary.dim();
    let mut frames = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    FilterError::MatrixFormat(format!(
                        "line {}: `{}` is not a number",
                        line_no + 1,
                        token
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if values.len() != rows * cols {
            return Err(FilterError::MatrixFormat(format!(
                "line {}: expected {} values for a {}x{} frame, found {}",
                line_no + 1,
                rows * cols,
                rows,
                cols,
                values.len()
            )));
        }
        let frame = Array2::from_shape_vec((rows, cols), values)
            .map_err(|e| FilterError::MatrixFormat(e.to_string()))?;
        frames.push(boundary.apply(&frame)?);
    }

    if frames.is_empty() {
        return Err(FilterError::EmptySequence);
    }
    debug!(path = %path.display(), frames = frames.len(), rows, cols, "Split concatenated recording");
    Ok(frames)
}

/// Split `path` and save every frame to `out_dir` as `{stem}_{k}.npy`.
/// Returns the written paths in frame order.
pub fn split_to_dir(path: &Path, boundary: &BoundaryMask, out_dir: &Path) -> Result<Vec<PathBuf>> {
    let frames = split_concatenated(path, boundary)?;
    let cell = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cell".into());

    std::fs::create_dir_all(out_dir)?;
    frames
        .iter()
        .enumerate()
        .map(|(k, frame)| {
            let target = out_dir.join(split_frame_name(&cell, k));
            npy::save_npy(&target, frame)?;
            Ok(target)
        })
        .collect()
}
