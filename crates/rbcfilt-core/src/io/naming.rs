//! File names that encode filter parameters, compatible with stored
//! artifacts from earlier runs (`new_110125_r005.bin`, `fft_r01_r02.bin`).

use std::path::{Path, PathBuf};

use crate::consts::{COORDS_EXTENSION, MODE_NAME_PRECISION, RECORD_EXTENSION, REPORT_EXTENSION};
use crate::frame::Modes;

/// Render a fraction with its decimal point removed: `0.05 -> "005"`,
/// `1.0 -> "10"`, `0.0 -> "00"`.
pub fn mode_to_str(mode: f64) -> String {
    let rendered = format!("{:.*}", MODE_NAME_PRECISION, mode);
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };
    format!("{}{}", int_part, frac)
}

/// Suffix shared by every artifact of one filter: `r005` or `r01_r02`.
pub fn modes_suffix(modes: &Modes) -> String {
    match *modes {
        Modes::Radius(r) => format!("r{}", mode_to_str(r)),
        Modes::Band(low, high) => format!("r{}_r{}", mode_to_str(low), mode_to_str(high)),
    }
}

/// `{stem}_{suffix}.bin`
pub fn record_file_name(stem: &str, modes: &Modes) -> String {
    format!("{}_{}.{}", stem, modes_suffix(modes), RECORD_EXTENSION)
}

/// Combined record list for one filter: `fft_r01_r02.bin`.
pub fn combined_file_name(modes: &Modes) -> String {
    format!("fft_{}.{}", modes_suffix(modes), RECORD_EXTENSION)
}

/// `{stem}_{suffix}.cub`
pub fn coords_file_name(stem: &str, modes: &Modes) -> String {
    format!("{}_{}.{}", stem, modes_suffix(modes), COORDS_EXTENSION)
}

/// `{stem}_{suffix}.cbetti`
pub fn report_file_name(stem: &str, modes: &Modes) -> String {
    format!("{}_{}.{}", stem, modes_suffix(modes), REPORT_EXTENSION)
}

/// Directory holding the per-frame records of one filter: `r005`.
pub fn records_dir_name(modes: &Modes) -> String {
    modes_suffix(modes)
}

/// Directory holding the coordinate exports of one filter: `r005_cub`.
pub fn coords_dir_name(modes: &Modes) -> String {
    format!("{}_{}", modes_suffix(modes), COORDS_EXTENSION)
}

/// Directory holding the topology reports of one filter: `r005_cbetti`.
pub fn reports_dir_name(modes: &Modes) -> String {
    format!("{}_{}", modes_suffix(modes), REPORT_EXTENSION)
}

/// Frame `k` split out of a concatenated recording: `{cell}_{k}.npy`.
pub fn split_frame_name(cell: &str, k: usize) -> String {
    format!("{}_{}.npy", cell, k)
}

/// Default output directory for frames split from `recording`:
/// `frames/{prefix}` next to it, where the prefix is the file name up to the
/// first `-`.
pub fn split_dir(recording: &Path) -> PathBuf {
    let name = recording
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = name.split('-').next().unwrap_or_default();
    recording
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("frames")
        .join(prefix)
}

/// Coordinate export path next to a record file.
pub fn coords_path(record: &Path) -> PathBuf {
    record.with_extension(COORDS_EXTENSION)
}

/// Sort key that orders embedded digit runs numerically:
/// `frame_2` sorts before `frame_10`.
pub fn natural_key(name: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut chars = name.chars().peekable();
    while let Some(&c) = chars.peek() {
        let digit = c.is_ascii_digit();
        let mut run = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() != digit {
                break;
            }
            run.push(c);
            chars.next();
        }
        if digit {
            let trimmed = run.trim_start_matches('0').to_string();
            parts.push(KeyPart::Number(trimmed.len(), trimmed));
        } else {
            parts.push(KeyPart::Text(run.to_lowercase()));
        }
    }
    parts
}

/// One run of a [`natural_key`]. Numbers compare by digit count, then digits.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum KeyPart {
    Number(usize, String),
    Text(String),
}
