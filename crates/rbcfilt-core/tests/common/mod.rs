#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use num_complex::Complex;
use rbcfilt_core::io::text::save_text_matrix;
use rbcfilt_core::spectral::{center_index, Spectrum};

/// Deterministic, non-constant test image with values in [1, 2].
pub fn textured_image(h: usize, w: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| {
        1.5 + 0.5 * ((r as f64 * 0.9).sin() * (c as f64 * 1.3 + 0.4).cos())
    })
}

/// Spectrum with no zero bins, so the kept set of a filter is exactly its
/// nonzero entries.
pub fn dense_spectrum(h: usize, w: usize) -> Spectrum {
    Array2::from_shape_fn((h, w), |(r, c)| {
        Complex::new(1.0 + r as f64, 1.0 + (r * w + c) as f64 * 0.01)
    })
}

/// Ones inside, zeros in a `border`-pixel frame around the edge.
pub fn bordered_mask(h: usize, w: usize, border: usize) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| {
        let inside = r >= border && r + border < h && c >= border && c + border < w;
        if inside {
            1.0
        } else {
            0.0
        }
    })
}

/// Indices of the nonzero bins of a filtered spectrum.
pub fn kept(mask: &Spectrum) -> BTreeSet<(usize, usize)> {
    mask.indexed_iter()
        .filter(|(_, v)| v.norm_sqr() != 0.0)
        .map(|(idx, _)| idx)
        .collect()
}

/// Brute-force reference: every bin reachable by mirroring the lower-right
/// quadrant whose squared distance from the center satisfies `keep`.
pub fn reference_set(
    shape: (usize, usize),
    keep: impl Fn(usize) -> bool,
) -> BTreeSet<(usize, usize)> {
    let (h, w) = shape;
    let (k0, l0) = center_index(shape);
    let mut set = BTreeSet::new();
    for i in (2 * k0 + 1 - h)..h {
        for j in (2 * l0 + 1 - w)..w {
            let di = i.abs_diff(k0);
            let dj = j.abs_diff(l0);
            if keep(di * di + dj * dj) {
                set.insert((i, j));
            }
        }
    }
    set
}

/// Write `data` as a text matrix under `dir` and return its path.
pub fn write_matrix_file(dir: &Path, name: &str, data: &Array2<f64>) -> PathBuf {
    let path = dir.join(name);
    save_text_matrix(&path, data).expect("write text matrix");
    path
}
