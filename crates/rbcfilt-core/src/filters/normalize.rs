use ndarray::Array2;

use crate::error::{FilterError, Result};

/// Scale by the maximum value, then shift so the result has zero mean.
///
/// Fails on an empty image, a zero maximum, or any non-finite pixel.
pub fn normalize(img: &Array2<f64>) -> Result<Array2<f64>> {
    if img.is_empty() {
        return Err(FilterError::DegenerateFrame("image has no pixels".into()));
    }
    if img.iter().any(|v| !v.is_finite()) {
        return Err(FilterError::DegenerateFrame(
            "image contains non-finite values".into(),
        ));
    }

    let vmax = img.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if vmax == 0.0 {
        return Err(FilterError::DegenerateFrame(
            "maximum pixel value is zero".into(),
        ));
    }

    let scaled = img.mapv(|v| v / vmax);
    let mean = scaled.sum() / scaled.len() as f64;
    Ok(scaled.mapv(|v| v - mean))
}

/// Mean over the nonzero entries, or `None` when every entry is zero.
pub fn nonzero_mean(data: &Array2<f64>) -> Option<f64> {
    let (sum, count) = data
        .iter()
        .filter(|&&v| v != 0.0)
        .fold((0.0f64, 0usize), |(s, n), &v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
