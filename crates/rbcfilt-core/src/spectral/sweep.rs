use crate::error::{FilterError, Result};

use super::filter::{FilterSpec, Metric};

/// `steps + 1` evenly spaced fractions from 0 to 1 inclusive.
pub fn fractions(steps: usize) -> Result<Vec<f64>> {
    if steps == 0 {
        return Err(FilterError::InvalidParameter(
            "sweep needs at least one step".into(),
        ));
    }
    Ok((0..=steps).map(|i| i as f64 / steps as f64).collect())
}

/// Contiguous band-pass filters covering `[0, 1]`. Adjacent bands share an
/// edge value, so every bin lands in exactly one band.
pub fn band_schedule(steps: usize) -> Result<Vec<FilterSpec>> {
    let edges = fractions(steps)?;
    Ok(edges
        .windows(2)
        .map(|pair| FilterSpec::band_pass(pair[0], pair[1]))
        .collect())
}

/// Low-pass filters at every fraction from 0 to 1 inclusive.
pub fn radius_schedule(steps: usize, metric: Metric) -> Result<Vec<FilterSpec>> {
    Ok(fractions(steps)?
        .into_iter()
        .map(|radius| FilterSpec::LowPass { radius, metric })
        .collect())
}
