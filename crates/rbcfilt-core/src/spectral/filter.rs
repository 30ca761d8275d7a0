//! Radial frequency selection over a centered spectrum.
//!
//! All policies measure distance from the center index `(k0, l0)` and scale
//! their radius fractions by `C = min(k0, l0)`, the largest radius that fits
//! on both axes. Integer radii are `floor(fraction * C)`.

use ndarray::Array2;
use num_complex::Complex;
use num_traits::One;
use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_LOW_PASS_RADIUS;
use crate::error::{FilterError, Result};
use crate::frame::Modes;

use super::transform::{center_index, Spectrum};

/// Distance metric for the ideal low-pass filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    /// Chebyshev square around the center. Produces a binary mask.
    L1,
    /// Euclidean disk around the center. Keeps the spectral values.
    #[default]
    L2,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
        }
    }
}

/// User-facing filter parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum FilterSpec {
    /// Keep every bin within `radius * C` of the center.
    LowPass {
        radius: f64,
        #[serde(default)]
        metric: Metric,
    },
    /// Keep bins with `low * C <= d < high * C` (Euclidean).
    BandPass { low: f64, high: f64 },
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self::LowPass {
            radius: DEFAULT_LOW_PASS_RADIUS,
            metric: Metric::L2,
        }
    }
}

impl FilterSpec {
    pub fn low_pass(radius: f64) -> Self {
        Self::LowPass {
            radius,
            metric: Metric::L2,
        }
    }

    pub fn band_pass(low: f64, high: f64) -> Self {
        Self::BandPass { low, high }
    }

    /// Parameters as recorded in a `FilteredFrame`.
    pub fn modes(&self) -> Modes {
        match *self {
            Self::LowPass { radius, .. } => Modes::Radius(radius),
            Self::BandPass { low, high } => Modes::Band(low, high),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let check = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(FilterError::InvalidParameter(format!(
                    "{} must be within [0, 1], got {}",
                    name, v
                )))
            }
        };
        match *self {
            Self::LowPass { radius, .. } => check("radius", radius),
            Self::BandPass { low, high } => {
                check("low", low)?;
                check("high", high)?;
                if low > high {
                    return Err(FilterError::InvalidParameter(format!(
                        "band low bound {} exceeds high bound {}",
                        low, high
                    )));
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LowPass { radius, metric } => write!(f, "Low-pass r={} ({})", radius, metric),
            Self::BandPass { low, high } => write!(f, "Band-pass [{}, {})", low, high),
        }
    }
}

/// Order in which the quadrant walk visits bins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Stops a row at its first rejected bin and stops the walk at the first
    /// row with no kept bin.
    ///
    /// Only correct when every row's kept bins form one run starting at the
    /// center column and those runs never grow moving away from the center
    /// row. A disk satisfies this; an annulus does not.
    StarConvex,
    /// Visits every bin of the quadrant.
    FullScan,
}

/// Selection policy resolved against a concrete shape.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Selection {
    DcOnly,
    Square { half_width: usize },
    Disk { radius_sq: usize },
    Annulus { inner_sq: usize, outer_sq: usize },
}

/// A filter bound to one spectrum shape. Build once, apply to every frame of
/// that shape.
#[derive(Clone, Debug)]
pub struct FrequencyFilter {
    spec: FilterSpec,
    shape: (usize, usize),
    center: (usize, usize),
    max_radius: usize,
    selection: Selection,
}

impl FrequencyFilter {
    pub fn new(spec: FilterSpec, shape: (usize, usize)) -> Result<Self> {
        spec.validate()?;
        if shape.0 == 0 || shape.1 == 0 {
            return Err(FilterError::InvalidParameter(format!(
                "cannot filter an empty {}x{} spectrum",
                shape.0, shape.1
            )));
        }

        let center = center_index(shape);
        let max_radius = center.0.min(center.1);

        let selection = match spec {
            FilterSpec::LowPass { radius, metric } => {
                let r = scaled_radius(radius, max_radius);
                // L1 stays binary unless the fraction itself is zero, so a
                // radius that floors to zero still marks the center with one.
                match metric {
                    Metric::L1 if radius == 0.0 => Selection::DcOnly,
                    Metric::L1 => Selection::Square { half_width: r },
                    Metric::L2 if r == 0 => Selection::DcOnly,
                    Metric::L2 => Selection::Disk { radius_sq: r * r },
                }
            }
            FilterSpec::BandPass { low, high } => {
                let r_low = scaled_radius(low, max_radius);
                let r_high = scaled_radius(high, max_radius);
                if r_low == 0 && r_high == 0 {
                    Selection::DcOnly
                } else {
                    Selection::Annulus {
                        inner_sq: r_low * r_low,
                        outer_sq: r_high * r_high,
                    }
                }
            }
        };

        Ok(Self {
            spec,
            shape,
            center,
            max_radius,
            selection,
        })
    }

    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Center index `(k0, l0)`.
    pub fn center(&self) -> (usize, usize) {
        self.center
    }

    /// `C = min(k0, l0)`.
    pub fn max_radius(&self) -> usize {
        self.max_radius
    }

    /// True when only the DC bin survives.
    pub fn is_dc_only(&self) -> bool {
        self.selection == Selection::DcOnly
    }

    /// Quadrant walk strategy, or `None` for policies that do not walk.
    pub fn traversal(&self) -> Option<Traversal> {
        match self.selection {
            Selection::Disk { .. } => Some(Traversal::StarConvex),
            Selection::Annulus { .. } => Some(Traversal::FullScan),
            Selection::DcOnly | Selection::Square { .. } => None,
        }
    }

    /// Build the filtered spectrum: selected bins keep their value (L1 sets
    /// them to one), everything else is zero.
    pub fn apply(&self, spectrum: &Spectrum) -> Result<Spectrum> {
        if spectrum.dim() != self.shape {
            return Err(FilterError::ShapeMismatch {
                expected: self.shape,
                found: spectrum.dim(),
            });
        }

        let (k0, l0) = self.center;
        let mut mask = Array2::<Complex<f64>>::zeros(self.shape);

        match self.selection {
            Selection::DcOnly => {
                mask[[k0, l0]] = spectrum[[k0, l0]];
            }
            Selection::Square { half_width } => {
                fill_square(&mut mask, self.center, half_width);
            }
            Selection::Disk { radius_sq } => {
                walk_quadrant(spectrum, &mut mask, self.center, Traversal::StarConvex, |d| {
                    d <= radius_sq
                });
            }
            Selection::Annulus { inner_sq, outer_sq } => {
                walk_quadrant(spectrum, &mut mask, self.center, Traversal::FullScan, |d| {
                    inner_sq <= d && d < outer_sq
                });
            }
        }

        Ok(mask)
    }
}

/// One-shot helper: build the filter for `spectrum`'s shape and apply it.
pub fn filter_spectrum(spectrum: &Spectrum, spec: FilterSpec) -> Result<Spectrum> {
    FrequencyFilter::new(spec, spectrum.dim())?.apply(spectrum)
}

fn scaled_radius(fraction: f64, max_radius: usize) -> usize {
    (fraction * max_radius as f64).floor() as usize
}

/// Set every bin within `half_width` of the center on both axes to one.
fn fill_square(mask: &mut Array2<Complex<f64>>, (k0, l0): (usize, usize), half_width: usize) {
    let (h, w) = mask.dim();
    let one = Complex::<f64>::one();
    for row in k0.saturating_sub(half_width)..=(k0 + half_width).min(h - 1) {
        for col in l0.saturating_sub(half_width)..=(l0 + half_width).min(w - 1) {
            mask[[row, col]] = one;
        }
    }
}

/// Walk the lower-right quadrant from the center and copy every kept bin
/// together with its three mirror images `(i, 2l0-j)`, `(2k0-i, j)` and
/// `(2k0-i, 2l0-j)`.
///
/// `keep` receives the squared Euclidean distance from the center.
fn walk_quadrant(
    spectrum: &Spectrum,
    mask: &mut Array2<Complex<f64>>,
    (k0, l0): (usize, usize),
    traversal: Traversal,
    keep: impl Fn(usize) -> bool,
) {
    let (h, w) = spectrum.dim();
    let star_convex = traversal == Traversal::StarConvex;

    for i in k0..h {
        let di = i - k0;
        let mut row_kept = false;
        for j in l0..w {
            let dj = j - l0;
            if keep(di * di + dj * dj) {
                row_kept = true;
                // 2*k0 >= h-1 and 2*l0 >= w-1, so mirrors never underflow.
                let (mi, mj) = (2 * k0 - i, 2 * l0 - j);
                for (r, c) in [(i, j), (i, mj), (mi, j), (mi, mj)] {
                    mask[[r, c]] = spectrum[[r, c]];
                }
            } else if star_convex {
                break;
            }
        }
        if star_convex && !row_kept {
            break;
        }
    }
}
