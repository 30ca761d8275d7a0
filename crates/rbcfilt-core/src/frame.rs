use std::path::PathBuf;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::spectral::center_index;

/// A single microscopy frame. Values are raw intensities, row-major,
/// shape = (rows, cols).
#[derive(Clone, Debug)]
pub struct Frame {
    pub data: Array2<f64>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(data: Array2<f64>) -> Self {
        Self {
            data,
            metadata: FrameMetadata::default(),
        }
    }

    pub fn with_metadata(data: Array2<f64>, metadata: FrameMetadata) -> Self {
        Self { data, metadata }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// File stem used to name artifacts derived from this frame.
    pub fn stem(&self) -> String {
        self.metadata
            .source
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("frame_{}", self.metadata.frame_index))
    }
}

#[derive(Clone, Debug, Default)]
pub struct FrameMetadata {
    /// Position of the frame in the (naturally sorted) input sequence.
    pub frame_index: usize,
    /// File the frame was loaded from, if any.
    pub source: Option<PathBuf>,
}

/// Filter parameters recorded alongside a filtered frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Modes {
    /// Ideal low-pass radius fraction.
    Radius(f64),
    /// Band-pass `[low, high)` radius fractions.
    Band(f64, f64),
}

impl Modes {
    /// True when, on a `shape` spectrum, every radius floors to zero so at
    /// most the center bin survives and the filtered image is constant.
    pub fn is_dc_only(&self, shape: (usize, usize)) -> bool {
        let (k0, l0) = center_index(shape);
        let c = k0.min(l0) as f64;
        let floors_to_zero = |fraction: f64| (fraction * c).floor() < 1.0;
        match *self {
            Self::Radius(r) => floors_to_zero(r),
            Self::Band(low, high) => floors_to_zero(low) && floors_to_zero(high),
        }
    }
}

impl std::fmt::Display for Modes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Radius(r) => write!(f, "r={}", r),
            Self::Band(low, high) => write!(f, "[{}, {})", low, high),
        }
    }
}

/// Durable output of the per-frame pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilteredFrame {
    pub frame_index: usize,
    /// Stem of the source file, used for artifact names.
    pub stem: String,
    pub modes: Modes,
    /// Log-power of the filtered image, cropped by the boundary mask.
    pub ifft_nonzero: Array2<f64>,
    /// Mean of the nonzero entries of `ifft_nonzero`.
    pub mean: f64,
}

impl FilteredFrame {
    pub fn dim(&self) -> (usize, usize) {
        self.ifft_nonzero.dim()
    }
}
