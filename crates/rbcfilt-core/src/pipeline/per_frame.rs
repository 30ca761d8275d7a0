use tracing::debug;

use crate::error::{FilterError, Result};
use crate::filters::{nonzero_mean, normalize};
use crate::frame::{FilteredFrame, Frame};
use crate::mask::CellBoundary;
use crate::spectral::{forward, inverse, log_power, FilterSpec, FrequencyFilter, Spectrum};

use super::types::FrameStage;

/// A frame carried through masking, normalization and the forward
/// transform. Shared by every filter applied to the frame.
#[derive(Clone, Debug)]
pub struct PreparedFrame {
    pub frame_index: usize,
    pub stem: String,
    pub spectrum: Spectrum,
}

fn enter(frame_index: usize, stage: FrameStage) {
    debug!(frame = frame_index, %stage, "Frame stage");
}

/// Stages `Loaded` through `Transformed`.
pub fn prepare_frame(frame: &Frame, boundary: &CellBoundary) -> Result<PreparedFrame> {
    let index = frame.metadata.frame_index;
    enter(index, FrameStage::Loaded);

    let masked = boundary.buffered.apply(&frame.data)?;
    enter(index, FrameStage::BoundaryMasked);

    let normalized = normalize(&masked)?;
    enter(index, FrameStage::Normalized);

    let spectrum = forward(&normalized);
    enter(index, FrameStage::Transformed);

    Ok(PreparedFrame {
        frame_index: index,
        stem: frame.stem(),
        spectrum,
    })
}

/// Stages `Filtered` through `Cropped`, then the nonzero mean.
pub fn filter_prepared(
    prepared: &PreparedFrame,
    boundary: &CellBoundary,
    spec: &FilterSpec,
) -> Result<FilteredFrame> {
    let index = prepared.frame_index;

    let filter = FrequencyFilter::new(*spec, prepared.spectrum.dim())?;
    let filtered = filter.apply(&prepared.spectrum)?;
    enter(index, FrameStage::Filtered);

    let power = log_power(&inverse(&filtered));
    enter(index, FrameStage::InverseTransformed);

    let cropped = boundary.raw.apply(&power)?;
    if cropped.dim() != power.dim() {
        return Err(FilterError::ShapeMismatch {
            expected: power.dim(),
            found: cropped.dim(),
        });
    }
    enter(index, FrameStage::Cropped);

    let mean = nonzero_mean(&cropped).ok_or_else(|| {
        FilterError::DegenerateFrame(format!(
            "frame {} has no nonzero pixels inside the boundary after filtering ({})",
            index, spec
        ))
    })?;

    Ok(FilteredFrame {
        frame_index: index,
        stem: prepared.stem.clone(),
        modes: spec.modes(),
        ifft_nonzero: cropped,
        mean,
    })
}

/// Run the whole per-frame pipeline for one filter.
pub fn filter_frame(
    frame: &Frame,
    boundary: &CellBoundary,
    spec: &FilterSpec,
) -> Result<FilteredFrame> {
    let prepared = prepare_frame(frame, boundary)?;
    filter_prepared(&prepared, boundary, spec)
}
