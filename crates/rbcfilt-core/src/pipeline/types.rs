use std::path::PathBuf;

use crate::spectral::FilterSpec;

/// Batch-level stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Scanning,
    LoadingBoundary,
    Filtering,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scanning => write!(f, "Scanning frames"),
            Self::LoadingBoundary => write!(f, "Loading boundary"),
            Self::Filtering => write!(f, "Filtering frames"),
            Self::Writing => write!(f, "Writing records"),
        }
    }
}

/// States one frame passes through, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum FrameStage {
    Loaded,
    BoundaryMasked,
    Normalized,
    Transformed,
    Filtered,
    InverseTransformed,
    Cropped,
}

impl std::fmt::Display for FrameStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded => write!(f, "loaded"),
            Self::BoundaryMasked => write!(f, "boundary masked"),
            Self::Normalized => write!(f, "normalized"),
            Self::Transformed => write!(f, "transformed"),
            Self::Filtered => write!(f, "filtered"),
            Self::InverseTransformed => write!(f, "inverse transformed"),
            Self::Cropped => write!(f, "cropped"),
        }
    }
}

/// Thread-safe progress reporting for the batch runner.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new stage has started. `total_items` is the number of work items
    /// in this stage, if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// Work items completed so far in the current stage.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// One (frame, filter) pair that made it through the pipeline.
#[derive(Clone, Debug)]
pub struct ProcessedItem {
    pub source: PathBuf,
    pub frame_index: usize,
    pub spec: FilterSpec,
    pub mean: f64,
    /// Per-frame record file, when the layout writes one.
    pub record: Option<PathBuf>,
    pub coords: Option<PathBuf>,
    /// Number of exported coordinates.
    pub exported: usize,
    pub report: Option<PathBuf>,
}

/// A skipped frame or (frame, filter) pair and why it was skipped.
#[derive(Clone, Debug)]
pub struct FrameFailure {
    pub source: PathBuf,
    /// `None` when the frame failed before any filter was applied.
    pub spec: Option<FilterSpec>,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<ProcessedItem>,
    pub failures: Vec<FrameFailure>,
    /// Combined per-filter record files, for `RecordLayout::PerFilter`.
    pub combined: Vec<PathBuf>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.processed.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}
