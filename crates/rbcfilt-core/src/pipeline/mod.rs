pub mod batch;
pub mod config;
mod per_frame;
mod types;

pub use batch::{filter_frames, run_batch, run_batch_reported, FrameResult};
pub use config::{BatchConfig, ExportConfig, RecordLayout};
pub use per_frame::{filter_frame, filter_prepared, prepare_frame, PreparedFrame};
pub use types::{
    BatchReport, FrameFailure, FrameStage, NoOpReporter, PipelineStage, ProcessedItem,
    ProgressReporter,
};
