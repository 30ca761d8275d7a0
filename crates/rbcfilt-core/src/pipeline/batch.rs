use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{FilterError, Result};
use crate::export::{export_coords, ChompRunner};
use crate::frame::{FilteredFrame, Frame};
use crate::io::naming::{
    combined_file_name, coords_dir_name, coords_file_name, record_file_name, records_dir_name,
    report_file_name, reports_dir_name,
};
use crate::io::{discover_frames, load_boundary, load_frame, save_record, save_records};
use crate::mask::CellBoundary;
use crate::spectral::FilterSpec;

use super::config::{BatchConfig, RecordLayout};
use super::per_frame::{filter_prepared, prepare_frame, PreparedFrame};
use super::types::{
    BatchReport, FrameFailure, NoOpReporter, PipelineStage, ProcessedItem, ProgressReporter,
};

/// Outcome of one (frame, filter) pair of an in-memory batch.
#[derive(Debug)]
pub struct FrameResult {
    pub frame_index: usize,
    /// `None` when the frame failed before any filter was applied.
    pub spec: Option<FilterSpec>,
    pub result: Result<FilteredFrame>,
}

fn validate_filters(specs: &[FilterSpec]) -> Result<()> {
    if specs.is_empty() {
        return Err(FilterError::InvalidParameter("no filters configured".into()));
    }
    specs.iter().try_for_each(FilterSpec::validate)
}

/// Filter already-loaded frames with every spec, in parallel.
///
/// Frame-local errors are returned per pair; a frame whose shape disagrees
/// with the boundary aborts the whole call.
pub fn filter_frames(
    frames: &[Frame],
    boundary: &CellBoundary,
    specs: &[FilterSpec],
) -> Result<Vec<FrameResult>> {
    validate_filters(specs)?;

    let nested = frames
        .par_iter()
        .map(|frame| -> Result<Vec<FrameResult>> {
            let frame_index = frame.metadata.frame_index;
            boundary.raw.check_shape(frame.data.dim())?;

            let prepared = match prepare_frame(frame, boundary) {
                Ok(p) => p,
                Err(e) if e.is_frame_local() => {
                    return Ok(vec![FrameResult {
                        frame_index,
                        spec: None,
                        result: Err(e),
                    }])
                }
                Err(e) => return Err(e),
            };

            Ok(specs
                .par_iter()
                .map(|spec| FrameResult {
                    frame_index,
                    spec: Some(*spec),
                    result: filter_prepared(&prepared, boundary, spec),
                })
                .collect())
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(nested.into_iter().flatten().collect())
}

/// Shared read-only state for every work item of one cell.
struct BatchContext<'a> {
    config: &'a BatchConfig,
    boundary: &'a CellBoundary,
    chomp: Option<ChompRunner>,
    reporter: &'a dyn ProgressReporter,
    done: AtomicUsize,
}

impl BatchContext<'_> {
    fn advance(&self, items: usize) {
        let done = self.done.fetch_add(items, Ordering::Relaxed) + items;
        self.reporter.advance(done);
    }
}

/// Turn a frame-local error into a recorded failure; pass other errors up.
fn isolate<T>(
    result: Result<T>,
    source: &Path,
    spec: Option<FilterSpec>,
) -> Result<std::result::Result<T, FrameFailure>> {
    match result {
        Ok(v) => Ok(Ok(v)),
        Err(e) if e.is_frame_local() => {
            match spec {
                Some(s) => warn!(source = %source.display(), filter = %s, error = %e, "Skipping frame"),
                None => warn!(source = %source.display(), error = %e, "Skipping frame"),
            }
            Ok(Err(FrameFailure {
                source: source.to_path_buf(),
                spec,
                reason: e.to_string(),
            }))
        }
        Err(e) => Err(e),
    }
}

type ItemOutcome = std::result::Result<(ProcessedItem, Option<FilteredFrame>), FrameFailure>;

/// Run the filter batch for one cell, reading frames from disk and writing
/// records and exports under `config.output`.
pub fn run_batch(config: &BatchConfig) -> Result<BatchReport> {
    run_batch_reported(config, Arc::new(NoOpReporter))
}

/// [`run_batch`] with a progress reporter.
pub fn run_batch_reported(
    config: &BatchConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<BatchReport> {
    validate_filters(&config.filters)?;

    reporter.begin_stage(PipelineStage::Scanning, None);
    let frames = discover_frames(&config.frames)?;
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::LoadingBoundary, None);
    let boundary = CellBoundary::new(load_boundary(&config.boundary)?, config.edge_policy)?;
    reporter.finish_stage();

    info!(
        frames = frames.len(),
        filters = config.filters.len(),
        inside = boundary.raw.inside_count(),
        edge = %config.edge_policy,
        "Starting filter batch"
    );

    create_output_dirs(config)?;

    let ctx = BatchContext {
        config,
        boundary: &boundary,
        chomp: config.export.chomp.clone().map(ChompRunner::new),
        reporter: reporter.as_ref(),
        done: AtomicUsize::new(0),
    };

    reporter.begin_stage(
        PipelineStage::Filtering,
        Some(frames.len() * config.filters.len()),
    );
    let outcomes = frames
        .par_iter()
        .enumerate()
        .map(|(index, path)| process_file(&ctx, index, path))
        .collect::<Result<Vec<_>>>()?;
    reporter.finish_stage();

    let mut report = BatchReport::default();
    let mut kept: Vec<FilteredFrame> = Vec::new();
    for outcome in outcomes.into_iter().flatten() {
        match outcome {
            Ok((item, frame)) => {
                report.processed.push(item);
                kept.extend(frame);
            }
            Err(failure) => report.failures.push(failure),
        }
    }

    if config.layout == RecordLayout::PerFilter {
        reporter.begin_stage(PipelineStage::Writing, Some(config.filters.len()));
        report.combined = write_combined(config, kept)?;
        reporter.finish_stage();
    }

    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Filter batch finished"
    );
    Ok(report)
}

fn create_output_dirs(config: &BatchConfig) -> Result<()> {
    std::fs::create_dir_all(&config.output)?;
    for spec in &config.filters {
        let modes = spec.modes();
        if config.layout == RecordLayout::PerFrame {
            std::fs::create_dir_all(config.output.join(records_dir_name(&modes)))?;
        }
        if config.export.writes_coords() {
            std::fs::create_dir_all(config.output.join(coords_dir_name(&modes)))?;
        }
        if config.export.chomp.is_some() {
            std::fs::create_dir_all(config.output.join(reports_dir_name(&modes)))?;
        }
    }
    Ok(())
}

fn process_file(ctx: &BatchContext<'_>, index: usize, path: &Path) -> Result<Vec<ItemOutcome>> {
    let specs = &ctx.config.filters;

    let frame = match isolate(load_frame(path, index), path, None)? {
        Ok(f) => f,
        Err(failure) => {
            ctx.advance(specs.len());
            return Ok(vec![Err(failure)]);
        }
    };

    ctx.boundary.raw.check_shape(frame.data.dim())?;

    let prepared = match isolate(prepare_frame(&frame, ctx.boundary), path, None)? {
        Ok(p) => p,
        Err(failure) => {
            ctx.advance(specs.len());
            return Ok(vec![Err(failure)]);
        }
    };

    specs
        .par_iter()
        .map(|spec| {
            let outcome = isolate(process_item(ctx, path, &prepared, spec), path, Some(*spec));
            ctx.advance(1);
            outcome
        })
        .collect()
}

fn process_item(
    ctx: &BatchContext<'_>,
    path: &Path,
    prepared: &PreparedFrame,
    spec: &FilterSpec,
) -> Result<(ProcessedItem, Option<FilteredFrame>)> {
    let config = ctx.config;
    let filtered = filter_prepared(prepared, ctx.boundary, spec)?;
    let modes = filtered.modes;

    let record = match config.layout {
        RecordLayout::PerFrame => {
            let record_path = config
                .output
                .join(records_dir_name(&modes))
                .join(record_file_name(&filtered.stem, &modes));
            save_record(&record_path, &filtered)?;
            Some(record_path)
        }
        RecordLayout::PerFilter => None,
    };

    let mut coords = None;
    let mut exported = 0;
    let mut report = None;
    if config.export.writes_coords() {
        let coords_path = config
            .output
            .join(coords_dir_name(&modes))
            .join(coords_file_name(&filtered.stem, &modes));
        exported = export_coords(&filtered, &coords_path)?;

        if let Some(runner) = &ctx.chomp {
            let report_path = config
                .output
                .join(reports_dir_name(&modes))
                .join(report_file_name(&filtered.stem, &modes));
            runner.run(&coords_path, &report_path)?;
            report = Some(report_path);
        }
        coords = Some(coords_path);
    }

    let item = ProcessedItem {
        source: path.to_path_buf(),
        frame_index: filtered.frame_index,
        spec: *spec,
        mean: filtered.mean,
        record,
        coords,
        exported,
        report,
    };
    let keep = (config.layout == RecordLayout::PerFilter).then_some(filtered);
    Ok((item, keep))
}

fn write_combined(config: &BatchConfig, mut frames: Vec<FilteredFrame>) -> Result<Vec<PathBuf>> {
    frames.sort_by_key(|f| f.frame_index);
    let mut written = Vec::with_capacity(config.filters.len());
    for spec in &config.filters {
        let modes = spec.modes();
        let group: Vec<FilteredFrame> = frames
            .iter()
            .filter(|f| f.modes == modes)
            .cloned()
            .collect();
        let path = config.output.join(combined_file_name(&modes));
        save_records(&path, &group)?;
        info!(path = %path.display(), frames = group.len(), "Wrote combined records");
        written.push(path);
    }
    Ok(written)
}
