mod common;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::Array2;

use rbcfilt_core::error::FilterError;
use rbcfilt_core::frame::Modes;
use rbcfilt_core::io::{load_record, load_records};
use rbcfilt_core::pipeline::{
    run_batch, run_batch_reported, BatchConfig, PipelineStage, ProgressReporter, RecordLayout,
};
use rbcfilt_core::spectral::{band_schedule, FilterSpec, Metric};

use common::{textured_image, write_matrix_file};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A cell directory with `good` textured 8x8 frames, an all-zero frame
/// named `new_zero.txt`, and a full-coverage boundary.
fn make_cell(root: &Path, good: usize) -> BatchConfig {
    let frames = root.join("frames");
    std::fs::create_dir(&frames).unwrap();
    for i in 0..good {
        let img = textured_image(8, 8) * (1.0 + i as f64);
        write_matrix_file(&frames, &format!("new_{}.txt", i + 1), &img);
    }
    write_matrix_file(&frames, "new_zero.txt", &Array2::zeros((8, 8)));

    let boundary = write_matrix_file(root, "boundary.txt", &Array2::ones((8, 8)));
    let mut config = BatchConfig::new(frames, boundary, root.join("out"));
    config.filters = vec![FilterSpec::LowPass {
        radius: 0.5,
        metric: Metric::L2,
    }];
    config
}

#[derive(Default)]
struct CountingReporter {
    stages: AtomicUsize,
    last: AtomicUsize,
}

impl ProgressReporter for CountingReporter {
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {
        self.stages.fetch_add(1, Ordering::Relaxed);
    }

    fn advance(&self, items_done: usize) {
        self.last.fetch_max(items_done, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Per-frame layout
// ---------------------------------------------------------------------------

#[test]
fn test_batch_writes_records_and_skips_bad_frame() {
    let dir = tempfile::tempdir().unwrap();
    let config = make_cell(dir.path(), 2);

    let report = run_batch(&config).unwrap();
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(report.failures[0].source.ends_with("new_zero.txt"));
    assert!(report.failures[0].reason.contains("Degenerate"));
    assert!(report.combined.is_empty());

    let record_path = dir.path().join("out/r05/new_2_r05.bin");
    let record = load_record(&record_path).unwrap();
    assert_eq!(record.modes, Modes::Radius(0.5));
    assert_eq!(record.stem, "new_2");
    assert_eq!(record.dim(), (8, 8));

    let item = report
        .processed
        .iter()
        .find(|p| p.record.as_deref() == Some(record_path.as_path()))
        .unwrap();
    assert_eq!(item.mean, record.mean);
    assert!(item.coords.is_none());
}

#[test]
fn test_batch_exports_coords() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = make_cell(dir.path(), 1);
    config.export.coords = true;

    let report = run_batch(&config).unwrap();
    let item = &report.processed[0];
    let coords = item.coords.as_ref().unwrap();
    assert!(coords.ends_with("r05_cub/new_1_r05.cub"));

    let text = std::fs::read_to_string(coords).unwrap();
    assert_eq!(text.lines().count(), item.exported);
    assert!(item.exported > 0);
    assert!(text.lines().all(|l| l.starts_with('(') && l.ends_with(')')));
}

#[test]
fn test_batch_reports_progress() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = make_cell(dir.path(), 2);
    config.filters = band_schedule(4).unwrap();

    let reporter = Arc::new(CountingReporter::default());
    run_batch_reported(&config, reporter.clone()).unwrap();
    // Three frames times four bands, failures included.
    assert_eq!(reporter.last.load(Ordering::Relaxed), 12);
    assert!(reporter.stages.load(Ordering::Relaxed) >= 3);
}

// ---------------------------------------------------------------------------
// Per-filter layout
// ---------------------------------------------------------------------------

#[test]
fn test_batch_writes_combined_lists() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = make_cell(dir.path(), 3);
    config.layout = RecordLayout::PerFilter;
    config.filters = band_schedule(4).unwrap();

    let report = run_batch(&config).unwrap();
    assert_eq!(report.combined.len(), 4);
    assert!(report.processed.iter().all(|p| p.record.is_none()));

    assert_eq!(report.combined[0], dir.path().join("out/fft_r00_r025.bin"));

    let second = dir.path().join("out/fft_r025_r05.bin");
    assert_eq!(report.combined[1], second);
    let frames = load_records(&second).unwrap();
    assert_eq!(frames.len(), 3);
    assert!(frames.windows(2).all(|w| w[0].frame_index < w[1].frame_index));
    assert!(frames.iter().all(|f| f.modes == Modes::Band(0.25, 0.5)));
    assert!(!dir.path().join("out/r025_r05").exists());
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_unreadable_frame_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let config = make_cell(dir.path(), 1);
    std::fs::write(config.frames.join("new_9.npy"), b"\x93NUMPY junk").unwrap();

    let report = run_batch(&config).unwrap();
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 2);
    assert!(report
        .failures
        .iter()
        .any(|f| f.source.ends_with("new_9.npy") && f.reason.contains("Failed to load")));
}

#[test]
fn test_boundary_shape_mismatch_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let config = make_cell(dir.path(), 1);
    write_matrix_file(dir.path(), "boundary.txt", &Array2::ones((8, 9)));

    let err = run_batch(&config).unwrap_err();
    assert!(matches!(err, FilterError::ShapeMismatch { .. }));
}

#[test]
fn test_invalid_filter_aborts_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = make_cell(dir.path(), 1);
    config.filters = vec![FilterSpec::band_pass(0.5, 0.2)];

    let err = run_batch(&config).unwrap_err();
    assert!(matches!(err, FilterError::InvalidParameter(_)));
    assert!(!config.output.exists());
}

#[test]
fn test_empty_frame_directory() {
    let dir = tempfile::tempdir().unwrap();
    let config = make_cell(dir.path(), 0);
    std::fs::remove_file(config.frames.join("new_zero.txt")).unwrap();

    assert!(matches!(
        run_batch(&config).unwrap_err(),
        FilterError::EmptySequence
    ));
}

#[cfg(unix)]
#[test]
fn test_batch_runs_external_tool() {
    use rbcfilt_core::export::ChompConfig;

    let dir = tempfile::tempdir().unwrap();
    let mut config = make_cell(dir.path(), 1);
    config.export.chomp = Some(ChompConfig {
        program: "cat".into(),
        ..Default::default()
    });

    let report = run_batch(&config).unwrap();
    let item = &report.processed[0];
    let report_path = item.report.as_ref().unwrap();
    assert!(report_path.ends_with("r05_cbetti/new_1_r05.cbetti"));
    assert_eq!(
        std::fs::read_to_string(report_path).unwrap(),
        std::fs::read_to_string(item.coords.as_ref().unwrap()).unwrap()
    );
}
