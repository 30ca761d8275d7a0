use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rbcfilt_core::consts::DEFAULT_LOW_PASS_RADIUS;
use rbcfilt_core::export::ChompConfig;
use rbcfilt_core::mask::EdgePolicy;
use rbcfilt_core::pipeline::{
    run_batch_reported, BatchConfig, ExportConfig, PipelineStage, ProgressReporter, RecordLayout,
};
use rbcfilt_core::spectral::{band_schedule, radius_schedule, FilterSpec, Metric};
use tracing::debug;

use crate::summary::{print_batch_report, print_batch_summary};

#[derive(Clone, Copy, ValueEnum)]
pub enum MetricArg {
    L1,
    L2,
}

impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::L1 => Metric::L1,
            MetricArg::L2 => Metric::L2,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EdgeArg {
    Clamp,
    Wrap,
}

impl From<EdgeArg> for EdgePolicy {
    fn from(e: EdgeArg) -> Self {
        match e {
            EdgeArg::Clamp => EdgePolicy::Clamp,
            EdgeArg::Wrap => EdgePolicy::Wrap,
        }
    }
}

#[derive(Args)]
pub struct FilterArgs {
    /// Frame file, or a directory of .npy / .txt frames
    pub frames: PathBuf,

    /// Cell boundary mask (text matrix)
    #[arg(short, long)]
    pub boundary: Option<PathBuf>,

    /// Batch config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ideal low-pass radius as a fraction of the largest radius (0-1)
    #[arg(long, conflicts_with_all = ["band", "sweep_bands", "sweep_radii"])]
    pub radius: Option<f64>,

    /// Band-pass window as LOW,HIGH fractions
    #[arg(long, conflicts_with_all = ["sweep_bands", "sweep_radii"])]
    pub band: Option<String>,

    /// Sweep N contiguous band-pass windows over [0, 1]
    #[arg(long, conflicts_with = "sweep_radii")]
    pub sweep_bands: Option<usize>,

    /// Sweep N+1 low-pass radii 0, 1/N, ..., 1
    #[arg(long)]
    pub sweep_radii: Option<usize>,

    /// Distance metric for low-pass filters
    #[arg(long, value_enum, default_value = "l2")]
    pub metric: MetricArg,

    /// Boundary erosion at the image edge
    #[arg(long, value_enum, default_value = "clamp")]
    pub edge: EdgeArg,

    /// Write one combined record list per filter instead of per-frame records
    #[arg(long)]
    pub combine: bool,

    /// Export thresholded coordinates for every filtered frame
    #[arg(long)]
    pub export_coords: bool,

    /// Run this homology program on every coordinate export
    #[arg(long)]
    pub chomp: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = "fft_frames")]
    pub output: PathBuf,
}

/// Drives an indicatif bar from the batch runner's stage callbacks.
struct BarReporter {
    pb: ProgressBar,
}

impl ProgressReporter for BarReporter {
    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.pb.set_message(stage.to_string());
        self.pb.set_length(total_items.unwrap_or(0) as u64);
        self.pb.set_position(0);
    }

    fn advance(&self, items_done: usize) {
        self.pb.set_position(items_done as u64);
    }
}

pub fn run(args: &FilterArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let mut config: BatchConfig = toml::from_str(&contents).context("Invalid batch config")?;
        config.frames = args.frames.clone();
        if let Some(ref boundary) = args.boundary {
            config.boundary = boundary.clone();
        }
        debug!(path = %config_path.display(), filters = config.filters.len(), "Loaded batch config");
        config
    } else {
        build_config_from_args(args)?
    };

    print_batch_summary(&config);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:20} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = Arc::new(BarReporter { pb: pb.clone() });

    let report = run_batch_reported(&config, reporter)
        .with_context(|| format!("Filter batch failed for {}", config.frames.display()))?;

    pb.finish_with_message("Done");
    print_batch_report(&report, &config);

    Ok(())
}

fn build_config_from_args(args: &FilterArgs) -> Result<BatchConfig> {
    let Some(ref boundary) = args.boundary else {
        bail!("--boundary is required unless --config is given");
    };

    let metric = Metric::from(args.metric);
    let filters = if let Some(radius) = args.radius {
        vec![FilterSpec::LowPass { radius, metric }]
    } else if let Some(ref band) = args.band {
        let (low, high) = parse_band(band)?;
        vec![FilterSpec::band_pass(low, high)]
    } else if let Some(steps) = args.sweep_bands {
        band_schedule(steps)?
    } else if let Some(steps) = args.sweep_radii {
        radius_schedule(steps, metric)?
    } else {
        vec![FilterSpec::LowPass {
            radius: DEFAULT_LOW_PASS_RADIUS,
            metric,
        }]
    };

    let mut config = BatchConfig::new(args.frames.clone(), boundary.clone(), args.output.clone());
    config.filters = filters;
    config.edge_policy = args.edge.into();
    if args.combine {
        config.layout = RecordLayout::PerFilter;
    }
    config.export = ExportConfig {
        coords: args.export_coords,
        chomp: args.chomp.as_ref().map(|program| ChompConfig {
            program: program.clone(),
            ..Default::default()
        }),
    };
    Ok(config)
}

fn parse_band(s: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        bail!("Expected LOW,HIGH for --band, got '{}'", s);
    }
    let low = parts[0]
        .parse()
        .with_context(|| format!("Invalid band low '{}'", parts[0]))?;
    let high = parts[1]
        .parse()
        .with_context(|| format!("Invalid band high '{}'", parts[1]))?;
    Ok((low, high))
}
