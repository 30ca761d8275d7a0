use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rbcfilt_core::io::naming::split_dir;
use rbcfilt_core::io::{load_boundary, split_to_dir};

#[derive(Args)]
pub struct SplitArgs {
    /// Concatenated recording, one raveled frame per line
    pub input: PathBuf,

    /// Boundary mask giving the frame shape
    #[arg(short, long)]
    pub boundary: PathBuf,

    /// Output directory [default: frames/<cell prefix> next to the input]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &SplitArgs) -> Result<()> {
    let boundary = load_boundary(&args.boundary)
        .with_context(|| format!("Failed to load boundary {}", args.boundary.display()))?;
    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| split_dir(&args.input));

    let written = split_to_dir(&args.input, &boundary, &dir)
        .with_context(|| format!("Failed to split {}", args.input.display()))?;

    let (rows, cols) = boundary.dim();
    println!(
        "Split {} frame(s) of {}x{} into {}",
        written.len(),
        rows,
        cols,
        dir.display()
    );
    Ok(())
}
