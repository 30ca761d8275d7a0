use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rbcfilt_core::export::export_coords;
use rbcfilt_core::io::naming::{coords_file_name, coords_path};
use rbcfilt_core::io::{load_record, load_records};

#[derive(Args)]
pub struct ExportArgs {
    /// Record file written by `rbcfilt filter`
    pub record: PathBuf,

    /// The record is a combined per-filter list
    #[arg(long)]
    pub combined: bool,

    /// Output file (single record) or directory (combined list)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    if args.combined {
        let frames = load_records(&args.record)
            .with_context(|| format!("Failed to read {}", args.record.display()))?;
        let dir = args
            .output
            .clone()
            .unwrap_or_else(|| args.record.with_extension(""));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        for frame in &frames {
            let path = dir.join(coords_file_name(&frame.stem, &frame.modes));
            let count = export_coords(frame, &path)?;
            println!("{:>8} coords -> {}", count, path.display());
        }
        println!("Exported {} frame(s) to {}", frames.len(), dir.display());
    } else {
        let frame = load_record(&args.record)
            .with_context(|| format!("Failed to read {}", args.record.display()))?;
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| coords_path(&args.record));
        let count = export_coords(&frame, &path)?;
        println!(
            "Exported {} coords (mean {:.6}, {}) to {}",
            count,
            frame.mean,
            frame.modes,
            path.display()
        );
    }

    Ok(())
}
