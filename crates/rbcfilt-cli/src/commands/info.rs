use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rbcfilt_core::io::load_matrix;
use rbcfilt_core::mask::{BoundaryMask, EdgePolicy};

#[derive(Args)]
pub struct InfoArgs {
    /// Text matrix or .npy file
    pub file: PathBuf,

    /// Treat the file as a boundary mask and report erosion results
    #[arg(long)]
    pub boundary: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let data = load_matrix(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let (rows, cols) = data.dim();

    let min = data.iter().copied().fold(f64::INFINITY, f64::min);
    let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = if data.is_empty() {
        0.0
    } else {
        data.sum() / data.len() as f64
    };
    let nonzero = data.iter().filter(|&&v| v != 0.0).count();

    println!("File:       {}", args.file.display());
    println!("Shape:      {} x {}", rows, cols);
    println!("Min:        {:.6}", min);
    println!("Max:        {:.6}", max);
    println!("Mean:       {:.6}", mean);
    println!("Nonzero:    {}", nonzero);

    if args.boundary {
        let mask = BoundaryMask::new(data);
        for policy in [EdgePolicy::Clamp, EdgePolicy::Wrap] {
            println!(
                "Buffered ({}): {} inside",
                policy,
                mask.buffered(policy).inside_count()
            );
        }
    }

    Ok(())
}
