use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rbcfilt_core::pipeline::{BatchConfig, ExportConfig};
use rbcfilt_core::spectral::band_schedule;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write config to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the default band-pass sweep instead of a single low-pass filter
    #[arg(long)]
    pub bands: bool,
}

/// Print or save a full default BatchConfig as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let mut config = BatchConfig::new(
        PathBuf::from("frames"),
        PathBuf::from("boundary.txt"),
        PathBuf::from("fft_frames"),
    );
    if args.bands {
        config.filters = band_schedule(rbcfilt_core::consts::DEFAULT_BAND_STEPS)?;
    }
    config.export = ExportConfig {
        coords: true,
        chomp: None,
    };
    let toml_str = toml::to_string_pretty(&config)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Default config saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
