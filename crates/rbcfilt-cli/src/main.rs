mod commands;
mod summary;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rbcfilt", about = "Frequency-domain filtering of red blood cell frames")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads (defaults to one per core)
    #[arg(short = 'j', long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter frames and write records / coordinate exports
    Filter(commands::filter::FilterArgs),
    /// Threshold a saved record into a coordinate file
    Export(commands::export::ExportArgs),
    /// Split a concatenated recording into per-frame .npy files
    Split(commands::split::SplitArgs),
    /// Show matrix file dimensions and statistics
    Info(commands::info::InfoArgs),
    /// Print or save the default batch config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure worker threads")?;
    }

    match &cli.command {
        Commands::Filter(args) => commands::filter::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Split(args) => commands::split::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
