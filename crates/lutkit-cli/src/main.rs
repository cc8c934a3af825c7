//! lutkit - color LUT inspection tool
//!
//! Loads `.cube` files and palette PNGs into the canonical LUT model.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lutkit")]
#[command(author, version, about = "Inspect, validate and convert color LUT files")]
#[command(long_about = "
Loads .cube text LUTs and palette PNG images into one canonical 3D LUT model.

Examples:
  lutkit info look.cube                    # Show LUT info
  lutkit info 'luts/*.png' --json          # JSON for many files
  lutkit validate luts/*.cube              # Non-zero exit on any failure
  lutkit cache luts/* --max-count 4 --passes 3
  lutkit convert teal_orange.png teal_orange.cube
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display LUT information
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Check that LUT files load
    #[command(visible_alias = "v")]
    Validate(ValidateArgs),

    /// Load files repeatedly through a bounded cache and report stats
    Cache(CacheArgs),

    /// Convert between .cube and palette PNG
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),
}

#[derive(Args)]
struct InfoArgs {
    /// Input LUT file(s) or glob patterns
    #[arg(required = true)]
    input: Vec<String>,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ValidateArgs {
    /// Input LUT file(s) or glob patterns
    #[arg(required = true)]
    input: Vec<String>,
}

#[derive(Args)]
struct CacheArgs {
    /// Input LUT file(s) or glob patterns
    #[arg(required = true)]
    input: Vec<String>,

    /// Cache byte budget
    #[arg(long, default_value_t = lutkit_io::cache::DEFAULT_MAX_SIZE)]
    max_size: usize,

    /// Cache entry budget
    #[arg(long, default_value_t = lutkit_io::cache::DEFAULT_MAX_COUNT)]
    max_count: usize,

    /// Number of passes over the input list
    #[arg(long, default_value = "2")]
    passes: usize,
}

#[derive(Args)]
struct ConvertArgs {
    /// Input LUT
    input: PathBuf,

    /// Output LUT (.cube or .png)
    output: PathBuf,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Validate(args) => commands::validate::run(args, cli.verbose),
        Commands::Cache(args) => commands::cache::run(args, cli.verbose),
        Commands::Convert(args) => commands::convert::run(args, cli.verbose),
    }
}
