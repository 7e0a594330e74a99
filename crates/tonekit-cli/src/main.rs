//! tonekit - hue/saturation adjustment CLI
//!
//! Runs the versioned hue/saturation operator over PNG images and
//! inspects its controls and derived matrices.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod io;

#[derive(Parser)]
#[command(name = "tonekit")]
#[command(author, version, about = "Hue/saturation adjustment CLI")]
#[command(long_about = "
Applies the hue/saturation operator (hue, saturation, vibrance,
luminosity, contrast) to PNG images.

Examples:
  tonekit apply in.png -o out.png --saturation 30 --vibrance 20
  tonekit apply in.png -o out.png --op-version v1 --contrast 40 --opacity 0.5
  tonekit params --op-version v2
  tonekit params --json
  tonekit matrix --saturation -100 --luminosity 10
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Adjust a PNG image
    #[command(visible_alias = "a")]
    Apply(commands::apply::ApplyArgs),

    /// List the controls of an operator version
    #[command(visible_alias = "p")]
    Params(commands::params::ParamsArgs),

    /// Print the matrices derived from a set of values
    #[command(visible_alias = "m")]
    Matrix(commands::matrix::MatrixArgs),
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "tonekit=info",
        1 => "tonekit=debug",
        _ => "tonekit=trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
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
        Commands::Apply(args) => commands::apply::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Matrix(args) => commands::matrix::run(args),
    }
}
