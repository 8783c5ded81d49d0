//! Seismo CLI - command-line interface for strong-motion processing.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seismo")]
#[command(author, version, about = "Strong-motion record processing and filter design", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Design a recursive digital filter
    Design(commands::design::DesignArgs),

    /// Run a processing pipeline over a WAV record
    Process(commands::process::ProcessArgs),

    /// Compute a narrow-band spectrogram of a WAV record
    Spectrogram(commands::spectrogram::SpectrogramArgs),

    /// Show record metadata and statistics
    Info(commands::info::InfoArgs),

    /// List, show or check processing pipelines
    Pipelines(commands::pipelines::PipelinesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let fallback = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Design(args) => commands::design::run(args),
        Commands::Process(args) => commands::process::run(args),
        Commands::Spectrogram(args) => commands::spectrogram::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Pipelines(args) => commands::pipelines::run(args),
    }
}
