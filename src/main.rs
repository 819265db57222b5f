//! archivist CLI entry point

use archivist::{
    commands::{cmd_import, print_import_stats, ImportOptions},
    config::Config,
    error::Result,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "archivist")]
#[command(version, about = "Import DVR sidecar metadata into the Jellyfin catalog database", long_about = None)]
struct Cli {
    /// Root directory of the recording library
    dir: PathBuf,

    /// Plan and print the work without performing it
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print each video file while processing
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Logs go to stderr so dry-run plans stay clean on stdout.
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = Config::load_or_default(cli.config.as_deref())?;

    let options = ImportOptions {
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };

    let stats = cmd_import(&config, &cli.dir, options).await?;
    print_import_stats(&stats, cli.dry_run);

    Ok(())
}
