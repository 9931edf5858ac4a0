//! Curator CLI - retention and archival for learning data.

use clap::Parser;
use curator_cli::commands;
use curator_cli::{Cli, Command, Formatter, Paths};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> curator_cli::Result<()> {
    let cli = Cli::parse();
    let paths = Paths::resolve(&cli)?;
    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    tracing::debug!(
        "Data dir {}, archive root {}, config {}",
        paths.data_dir.display(),
        paths.archive_dir.display(),
        paths.config.display()
    );

    match cli.command {
        Command::Clean(args) => commands::execute_clean(args, &paths, &formatter).await,
        Command::Check(args) => commands::execute_check(args, &paths, &formatter).await,
        Command::Status => commands::execute_status(&paths, &formatter).await,
        Command::Config(args) => commands::execute_config(args, &paths, &formatter).await,
    }
}
