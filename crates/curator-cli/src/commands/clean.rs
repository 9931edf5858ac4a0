//! Clean command implementation.

use crate::cli::CleanArgs;
use crate::config::Paths;
use crate::error::Result;
use crate::output::Formatter;
use curator_janitor::{DeepCleanReport, Janitor, JanitorOptions};

/// Execute the clean command.
pub async fn execute_clean(args: CleanArgs, paths: &Paths, formatter: &Formatter) -> Result<()> {
    match run_clean(paths.clone(), args.dry_run).await {
        Ok(report) => {
            println!("{}", formatter.deep_clean(&report)?);
            Ok(())
        }
        Err(crate::CliError::DeepClean(e)) => {
            // Partial results are still worth showing
            println!("{}", formatter.deep_clean(&e.report)?);
            Err(e.into())
        }
        Err(e) => Err(e),
    }
}

/// Run a deep clean on a blocking thread and return its report.
pub async fn run_clean(paths: Paths, dry_run: bool) -> Result<DeepCleanReport> {
    let config = paths.load_config();
    let report = tokio::task::spawn_blocking(move || {
        let mut store = paths.store();
        let mut archive = paths.archive();
        let mut janitor = Janitor::new(config).with_options(JanitorOptions { dry_run });
        janitor.deep_clean(&mut store, &mut archive)
    })
    .await??;

    tracing::debug!("Deep clean {} finished", report.run_id);
    Ok(report)
}
