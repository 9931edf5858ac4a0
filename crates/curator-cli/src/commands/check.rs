//! Check command implementation.

use crate::cli::CheckArgs;
use crate::config::Paths;
use crate::error::Result;
use crate::output::Formatter;
use chrono::Utc;
use curator_janitor::{IntegrityGuard, IntegrityReport};

/// Execute the check command.
pub async fn execute_check(args: CheckArgs, paths: &Paths, formatter: &Formatter) -> Result<()> {
    let report = run_check(paths.clone(), args.dry_run).await?;
    println!("{}", formatter.integrity(&report)?);
    Ok(())
}

/// Verify tier files and sweep corrupted records.
pub async fn run_check(paths: Paths, dry_run: bool) -> Result<IntegrityReport> {
    let config = paths.load_config();
    let report = tokio::task::spawn_blocking(move || {
        let mut store = paths.store();
        let guard = IntegrityGuard::new(&config, dry_run);
        let mut report = guard.check(&mut store, Utc::now());
        guard.sweep_corrupted_records(&mut store, &mut report);
        report
    })
    .await?;
    Ok(report)
}
