//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::commands::status::{StatusReport, TierState};
use crate::error::Result;
use colored::*;
use curator_janitor::{CleanupReport, DeepCleanReport, IntegrityReport, RunState, TierOutcome};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => OutputFormat::Table,
            CliFormat::Json => OutputFormat::Json,
        }
    }
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a deep-clean report.
    pub fn deep_clean(&self, report: &DeepCleanReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }

        let mut sections = vec![format!("Run {}", report.run_id)];
        if report.dry_run {
            sections.push(self.warning("Dry run: nothing was written"));
        }

        sections.push(self.pass_table(&report.normal));
        if let Some(emergency) = &report.emergency {
            sections.push(self.warning("Storage budget exceeded; emergency pass ran"));
            sections.push(self.pass_table(emergency));
        }

        if let Some(total) = report.total_bytes {
            sections.push(format!(
                "Storage: {} of {} budget",
                human_bytes(total),
                human_bytes(report.budget_bytes)
            ));
        }

        for integrity in [&report.preflight, &report.integrity] {
            if !integrity.is_clean() {
                sections.push(self.integrity_lines(integrity));
            }
        }

        sections.push(match report.state {
            RunState::Done => self.success("Deep clean complete"),
            state => self.error(&format!("Deep clean ended in state {:?}", state)),
        });

        Ok(sections.join("\n"))
    }

    /// Format an integrity report.
    pub fn integrity(&self, report: &IntegrityReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(report)?);
        }
        if report.is_clean() {
            return Ok(self.success("All tier files are healthy"));
        }
        Ok(self.integrity_lines(report))
    }

    /// Format a status report.
    pub fn status(&self, status: &StatusReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(status)?);
        }

        let mut builder = Builder::default();
        builder.push_record(["Tier", "State", "Entries", "Max", "Size"]);
        for tier in &status.tiers {
            let (state, entries) = match &tier.state {
                TierState::Missing => (self.colorize("missing", "yellow"), "-".to_string()),
                TierState::Healthy { entries } => (self.colorize("healthy", "green"), entries.to_string()),
                TierState::Corrupted { .. } => (self.colorize("corrupted", "red"), "-".to_string()),
            };
            builder.push_record([
                tier.tier.to_string(),
                state,
                entries,
                tier.max_entries.to_string(),
                human_bytes(tier.bytes),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut lines = vec![table.to_string()];
        let usage = format!(
            "Storage: {} of {} budget",
            human_bytes(status.total_bytes),
            human_bytes(status.budget_bytes)
        );
        lines.push(if status.over_budget() {
            self.warning(&usage)
        } else {
            self.info(&usage)
        });
        lines.push(self.info(&format!("Archive bundles: {}", status.bundles)));
        Ok(lines.join("\n"))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn pass_table(&self, pass: &CleanupReport) -> String {
        let mut builder = Builder::default();
        builder.push_record([
            "Tier", "Loaded", "Duplicates", "Kept", "Archived", "Deleted", "Demoted", "Status",
        ]);

        for outcome in &pass.outcomes {
            match outcome {
                TierOutcome::Cleaned(r) => builder.push_record([
                    r.tier.to_string(),
                    r.loaded.to_string(),
                    r.duplicates.to_string(),
                    r.kept.to_string(),
                    r.archived.to_string(),
                    r.deleted.to_string(),
                    r.capacity_demoted.to_string(),
                    self.colorize("ok", "green"),
                ]),
                TierOutcome::Failed(f) => builder.push_record([
                    f.tier.to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    "-".to_string(),
                    self.colorize(&f.message, "red"),
                ]),
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        format!("{:?} pass\n{}", pass.mode, table)
    }

    fn integrity_lines(&self, report: &IntegrityReport) -> String {
        let mut lines = Vec::new();
        for q in &report.quarantined {
            let target = q.location.as_deref().unwrap_or("(dry run, not moved)");
            lines.push(self.warning(&format!("{} quarantined to {} ({})", q.tier, target, q.reason)));
        }
        for tier in &report.created {
            lines.push(self.info(&format!("{} created as an empty collection", tier)));
        }
        for (tier, bytes) in &report.oversized {
            lines.push(self.warning(&format!("{} is {}, over the per-file limit", tier, human_bytes(*bytes))));
        }
        for (tier, count) in &report.corrupted_records_removed {
            lines.push(self.warning(&format!("{}: removed {} corrupted record(s)", tier, count)));
        }
        for error in &report.errors {
            lines.push(self.error(error));
        }
        lines.join("\n")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Render a byte count with a binary unit.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::status::TierStatus;
    use curator_domain::Tier;

    fn status() -> StatusReport {
        StatusReport {
            tiers: vec![
                TierStatus {
                    tier: Tier::SuccessPatterns,
                    state: TierState::Healthy { entries: 12 },
                    bytes: 2048,
                    max_entries: 100,
                },
                TierStatus {
                    tier: Tier::HighEngagement,
                    state: TierState::Missing,
                    bytes: 0,
                    max_entries: 50,
                },
                TierStatus {
                    tier: Tier::EffectiveTopics,
                    state: TierState::Corrupted {
                        reason: "bad indent".into(),
                    },
                    bytes: 10,
                    max_entries: 75,
                },
            ],
            total_bytes: 2058,
            budget_bytes: 1000,
            bundles: 3,
        }
    }

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(512), "512 B");
        assert_eq!(human_bytes(2048), "2.0 KiB");
        assert_eq!(human_bytes(50 * 1024 * 1024), "50.0 MiB");
    }

    #[test]
    fn test_status_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.status(&status()).unwrap();
        assert!(output.contains("success-patterns"));
        assert!(output.contains("corrupted"));
        assert!(output.contains("⚠ Storage: 2.0 KiB of 1000 B budget"));
        assert!(output.contains("Archive bundles: 3"));
    }

    #[test]
    fn test_status_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.status(&status()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["bundles"], 3);
        assert_eq!(value["tiers"][0]["tier"], "success-patterns");
    }

    #[test]
    fn test_clean_integrity_message() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.integrity(&IntegrityReport::default()).unwrap();
        assert_eq!(output, "✓ All tier files are healthy");
    }

    #[test]
    fn test_no_color() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("done"), "✓ done");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
