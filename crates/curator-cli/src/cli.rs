//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Curator - Retention and archival for learning data.
#[derive(Debug, Parser)]
#[command(name = "curator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Directory holding the tier files
    #[arg(long, global = true, env = "CURATOR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Root under which `archives/` is created
    #[arg(long, global = true, env = "CURATOR_ARCHIVE_DIR")]
    pub archive_dir: Option<PathBuf>,

    /// Retention configuration file (TOML or YAML)
    #[arg(short, long, global = true, env = "CURATOR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a deep clean over all tiers
    Clean(CleanArgs),

    /// Check tier files for corruption and repair them
    Check(CheckArgs),

    /// Show tier sizes, budget, and archive bundles
    Status,

    /// Print the effective retention configuration
    Config(ConfigArgs),
}

/// Arguments for the clean command.
#[derive(Debug, Parser)]
pub struct CleanArgs {
    /// Classify and report without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Report problems without quarantining or rewriting files
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Print a built-in preset instead of the loaded configuration
    #[arg(short, long, value_enum)]
    pub preset: Option<PresetArg>,
}

/// Built-in configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PresetArg {
    /// Balanced defaults
    Default,
    /// Smaller tiers and tighter budgets
    Aggressive,
    /// Larger tiers and looser budgets
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clean() {
        let cli = Cli::try_parse_from(["curator", "clean", "--dry-run", "--format", "json"]).unwrap();
        assert_eq!(cli.format, CliFormat::Json);
        match cli.command {
            Command::Clean(args) => assert!(args.dry_run),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_paths() {
        let cli = Cli::try_parse_from([
            "curator",
            "status",
            "--data-dir",
            "/tmp/learning",
            "--config",
            "/tmp/retention.yaml",
        ])
        .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/learning")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/retention.yaml")));
        assert!(matches!(cli.command, Command::Status));
    }

    #[test]
    fn test_config_preset() {
        let cli = Cli::try_parse_from(["curator", "config", "--preset", "aggressive"]).unwrap();
        match cli.command {
            Command::Config(args) => assert_eq!(args.preset, Some(PresetArg::Aggressive)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["curator"]).is_err());
    }
}
