//! Path resolution and retention-config loading for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use curator_janitor::{RetentionConfig, RuleStore};
use curator_store::{FsArchive, YamlTierStore};
use std::path::PathBuf;

/// Resolved locations of tier files, archives, and the retention config.
///
/// Anything not given on the command line lives under `~/.curator/`:
/// tier files in `learning/`, archives in `archives/`, and the config in
/// `retention.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Directory holding the tier files
    pub data_dir: PathBuf,
    /// Root under which `archives/` is created
    pub archive_dir: PathBuf,
    /// Retention configuration file
    pub config: PathBuf,
}

impl Paths {
    /// The default curator home directory.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".curator"))
    }

    /// Resolve paths from CLI arguments, falling back to the curator home.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let or_home = |given: &Option<PathBuf>, default: &str| -> Result<PathBuf> {
            match given {
                Some(path) => Ok(path.clone()),
                None => Ok(Self::home()?.join(default)),
            }
        };

        Ok(Self {
            data_dir: or_home(&cli.data_dir, "learning")?,
            archive_dir: or_home(&cli.archive_dir, "")?,
            config: or_home(&cli.config, "retention.toml")?,
        })
    }

    /// Load the retention config, using defaults if it is missing or invalid.
    pub fn load_config(&self) -> RetentionConfig {
        RuleStore::new(&self.config).config().clone()
    }

    /// Tier store over `data_dir`.
    pub fn store(&self) -> YamlTierStore {
        YamlTierStore::new(&self.data_dir)
    }

    /// Archive rooted at `archive_dir`.
    pub fn archive(&self) -> FsArchive {
        FsArchive::new(&self.archive_dir)
    }
}
