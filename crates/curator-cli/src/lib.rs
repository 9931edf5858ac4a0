//! Curator CLI library.
//!
//! Command parsing, path resolution, command execution, and output
//! formatting for the `curator` binary. The engine itself lives in
//! curator-janitor; this crate only wires it to real files.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Paths;
pub use error::{CliError, Result};
pub use output::Formatter;
