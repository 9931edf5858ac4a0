//! Config command implementation.

use crate::cli::{ConfigArgs, PresetArg};
use crate::config::Paths;
use crate::error::Result;
use crate::output::{Formatter, OutputFormat};
use curator_janitor::RetentionConfig;

/// Execute the config command.
pub async fn execute_config(args: ConfigArgs, paths: &Paths, formatter: &Formatter) -> Result<()> {
    let config = match args.preset {
        Some(preset) => preset_config(preset),
        None => {
            if !paths.config.exists() {
                eprintln!(
                    "{}",
                    formatter.info(&format!(
                        "{} not found, showing defaults",
                        paths.config.display()
                    ))
                );
            }
            paths.load_config()
        }
    };

    println!("{}", render_config(&config, formatter.format())?);
    Ok(())
}

/// Built-in configuration for a preset.
pub fn preset_config(preset: PresetArg) -> RetentionConfig {
    match preset {
        PresetArg::Default => RetentionConfig::default(),
        PresetArg::Aggressive => RetentionConfig::aggressive(),
        PresetArg::Lenient => RetentionConfig::lenient(),
    }
}

/// Render a configuration as TOML or JSON.
pub fn render_config(config: &RetentionConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        OutputFormat::Table => Ok(config.to_toml()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ() {
        let aggressive = preset_config(PresetArg::Aggressive);
        let lenient = preset_config(PresetArg::Lenient);
        assert!(
            aggressive.high_engagement.max_entries < lenient.high_engagement.max_entries
        );
    }

    #[test]
    fn test_render_toml_round_trips() {
        let rendered = render_config(&RetentionConfig::default(), OutputFormat::Table).unwrap();
        assert_eq!(
            RetentionConfig::from_toml(&rendered).unwrap(),
            RetentionConfig::default()
        );
    }

    #[test]
    fn test_render_json() {
        let rendered = render_config(&RetentionConfig::lenient(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(value["performance_constraints"]["max_total_learning_data_mb"].is_number());
    }
}
