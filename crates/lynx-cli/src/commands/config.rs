//! Config command handlers
//!
//! Keys are parsed into a [`ConfigKey`] before the file is loaded, so an
//! unknown key or a bad value leaves the config file untouched.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use lynx_core::Config;

use super::check_name;
use crate::output::{Output, OutputFormat};

/// A settable configuration key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DataDir,
    Database,
    Verbose,
    DefaultName,
}

impl ConfigKey {
    const ALL: [ConfigKey; 4] = [
        ConfigKey::DataDir,
        ConfigKey::Database,
        ConfigKey::Verbose,
        ConfigKey::DefaultName,
    ];

    fn as_str(self) -> &'static str {
        match self {
            ConfigKey::DataDir => "data_dir",
            ConfigKey::Database => "database",
            ConfigKey::Verbose => "verbose",
            ConfigKey::DefaultName => "default_name",
        }
    }

    /// Current value as shown to the user
    fn read(self, config: &Config) -> String {
        match self {
            ConfigKey::DataDir => config.data_dir.display().to_string(),
            ConfigKey::Database => config
                .database
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(not set)".to_string()),
            ConfigKey::Verbose => config.verbose.to_string(),
            ConfigKey::DefaultName => config.default_name.clone(),
        }
    }

    /// Parse `value` and store it in `config`
    fn write(self, config: &mut Config, value: &str) -> Result<()> {
        match self {
            ConfigKey::DataDir => config.data_dir = PathBuf::from(value),
            // "" or "none" unsets the explicit database file
            ConfigKey::Database => {
                config.database = match value {
                    "" | "none" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            ConfigKey::Verbose => {
                config.verbose = value.parse().with_context(|| {
                    format!("Invalid value for verbose: '{}'. Use 'true' or 'false'.", value)
                })?
            }
            ConfigKey::DefaultName => {
                check_name("Default name", value)?;
                config.default_name = value.to_string();
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|key| key.as_str()).collect();
                anyhow!(
                    "Unknown configuration key: '{}'\nValid keys: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

/// Config file in effect: `--config`, then `LYNX_CONFIG`, then the default
fn config_file(config_path: Option<&PathBuf>) -> PathBuf {
    config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path)
}

/// Show the effective configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let file = config_file(config_path);
    let config = Config::load_from_path(&file).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&config)?;
            value["database_path"] = serde_json::json!(config.database_path());
            value["config_file"] = serde_json::json!(file);
            println!("{}", value);
        }
        OutputFormat::Quiet => {
            println!("{}", config.database_path().display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            for key in ConfigKey::ALL {
                println!("  {:<14}{}", format!("{}:", key), key.read(&config));
            }
            println!();
            println!("Database file: {}", config.database_path().display());
            println!("Config file:   {}", file.display());
        }
    }

    Ok(())
}

/// Set one configuration value and write the config file
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let key: ConfigKey = key.parse()?;
    let file = config_file(config_path);
    let mut config = Config::load_from_path(&file).context("Failed to load configuration")?;

    key.write(&mut config, &value)?;
    config
        .save_to_path(&file)
        .with_context(|| format!("Failed to save configuration to {}", file.display()))?;

    output.success(&format!("Set {} = {}", key, key.read(&config)));
    Ok(())
}
