use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::{
    errors::ExpenseError,
    utils::{ensure_dir, PathResolver},
    validation::normalize_period,
};
use crate::domain::Period;
use crate::storage::json_backend::write_atomic;

/// User preferences persisted next to the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub default_period: Period,
    pub confirm_deletions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            default_period: Period::Daily,
            confirm_deletions: true,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 3] = ["currency_symbol", "default_period", "confirm_deletions"];

    /// Updates a single setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ExpenseError> {
        match key {
            "currency_symbol" => {
                let symbol = value.trim();
                if symbol.is_empty() || symbol.chars().count() > 4 {
                    return Err(ExpenseError::ConfigError(
                        "currency_symbol must be 1-4 characters".into(),
                    ));
                }
                self.currency_symbol = symbol.to_string();
            }
            "default_period" => self.default_period = normalize_period(value),
            "confirm_deletions" => {
                self.confirm_deletions = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => {
                        return Err(ExpenseError::ConfigError(format!(
                            "expected true or false, got `{other}`"
                        )))
                    }
                };
            }
            other => {
                return Err(ExpenseError::ConfigError(format!(
                    "unknown setting `{other}` (expected one of {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// Formats an amount with the configured currency symbol.
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{}{:.2}", self.currency_symbol, amount)
    }
}

/// Loads and saves [`Config`] as JSON.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ExpenseError> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the config file. An absent or unreadable file yields defaults.
    pub fn load(&self) -> Result<Config, ExpenseError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&data) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring malformed config");
                Ok(Config::default())
            }
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ExpenseError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
