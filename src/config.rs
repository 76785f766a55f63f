use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::DEFAULT_CONFIG_PATH;
use crate::error::{ImportError, Result};
use crate::pipeline::processing::validate::ValidationConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub import: ImportSettings,
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Treat a file without data rows as an ingestion failure
    pub reject_empty_batch: bool,
    /// Worksheet read from workbook formats
    pub sheet_index: usize,
    pub csv_delimiter: char,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            reject_empty_batch: false,
            sheet_index: 0,
            csv_delimiter: ',',
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: String,
    pub file_prefix: String,
    /// Used when RUST_LOG is not set
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: "logs".to_string(),
            file_prefix: "case_import.log".to_string(),
            default_filter: "case_import=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default path when present.
    /// Without either, built-in defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(Path::new(DEFAULT_CONFIG_PATH)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if !self.import.csv_delimiter.is_ascii() {
            return Err(ImportError::Config(format!(
                "csv_delimiter must be a single ASCII character, got '{}'",
                self.import.csv_delimiter
            )));
        }
        Ok(())
    }
}
