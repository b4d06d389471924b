// TOML config adapter - Application settings file

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::model::HashAlgorithm;
use crate::domain::pixel_format::PixelFormatInfo;
use crate::output::OutputFormat;
use crate::utils::logging::LogFormat;

/// Settings file looked up in the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "mediacheck.toml";

/// Contents of the settings file. Every value is optional so that the
/// precedence chain can tell "set in the file" from "left to defaults".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub check: CheckSection,
    #[serde(default)]
    pub logging: LoggingSection,
    /// Extra or replacement pixel-format classifications
    #[serde(default)]
    pub pixel_formats: HashMap<String, PixelFormatInfo>,
}

/// `[check]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckSection {
    pub hash_algorithm: Option<HashAlgorithm>,
    pub sample_frames: Option<usize>,
    pub output_format: Option<OutputFormat>,
    pub pretty: Option<bool>,
    pub jobs: Option<usize>,
    pub out_dir: Option<PathBuf>,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

/// TOML configuration adapter
#[derive(Debug, Clone, Default)]
pub struct TomlConfigAdapter {
    config: AppConfig,
    source: Option<PathBuf>,
}

impl TomlConfigAdapter {
    /// Adapter holding an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a settings file that must exist
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::BadArgs(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            DomainError::BadArgs(message) => {
                DomainError::BadArgs(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;

        debug!("Loaded configuration from: {}", path.display());
        Ok(Self {
            config,
            source: Some(path.to_path_buf()),
        })
    }

    /// Load the named settings file, or `./mediacheck.toml` when present,
    /// or fall back to an empty configuration
    pub fn discover(explicit: Option<&Path>) -> Result<Self, DomainError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            return Self::load(default_path);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::new())
    }

    /// Deserialize settings from TOML text
    pub fn parse(toml_content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::BadArgs(format!("Failed to parse TOML config: {}", e)))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Path the configuration was read from, if any
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn into_config(self) -> AppConfig {
        self.config
    }
}
