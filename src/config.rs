use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::compilers::OutputFormat;

pub const CONFIG_FILE_NAME: &str = ".extractrc.json";

/// Project configuration. Every field is optional; command-line arguments
/// take precedence.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_indentation: Option<String>,
    pub replace: bool,
    pub sort: bool,
    pub clean: bool,
    pub key_as_default_value: bool,
    pub null_as_default_value: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipe_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_name: Option<String>,
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns and for enabling both
    /// default-value modes.
    pub fn validate(&self) -> Result<()> {
        for pattern in self.patterns.iter().flatten() {
            Pattern::new(pattern.trim_start_matches('/'))
                .with_context(|| format!("Invalid glob pattern in 'patterns': \"{}\"", pattern))?;
        }

        if self.key_as_default_value && self.null_as_default_value {
            bail!("'keyAsDefaultValue' and 'nullAsDefaultValue' cannot both be enabled");
        }

        for (field, value) in [
            ("serviceName", &self.service_name),
            ("methodName", &self.method_name),
            ("pipeName", &self.pipe_name),
            ("markerName", &self.marker_name),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                bail!("'{}' must not be empty", field);
            }
        }

        Ok(())
    }
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the loaded file, `None` when using defaults.
    pub path: Option<PathBuf>,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
