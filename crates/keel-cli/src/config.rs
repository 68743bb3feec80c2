//! Project configuration (`keel.toml`)

use anyhow::{Context, Result};
use clap::ValueEnum;
use keel_constraint::Severity;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "keel.toml";

/// Schema directory used when neither the config nor the CLI names one
pub const DEFAULT_SCHEMAS_DIR: &str = "schemas";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Schema directories, loaded in order
    pub schemas: Vec<String>,
    pub format: Option<OutputFormat>,
    /// Rule ids to skip
    pub ignore_rules: Vec<String>,
    /// Per-rule severity overrides
    pub severity: BTreeMap<String, Severity>,
}

impl ConfigFile {
    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Load an explicit config file, or `keel.toml` from the working
    /// directory if present, or fall back to defaults
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Path::new(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE),
            None => return Ok(Self::default()),
        };

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Config schema directories followed by CLI ones; the default
    /// directory when both are empty
    pub fn schema_dirs(&self, cli: &[String]) -> Vec<String> {
        let mut dirs: Vec<String> = self.schemas.iter().chain(cli).cloned().collect();
        if dirs.is_empty() {
            dirs.push(DEFAULT_SCHEMAS_DIR.to_string());
        }
        dirs
    }

    /// Config ignore list plus CLI ignores, without duplicates
    pub fn ignored_rules(&self, cli: &[String]) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.ignore_rules.iter().chain(cli) {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}
