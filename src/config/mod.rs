// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for seqsort.
//!
//! This module provides the YAML configuration for the editor: where the
//! sequences & songs document lives, how saves are backed up, logging,
//! UI refresh and keyboard overrides.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::project::store::DEFAULT_DOCUMENT_NAME;
use crate::project::FsProjectStore;

/// Configuration file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "seqsort.yaml";

/// Root editor configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EditorConfig {
    /// Project layout
    #[serde(default)]
    pub project: ProjectConfig,
    /// Save backups
    #[serde(default)]
    pub backup: BackupConfig,
    /// Log output
    #[serde(default)]
    pub log: LogConfig,
    /// Terminal UI
    #[serde(default)]
    pub ui: UiConfig,
    /// Keyboard overrides (key -> action name)
    #[serde(default)]
    pub keyboard: HashMap<String, String>,
}

impl EditorConfig {
    /// Load a configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))
    }

    /// Resolve the configuration to use
    ///
    /// An explicit path must load. Otherwise `seqsort.yaml` in `dir` is
    /// used when present, and defaults when not.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let fallback = dir.join(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            Self::load(&fallback)
        } else {
            Ok(Self::default())
        }
    }

    /// Build the filesystem store this configuration describes
    pub fn store(&self) -> FsProjectStore {
        FsProjectStore::new()
            .with_document_name(self.project.document_name.clone())
            .with_backup_root(self.backup.dir.clone())
            .keep_backup(self.backup.keep)
    }
}

/// Project layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Name of the sequences & songs document in the data directory
    #[serde(default = "default_document_name")]
    pub document_name: String,
}

fn default_document_name() -> String {
    DEFAULT_DOCUMENT_NAME.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            document_name: default_document_name(),
        }
    }
}

/// Save backups
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BackupConfig {
    /// Directory for backups (system temp dir if unset)
    #[serde(default)]
    pub dir: Option<PathBuf>,
    /// Keep the backup after a successful save
    #[serde(default)]
    pub keep: bool,
}

/// Log output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogConfig {
    /// Log file (the terminal belongs to the UI)
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    /// Maximum level: trace, debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_file() -> PathBuf {
    PathBuf::from("seqsort.log")
}
fn default_log_level() -> String {
    "info".to_string()
}

impl LogConfig {
    /// Parsed log level
    pub fn level(&self) -> Result<Level> {
        self.level
            .parse()
            .map_err(|_| anyhow::anyhow!("Unknown log level: {}", self.level))
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

/// Terminal UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    /// Redraws per second while idle
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

fn default_frame_rate() -> u32 {
    30
}

impl UiConfig {
    /// Input poll timeout between redraws
    pub fn tick_ms(&self) -> u64 {
        1000 / u64::from(self.frame_rate.max(1))
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            frame_rate: default_frame_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
project:
  document_name: "Songs.xal"

backup:
  dir: /var/tmp/seqsort
  keep: true

log:
  file: editor.log
  level: debug

ui:
  frame_rate: 20

keyboard:
  w: move_up
  ctrl+w: save
"#;

        let config = EditorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.project.document_name, "Songs.xal");
        assert_eq!(config.backup.dir, Some(PathBuf::from("/var/tmp/seqsort")));
        assert!(config.backup.keep);
        assert_eq!(config.log.file, PathBuf::from("editor.log"));
        assert_eq!(config.log.level().unwrap(), Level::DEBUG);
        assert_eq!(config.ui.frame_rate, 20);
        assert_eq!(config.ui.tick_ms(), 50);
        assert_eq!(config.keyboard.get("w"), Some(&"move_up".to_string()));
        assert_eq!(config.keyboard.len(), 2);
    }

    #[test]
    fn test_default_values() {
        let config = EditorConfig::from_yaml("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.project.document_name, DEFAULT_DOCUMENT_NAME);
        assert_eq!(config.backup.dir, None);
        assert!(!config.backup.keep);
        assert_eq!(config.log.level().unwrap(), Level::INFO);
        assert_eq!(config.ui.frame_rate, 30);
        assert!(config.keyboard.is_empty());
    }

    #[test]
    fn test_partial_section() {
        let config = EditorConfig::from_yaml("log:\n  level: warn\n").unwrap();
        assert_eq!(config.log.file, PathBuf::from("seqsort.log"));
        assert_eq!(config.log.level().unwrap(), Level::WARN);
    }

    #[test]
    fn test_bad_log_level() {
        let config = EditorConfig::from_yaml("log:\n  level: loud\n").unwrap();
        assert!(config.log.level().is_err());
    }

    #[test]
    fn test_round_trip() {
        let mut original = EditorConfig::default();
        original.backup.keep = true;
        original.ui.frame_rate = 10;
        original
            .keyboard
            .insert("x".to_string(), "delete".to_string());

        let yaml = original.to_yaml().unwrap();
        let parsed = EditorConfig::from_yaml(&yaml).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        let config = EditorConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, EditorConfig::default());

        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "backup:\n  keep: true\n").unwrap();
        let config = EditorConfig::discover(None, dir.path()).unwrap();
        assert!(config.backup.keep);

        let missing = dir.path().join("missing.yaml");
        assert!(EditorConfig::discover(Some(&missing), dir.path()).is_err());
    }

    #[test]
    fn test_store_from_config() {
        let config = EditorConfig::from_yaml("project:\n  document_name: Other.xal\n").unwrap();
        let store = config.store();
        assert_eq!(store.document_name(), "Other.xal");
    }
}
