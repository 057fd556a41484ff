//! Configuration handling
//!
//! Defaults live in code; a `canon.toml` in the working directory overrides
//! them, and a global `~/.config/canon/config.toml` (via `directories`)
//! applies when no local file exists. Every field has a default so partial
//! files are fine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Defaults for `canon dict`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Minimum word length, in characters
    pub min_len: usize,

    /// Maximum word length, in characters
    pub max_len: usize,

    /// Percentage of surviving words to randomly discard
    pub reduction_percent: f64,

    /// Write minified JSON
    pub minify: bool,

    /// Default output filename
    pub filename: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            min_len: 4,
            max_len: 9,
            reduction_percent: 80.0,
            minify: true,
            filename: "dictionary.json".to_string(),
        }
    }
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language key used when `extract` is not given one
    pub default_language: String,

    /// Language keys `extract` accepts; empty disables the check
    pub languages: Vec<String>,

    /// Default output filename for the numbered text
    pub formatted_filename: String,

    /// Default output filename for the per-book summary log
    pub summary_filename: String,

    /// Default output filename for the structured document
    pub tree_filename: String,

    /// Dictionary generation defaults
    pub dictionary: DictionaryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: "english".to_string(),
            languages: [
                "english",
                "romanian",
                "french",
                "spanish",
                "german",
                "portuguese",
                "italian",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            formatted_filename: "formatted_bible_niv.txt".to_string(),
            summary_filename: "niv_summary_log.txt".to_string(),
            tree_filename: "bible_data.json".to_string(),
            dictionary: DictionaryConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration: `./canon.toml` first, then the global file,
    /// then built-in defaults.
    pub fn load() -> Result<Self> {
        let local = Path::new("canon.toml");
        if local.is_file() {
            return Self::from_file(local);
        }

        if let Some(dir) = Self::global_config_dir() {
            let global = dir.join("config.toml");
            if global.is_file() {
                return Self::from_file(&global);
            }
        }

        Ok(Self::default())
    }

    /// Loads configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "canon", "canon-cli").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns true when `key` is an accepted language key.
    pub fn language_allowed(&self, key: &str) -> bool {
        self.languages.is_empty() || self.languages.iter().any(|l| l == key)
    }
}
