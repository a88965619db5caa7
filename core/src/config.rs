//! Configuration management (`<config dir>/ubjcheck/config.toml`)
//!
//! Every section and key is optional. State words are stored as strings so
//! that the full unsigned range can be written in hex.

use crate::codec::CodecOptions;
use crate::pipeline::{Pipeline, UnknownPipeline};
use crate::state::{DEMO_STATE0, DEMO_STATE1, GeneratorState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Generator state to round-trip
    #[serde(default)]
    pub state: StateConfig,
    /// Text form settings
    #[serde(default)]
    pub text: TextConfig,
    /// Binary form settings
    #[serde(default)]
    pub binary: BinaryConfig,
    /// Which pipelines `run` executes
    #[serde(default)]
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateConfig {
    /// Word 0: decimal, `0x` hex, or negative decimal
    #[serde(default = "default_state0")]
    pub state0: String,
    /// Word 1: decimal, `0x` hex, or negative decimal
    #[serde(default = "default_state1")]
    pub state1: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Pretty-print JSON (default: true)
    #[serde(default = "default_true")]
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryConfig {
    /// Smallest integer markers (default: true)
    #[serde(default = "default_true")]
    pub compact_integers: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Pipeline names (default: all four)
    #[serde(default = "default_pipelines")]
    pub pipelines: Vec<String>,
}

fn default_state0() -> String {
    format!("0x{:016X}", DEMO_STATE0)
}
fn default_state1() -> String {
    format!("0x{:016X}", DEMO_STATE1)
}
fn default_true() -> bool {
    true
}
fn default_pipelines() -> Vec<String> {
    Pipeline::ALL.iter().map(|p| p.name().to_string()).collect()
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            state0: default_state0(),
            state1: default_state1(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            pretty: default_true(),
        }
    }
}

impl Default for BinaryConfig {
    fn default() -> Self {
        Self {
            compact_integers: default_true(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pipelines: default_pipelines(),
        }
    }
}

/// Errors from loading or interpreting configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid state word '{value}': {reason}")]
    InvalidWord { value: String, reason: String },

    #[error(transparent)]
    UnknownPipeline(#[from] UnknownPipeline),
}

impl Config {
    /// State words, parsed
    pub fn state(&self) -> Result<GeneratorState, ConfigError> {
        Ok(GeneratorState::new(
            parse_word(&self.state.state0)?,
            parse_word(&self.state.state1)?,
        ))
    }

    /// Pipeline names, parsed
    pub fn pipelines(&self) -> Result<Vec<Pipeline>, ConfigError> {
        self.run
            .pipelines
            .iter()
            .map(|name| name.parse::<Pipeline>().map_err(ConfigError::from))
            .collect()
    }

    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            pretty_text: self.text.pretty,
            compact_integers: self.binary.compact_integers,
        }
    }
}

/// Parse a state word: decimal, `0x` hex (underscores allowed), or negative
/// decimal reinterpreted as its two's-complement bit pattern.
pub fn parse_word(s: &str) -> Result<u64, ConfigError> {
    let trimmed = s.trim();
    let invalid = |reason: String| ConfigError::InvalidWord {
        value: s.to_string(),
        reason,
    };

    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        let digits: String = hex.chars().filter(|c| *c != '_').collect();
        return u64::from_str_radix(&digits, 16).map_err(|e| invalid(e.to_string()));
    }
    if trimmed.starts_with('-') {
        return trimmed
            .parse::<i64>()
            .map(|v| v as u64)
            .map_err(|e| invalid(e.to_string()));
    }
    trimmed.parse::<u64>().map_err(|e| invalid(e.to_string()))
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/ubjcheck`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "", "ubjcheck").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default config file path, if a config directory exists on this platform
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Loads the configuration from the platform config directory.
///
/// Returns defaults if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            Config::default()
        }
    }
}

/// Loads the configuration from an explicit path
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the configuration, creating parent directories as needed
pub fn save_to(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }
    std::fs::write(path, content).map_err(write_err)
}
