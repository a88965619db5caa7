//! Options shared by several commands

use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;
use ubjcheck_core::config::{self, parse_word};
use ubjcheck_core::{Config, GeneratorState};

/// State word overrides
#[derive(Args, Debug, Default)]
pub struct StateArgs {
    /// Word 0 (decimal, 0x hex, or negative decimal)
    #[arg(long, value_parser = parse_word, allow_hyphen_values = true)]
    pub state0: Option<u64>,

    /// Word 1 (decimal, 0x hex, or negative decimal)
    #[arg(long, value_parser = parse_word, allow_hyphen_values = true)]
    pub state1: Option<u64>,
}

impl StateArgs {
    /// Configured state with command-line words applied on top
    pub fn resolve(&self, config: &Config) -> Result<GeneratorState> {
        let base = config.state().context("Invalid [state] in config")?;
        Ok(GeneratorState::new(
            self.state0.unwrap_or(base.state0),
            self.state1.unwrap_or(base.state1),
        ))
    }
}

/// Load an explicit config file, or the platform default with fallback
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(config::load()),
    }
}
