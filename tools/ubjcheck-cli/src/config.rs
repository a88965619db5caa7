//! Config command - show or create the configuration file

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::Path;
use ubjcheck_core::Config;
use ubjcheck_core::config::{config_path, save_to};

use crate::options::load_config;

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Write the default configuration if no file exists yet
    #[arg(long)]
    pub init: bool,
}

/// Execute the config command
pub fn execute(args: ConfigArgs, explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) => path,
            None => bail!("No config directory on this platform; pass --config"),
        },
    };

    if args.init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            save_to(&path, &Config::default())
                .with_context(|| format!("Failed to create {}", path.display()))?;
            println!("Created {}", path.display());
        }
        return Ok(());
    }

    let config = if path.exists() {
        load_config(Some(&path))?
    } else {
        Config::default()
    };
    let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
    println!("# {}", path.display());
    print!("{}", rendered);
    Ok(())
}
