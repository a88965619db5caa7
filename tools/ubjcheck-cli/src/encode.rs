//! Encode command - write one encoded document

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};
use ubjcheck_core::{Pipeline, StateCodec};

use crate::options::{StateArgs, load_config};

/// Arguments for the encode command
#[derive(Args)]
pub struct EncodeArgs {
    /// Encoding to produce (text, binary, binary-lz4, text-lz4)
    #[arg(short, long)]
    pub format: Pipeline,

    #[command(flatten)]
    pub state: StateArgs,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the encode command
pub fn execute(args: EncodeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let state = args.state.resolve(&config)?;
    let codec = StateCodec::new(config.codec_options());

    let encoded = codec
        .encode_with(args.format, &state)
        .with_context(|| format!("Failed to encode as {}", args.format))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &encoded)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} bytes ({}) to {}", encoded.len(), args.format, path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&encoded).context("Failed to write to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
