//! Decode command - read an encoded document and print its state words

use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};
use ubjcheck_core::{GeneratorState, Pipeline, StateCodec};

use crate::options::load_config;

/// Arguments for the decode command
#[derive(Args)]
pub struct DecodeArgs {
    /// Encoding of the input (text, binary, binary-lz4, text-lz4)
    #[arg(short, long)]
    pub format: Pipeline,

    /// Input file, or `-` for stdin
    pub input: PathBuf,
}

/// Execute the decode command
pub fn execute(args: DecodeArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let codec = StateCodec::new(config.codec_options());

    let bytes = read_input(&args.input)?;
    let state = codec
        .decode_with(args.format, &bytes)
        .with_context(|| format!("Failed to decode {} as {}", args.input.display(), args.format))?;

    tracing::debug!("Decoded {} bytes", bytes.len());
    print!("{}", describe(&state));
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .context("Failed to read stdin")?;
        return Ok(bytes);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// One line per word: signed decimal and hex
fn describe(state: &GeneratorState) -> String {
    let (s0, s1) = state.signed_words();
    format!(
        "state0 = {} (0x{:016X})\nstate1 = {} (0x{:016X})\n",
        s0, state.state0, s1, state.state1
    )
}
