//! ubjcheck - round-trip checker for generator state encodings
//!
//! # Commands
//!
//! - `ubjcheck run` - Round-trip the state through every pipeline and print the report
//! - `ubjcheck encode` - Write one encoded document to a file or stdout
//! - `ubjcheck decode` - Read an encoded document and print its state words
//! - `ubjcheck config` - Show (or create) the configuration file
//!
//! # Usage
//!
//! ```bash
//! # Default demonstration state through all pipelines
//! ubjcheck run
//!
//! # Custom words, binary pipelines only
//! ubjcheck run --state0 0xDEADBEEF --state1 -1 --pipeline binary --pipeline binary-lz4
//!
//! # Encode to a file, then decode it again
//! ubjcheck encode --format binary-lz4 --output state.bin
//! ubjcheck decode --format binary-lz4 state.bin
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `info`).

mod config;
mod decode;
mod encode;
mod options;
mod run;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ubjcheck - round-trip checker for generator state encodings
#[derive(Parser)]
#[command(name = "ubjcheck")]
#[command(about = "Round-trip generator state through JSON, UBJSON and LZ4")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Round-trip the state through pipelines and print the report
    Run(run::RunArgs),

    /// Write one encoded document
    Encode(encode::EncodeArgs),

    /// Decode a document and print its state words
    Decode(decode::DecodeArgs),

    /// Show or create the configuration file
    Config(config::ConfigArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Run(args) => run::execute(args, config_path),
        Commands::Encode(args) => encode::execute(args, config_path),
        Commands::Decode(args) => decode::execute(args, config_path),
        Commands::Config(args) => config::execute(args, config_path),
    }
}
