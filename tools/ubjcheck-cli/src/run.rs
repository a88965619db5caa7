//! Run command - round-trip the state and print the report

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::Path;
use ubjcheck_core::{CodecOptions, Pipeline, Report, StateCodec};

use crate::options::{StateArgs, load_config};

/// Arguments for the run command
#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub state: StateArgs,

    /// Pipeline to run (repeatable; defaults to the configured list)
    #[arg(long = "pipeline", value_name = "PIPELINE")]
    pub pipelines: Vec<Pipeline>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

/// Execute the run command
pub fn execute(args: RunArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let state = args.state.resolve(&config)?;
    let pipelines = if args.pipelines.is_empty() {
        config.pipelines().context("Invalid [run] pipelines in config")?
    } else {
        args.pipelines
    };
    let options = CodecOptions {
        pretty_text: config.text.pretty && !args.compact,
        ..config.codec_options()
    };

    tracing::info!("Round-tripping {} through {} pipelines", state, pipelines.len());
    let report = StateCodec::new(options)
        .run_all(&state, &pipelines)
        .context("Codec failure during round trip")?;

    println!("{}", report);
    check(&report)
}

/// Fail when any pipeline lost or changed the state
fn check(report: &Report) -> Result<()> {
    if !report.is_lossless() {
        bail!("round trip did not reproduce the original state");
    }
    if !report.pipelines_agree() {
        bail!("pipelines produced different states");
    }
    Ok(())
}
