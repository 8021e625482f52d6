//! # notetrack - pitch track to note list
//!
//! Command line front end for `notetrack-core`. It reads pitch tracks
//! written by an external pitch estimator, segments them into notes and
//! prints the result as JSON or as a table.
//!
//! ## Architecture
//! - **Main Thread**: argument parsing, config resolution and output
//! - **Worker Threads**: one segmentation per input file (see [`batch`])
//! - **Communication**: crossbeam channels carry jobs out and results back

mod batch;
mod cli;
mod input;
mod output;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use notetrack_core::SegmenterConfig;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use cli::{Cli, Commands, DefaultsCommand, NameCommand, OutputFormat, SegmentCommand};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        error!("[MAIN] {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Segment(cmd) => run_segment(cmd),
        Commands::Name(cmd) => run_name(cmd),
        Commands::Defaults(cmd) => run_defaults(cmd),
    }
}

fn run_segment(cmd: SegmentCommand) -> Result<()> {
    let config = settings::resolve_config(&cmd)?;
    info!("[MAIN] Segmenting {} input(s) with {:?}", cmd.inputs.len(), config);

    let reports = batch::analyze_all(&cmd.inputs, &config, cmd.jobs)?;
    let rendered = match cmd.format {
        OutputFormat::Json => output::render_json(&reports)?,
        OutputFormat::Table => output::render_table(&reports)?,
    };
    emit(&rendered, cmd.output.as_deref())
}

fn run_name(cmd: NameCommand) -> Result<()> {
    let rendered = output::render_note_names(&cmd.frequencies)?;
    emit(&rendered, None)
}

fn run_defaults(cmd: DefaultsCommand) -> Result<()> {
    let config = SegmenterConfig::default();
    match cmd.output {
        Some(path) => {
            settings::save_config(&config, &path)?;
            info!("[MAIN] Default config saved to {}", path.display());
            Ok(())
        }
        None => emit(&serde_json::to_string_pretty(&config)?, None),
    }
}

/// Writes `text` to `path`, or to stdout when no path is given.
fn emit(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            let mut file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            writeln!(file, "{}", text.trim_end())
                .with_context(|| format!("writing {}", path.display()))?;
            info!("[MAIN] Output written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", text.trim_end())?;
        }
    }
    Ok(())
}
