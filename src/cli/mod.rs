//! The rexgen Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::{path::Path, process};

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::args::{Command, RexgenArgs},
    diagnostics::print_error,
    engine::GenerationPipeline,
    RexgenError, Result,
};

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = RexgenArgs::parse();
    init_tracing(args.verbose);

    let pipeline = GenerationPipeline::new(crate::catalog::Catalog::builtin(), args.boundary());

    // Dispatch to the appropriate subcommand handler.
    let result = match &args.command {
        Command::Generate { header } => handle_generate(&pipeline, header),
        Command::Check { header } => handle_check(&pipeline, header),
        Command::Print => handle_print(&pipeline),
        Command::ListMacros { json } => handle_list_macros(&pipeline, *json),
        Command::Catalog => stdout_result(output::print_json(&pipeline.catalog)),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            print_error(e);
            process::exit(1);
        }
    }
}

/// Logs go to stderr. `RUST_LOG` applies when set, `warn` otherwise; `-v` raises the level.
fn init_tracing(verbose: u8) {
    let mut filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();
    match verbose {
        0 => {}
        1 => filter = filter.add_directive(Level::INFO.into()),
        _ => filter = filter.add_directive(Level::DEBUG.into()),
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Handlers return `Ok(false)` when the command ran but must exit unsuccessfully.

fn handle_generate(pipeline: &GenerationPipeline, header: &Path) -> Result<bool> {
    let outcome = pipeline.regenerate(header)?;
    stdout_result(output::print_outcome(header, outcome))
}

fn handle_check(pipeline: &GenerationPipeline, header: &Path) -> Result<bool> {
    let regeneration = pipeline.check(header)?;
    if !regeneration.is_stale() {
        return Ok(true);
    }
    output::print_regeneration_diff(&regeneration)
        .map_err(|e| RexgenError::io(Path::new("<stdout>"), e))?;
    Ok(false)
}

fn handle_print(pipeline: &GenerationPipeline) -> Result<bool> {
    let region = pipeline.generate()?;
    print!("{region}");
    Ok(true)
}

fn handle_list_macros(pipeline: &GenerationPipeline, json: bool) -> Result<bool> {
    let listing = pipeline.listing()?;
    stdout_result(output::print_listing(&listing, json))
}

fn stdout_result(result: std::io::Result<()>) -> Result<bool> {
    result
        .map(|_| true)
        .map_err(|e| RexgenError::io(Path::new("<stdout>"), e))
}
