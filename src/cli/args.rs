//! Defines the command-line arguments and subcommands for the rexgen CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::splice::Boundary;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "rexgen",
    version,
    about = "Generates the assertion macros of the rexo test framework header."
)]
pub struct RexgenArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Text opening the generated region (matched at the start of a line).
    #[arg(long, global = true)]
    pub start_marker: Option<String>,

    /// Line closing the generated region.
    #[arg(long, global = true)]
    pub end_marker: Option<String>,

    /// Raise the log level (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl RexgenArgs {
    /// Boundary markers with command-line overrides applied.
    pub fn boundary(&self) -> Boundary {
        let default = Boundary::default();
        Boundary {
            start: self.start_marker.clone().unwrap_or(default.start),
            end: self.end_marker.clone().unwrap_or(default.end),
        }
    }
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Regenerate the assertion macros inside a header, in place.
    Generate {
        /// The header to update.
        #[arg(default_value = "include/rexo.h")]
        header: PathBuf,
    },
    /// Fail with a diff when the header's generated region is out of date.
    Check {
        /// The header to verify.
        #[arg(default_value = "include/rexo.h")]
        header: PathBuf,
    },
    /// Print the generated region to stdout.
    Print,
    /// List every generated macro with its section.
    ListMacros {
        /// Emit JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Dump the built-in macro family catalog as JSON.
    Catalog,
}
