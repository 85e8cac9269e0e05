//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for colorizing output, rendering diffs of stale
//! headers, and generating JSON. By centralizing output logic here, we ensure a
//! consistent user experience across all commands.

use std::io::{self, Write};

use difference::{Changeset, Difference};
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{engine::Outcome, engine::Regeneration, expander::MacroListing};

/// Above this many old × new lines, the LCS table gets too large and the diff is summarized.
const MAX_DIFF_CELLS: usize = 4_000_000;

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Reports the result of `generate`.
pub fn print_outcome(path: &std::path::Path, outcome: Outcome) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = match outcome {
        Outcome::Updated => Color::Green,
        Outcome::Unchanged => Color::Cyan,
    };
    stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stdout, "{}", outcome.as_str())?;
    stdout.reset()?;
    writeln!(stdout, " {}", path.display())
}

/// Prints the diff between a header and its regenerated form.
pub fn print_regeneration_diff(regeneration: &Regeneration) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(stdout, "--- {} (stale)", regeneration.path.display())?;
    writeln!(stdout, "+++ {} (regenerated)", regeneration.path.display())?;
    stdout.reset()?;
    print_diff(&mut stdout, &regeneration.original, &regeneration.updated)
}

/// Prints macro names, one per line, or as a JSON array.
pub fn print_listing(listing: &[MacroListing], json: bool) -> io::Result<()> {
    if json {
        return print_json(&listing);
    }
    let mut stdout = io::stdout().lock();
    let mut current = None;
    for entry in listing {
        if current != Some(entry.section) {
            writeln!(stdout, "# {}", entry.section)?;
            current = Some(entry.section);
        }
        match entry.capability {
            Some(capability) => writeln!(stdout, "{} [{capability}]", entry.name)?,
            None => writeln!(stdout, "{}", entry.name)?,
        }
    }
    Ok(())
}

/// Pretty-prints any serializable value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

/// Line diff restricted to the span between the common leading and trailing lines.
fn print_diff(stdout: &mut StandardStream, original: &str, updated: &str) -> io::Result<()> {
    let old: Vec<&str> = original.lines().collect();
    let new: Vec<&str> = updated.lines().collect();
    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    writeln!(stdout, "@@ line {} @@", prefix + 1)?;
    stdout.reset()?;

    if old_mid.len().saturating_mul(new_mid.len()) > MAX_DIFF_CELLS {
        writeln!(
            stdout,
            "{} lines replaced by {} lines",
            old_mid.len(),
            new_mid.len()
        )?;
        return Ok(());
    }

    let changeset = Changeset::new(&old_mid.join("\n"), &new_mid.join("\n"), "\n");
    for diff in &changeset.diffs {
        let (sign, color, text) = match diff {
            Difference::Same(x) => (' ', None, x),
            Difference::Add(x) => ('+', Some(Color::Green), x),
            Difference::Rem(x) => ('-', Some(Color::Red), x),
        };
        stdout.set_color(ColorSpec::new().set_fg(color))?;
        for line in text.split('\n') {
            writeln!(stdout, "{sign}{line}")?;
        }
    }
    stdout.reset()
}
