//! Shared fixtures for the rexgen integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rexgen::expander::{MacroDefinition, Section, SectionBody};

/// Hand-authored header with a stale generated region.
pub const FIXTURE_HEADER: &str = include_str!("../fixtures/rexo.h");

/// Writes the fixture header into `dir` and returns its path.
pub fn write_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("rexo.h");
    std::fs::write(&path, FIXTURE_HEADER).expect("write fixture header");
    path
}

/// Every definition of every section, paired with its section title.
pub fn definitions(sections: &[Section]) -> Vec<(&'static str, &MacroDefinition)> {
    let mut defs = Vec::new();
    for section in sections {
        match &section.body {
            SectionBody::Plain(list) => defs.extend(list.iter().map(|d| (section.title, d))),
            SectionBody::Switched { variadic, fallback } => {
                defs.extend(variadic.iter().map(|d| (section.title, d)));
                defs.extend(fallback.iter().map(|d| (section.title, d)));
            }
        }
    }
    defs
}

/// The comma-separated trailing arguments forwarded by a definition (its second-to-last line).
pub fn forwarded_args(def: &MacroDefinition) -> Vec<String> {
    let lines: Vec<&str> = def.text.lines().collect();
    let line = lines[lines.len() - 2].trim_end_matches('\\');
    line.split(',').map(|a| a.trim().to_string()).collect()
}

/// The lines after the closing parenthesis of the parameter list.
pub fn body(def: &MacroDefinition) -> String {
    def.text
        .lines()
        .map(|l| l.trim_end_matches('\\').trim_end())
        .skip_while(|l| l.trim() != ")")
        .skip(1)
        .collect::<Vec<_>>()
        .join("\n")
}
