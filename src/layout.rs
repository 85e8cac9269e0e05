//! Pure text layout for generated preprocessor definitions.
//!
//! A multi-line macro is only valid if every line but the last ends with a line continuation.
//! `format_macro` is the one place that guarantees it.

/// Column at which continuation markers are placed.
pub const CONTINUATION_COLUMN: usize = 79;

/// Width of the title cell of a section header, before the trailing emblem.
const HEADER_TITLE_WIDTH: usize = 67;
const HEADER_EMBLEM: &str = "O-(''Q)";
const HEADER_RULE_WIDTH: usize = 74;

/// Lays out the logical lines of one macro definition.
///
/// Every line is indented first, then every line except the last is right-padded to
/// `CONTINUATION_COLUMN` and terminated with `\`. Lines already at or past that column get the
/// marker appended directly. The block ends with a newline.
pub fn format_macro<S: AsRef<str>>(lines: &[S], indent: usize) -> String {
    let padding = " ".repeat(indent);
    let last = lines.len().saturating_sub(1);
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        let line = format!("{padding}{}", line.as_ref());
        if i < last {
            out.push_str(&format!("{line:<CONTINUATION_COLUMN$}\\"));
        } else {
            out.push_str(&line);
        }
        out.push('\n');
    }
    out
}

/// Renders the decorative two-line comment opening each generated section.
pub fn section_header(title: &str) -> String {
    let opening = format!("/* {title}");
    format!(
        "{opening:<HEADER_TITLE_WIDTH$}{HEADER_EMBLEM}\n   {} */\n",
        "-".repeat(HEADER_RULE_WIDTH)
    )
}
