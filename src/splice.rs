//! Replacement of the generated region inside a hand-authored document.
//!
//! The region starts at a line beginning with the start marker and stops right before the last
//! whole line equal to the end marker. The generator re-emits the start marker itself (it is the
//! title of the first section header), so replacing from the marker onwards is idempotent.
//!
//! Documents with CRLF line endings are accepted. When the end marker line ends in `\r\n`,
//! the generated text is written with the same endings.

use std::borrow::Cow;

use regex::Regex;
use tracing::debug;

use crate::{expander::HELPERS_TITLE, RexgenError, Result};

pub const DEFAULT_END_MARKER: &str = "#endif /* REXO_REXO_H */";

/// Literal start and end markers delimiting the generated region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub start: String,
    pub end: String,
}

impl Default for Boundary {
    fn default() -> Self {
        Self {
            start: format!("/* {HELPERS_TITLE}"),
            end: DEFAULT_END_MARKER.to_string(),
        }
    }
}

impl Boundary {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    fn start_pattern(&self) -> Regex {
        line_pattern(&format!("^{}", regex::escape(&self.start)))
    }

    fn end_pattern(&self) -> Regex {
        line_pattern(&format!("^{}\\r?$", regex::escape(&self.end)))
    }

    /// Byte range of the region owned by the generator.
    pub fn locate(&self, document: &str) -> Result<std::ops::Range<usize>> {
        let Some(start) = self.start_pattern().find(document).map(|m| m.start()) else {
            return Err(RexgenError::missing_boundary(document, "start", &self.start));
        };

        let end_pattern = self.end_pattern();
        let end = end_pattern
            .find_iter(&document[start..])
            .last()
            .map(|m| start + m.start());
        match end {
            Some(end) => {
                debug!(start, end, "located generated region");
                Ok(start..end)
            }
            None => match end_pattern.find(document) {
                Some(found) => Err(RexgenError::misplaced_boundary(
                    document,
                    &self.end,
                    found.start(),
                )),
                None => Err(RexgenError::missing_boundary(document, "end", &self.end)),
            },
        }
    }
}

fn line_pattern(pattern: &str) -> Regex {
    // Escaped literals always form a valid pattern.
    Regex::new(&format!("(?m){pattern}")).unwrap_or_else(|e| unreachable!("{e}"))
}

/// Returns `document` with the generated region replaced by `generated`.
pub fn splice(document: &str, boundary: &Boundary, generated: &str) -> Result<String> {
    let region = boundary.locate(document)?;
    let crlf = document[region.end + boundary.end.len()..].starts_with("\r\n");
    let generated = if crlf {
        Cow::Owned(generated.replace('\n', "\r\n"))
    } else {
        Cow::Borrowed(generated)
    };
    let mut out = String::with_capacity(document.len() - region.len() + generated.len());
    out.push_str(&document[..region.start]);
    out.push_str(&generated);
    out.push_str(&document[region.end..]);
    Ok(out)
}
