//! # Diagnostics
//!
//! ## Overview
//!
//! This module defines the `miette`-based diagnostic type for the rexgen pipeline. Every failure
//! produced by catalog validation, expansion, boundary search, or file access is one of the three
//! `RexgenError` variants. None of them is recoverable: the pipeline aborts before anything is
//! written back to the target document.
//!
//! ## Error Construction Macros
//!
//! - **Use `defect!` for catalog and expansion defects.**
//!   - `defect!("INT/COMPARISON", "unresolved helper parameter `{}`", name)`
//!
//! - **Use `RexgenError::io` for file access failures.** It keeps the offending path.
//!
//! - **Use `RexgenError::missing_boundary` / `RexgenError::misplaced_boundary`** for splicing
//!   failures, so the rendered report always shows the document being spliced.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, RexgenError>;

/// Type alias for the document attached to boundary diagnostics.
pub type SourceArc = Arc<NamedSource<String>>;

/// Coarse error classification, handy for exit codes and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A descriptor references something that cannot be resolved, or an arity is out of range
    Configuration,
    /// The target document lacks the expected markers
    Boundary,
    /// The target document cannot be read or written
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "ConfigurationDefect",
            ErrorKind::Boundary => "BoundaryNotFound",
            ErrorKind::Io => "IOFailure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for every rexgen failure mode.
#[derive(Error, Diagnostic, Debug)]
pub enum RexgenError {
    #[error("Configuration defect in {family}: {message}")]
    #[diagnostic(
        code(rexgen::configuration),
        help("fix the macro family descriptor in the catalog and rerun")
    )]
    ConfigurationDefect { family: String, message: String },

    #[error("Boundary not found: {message}")]
    #[diagnostic(code(rexgen::boundary))]
    BoundaryNotFound {
        message: String,
        #[source_code]
        src: SourceArc,
        #[label("{label}")]
        span: Option<SourceSpan>,
        label: String,
        #[help]
        help: Option<String>,
    },

    #[error("I/O failure on '{}'", path.display())]
    #[diagnostic(code(rexgen::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RexgenError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RexgenError::ConfigurationDefect { .. } => ErrorKind::Configuration,
            RexgenError::BoundaryNotFound { .. } => ErrorKind::Boundary,
            RexgenError::Io { .. } => ErrorKind::Io,
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        RexgenError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// A marker does not occur anywhere in the document.
    pub fn missing_boundary(document: &str, name: &str, marker: &str) -> Self {
        RexgenError::BoundaryNotFound {
            message: format!("{name} marker '{marker}' does not occur in the document"),
            src: to_error_source("document", document),
            span: None,
            label: String::new(),
            help: Some(format!(
                "add a line starting with '{marker}' to delimit the generated region"
            )),
        }
    }

    /// The end marker exists but only ahead of the start marker.
    pub fn misplaced_boundary(document: &str, end_marker: &str, offset: usize) -> Self {
        RexgenError::BoundaryNotFound {
            message: format!("end marker '{end_marker}' does not follow the start marker"),
            src: to_error_source("document", document),
            span: Some(SourceSpan::from((offset, end_marker.len()))),
            label: "only end marker, found before the start marker".to_string(),
            help: Some("the start marker must come before the end marker".to_string()),
        }
    }
}

/// Wraps a document into the shared `NamedSource` used by diagnostics.
pub fn to_error_source<S: AsRef<str>>(name: &str, source: S) -> SourceArc {
    Arc::new(NamedSource::new(name, source.as_ref().to_string()))
}

/// Prints a RexgenError with full miette diagnostics
pub fn print_error(error: RexgenError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// Constructs a `ConfigurationDefect` for the given family label with a formatted message.
#[macro_export]
macro_rules! defect {
    ($family:expr, $msg:expr, $($arg:expr),+ $(,)?) => {
        $crate::RexgenError::ConfigurationDefect {
            family: $family.to_string(),
            message: format!($msg, $($arg),+),
        }
    };
    ($family:expr, $msg:expr) => {
        $crate::RexgenError::ConfigurationDefect {
            family: $family.to_string(),
            message: format!("{}", $msg),
        }
    };
}
