pub use crate::diagnostics::{ErrorKind, Result, RexgenError};

pub mod catalog;
pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod expander;
pub mod layout;
pub mod signature;
pub mod splice;
