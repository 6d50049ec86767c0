// Graph errors

use crate::cycles::Cycle;
use lemodule::NamingError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for graph construction
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors that abort a graph build
#[derive(Debug, Error)]
pub enum BuildError {
    /// The entry file does not exist
    #[error("{} does not exist", .0.display())]
    EntryNotFound(PathBuf),

    /// The entry path is not a Python source file
    #[error("{} must be a Python file", .0.display())]
    InvalidEntry(PathBuf),

    /// The entry module matches an ignore prefix
    #[error("the entry module {0} is in the ignore set")]
    EntryIgnored(String),

    /// An ignore entry is not a dotted identifier chain
    #[error("invalid module name in ignore set: {0:?}")]
    InvalidIgnoreModule(String),

    /// The entry path could not be named
    #[error(transparent)]
    Naming(#[from] NamingError),

    /// The import parser could not be set up
    #[error("failed to initialise the import parser: {0}")]
    Parser(#[from] leparse::Error),
}

/// Errors raised by optional graph checks
#[derive(Debug, Error)]
pub enum GraphError {
    /// The graph contains import cycles
    #[error("found {} import cycle(s), first: {}", .0.len(), first_cycle(.0))]
    Cyclic(Vec<Cycle>),
}

fn first_cycle(cycles: &[Cycle]) -> String {
    cycles.first().map(ToString::to_string).unwrap_or_default()
}
