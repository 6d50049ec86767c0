// Lazy-loaded grammar
//
// The tree-sitter Python grammar is loaded on first use and shared by every parser
// created afterwards.

use crate::traits::{Error, Result};
use once_cell::sync::Lazy;
use tree_sitter::{Language, Parser};

/// Global Python grammar instance
///
/// Loaded on first access and kept for the lifetime of the program.
pub static PYTHON_GRAMMAR: Lazy<Language> = Lazy::new(|| tree_sitter_python::LANGUAGE.into());

/// Create a tree-sitter parser configured for Python
pub fn python_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    configure(&mut parser)?;
    Ok(parser)
}

/// Point an existing parser at the Python grammar
pub fn configure(parser: &mut Parser) -> Result<()> {
    parser
        .set_language(&PYTHON_GRAMMAR)
        .map_err(|e| Error::ParseFailed(e.to_string()))
}
