// Core traits for import extraction

use serde::{Deserialize, Serialize};

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during parsing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The parser could not be set up or produced no tree
    #[error("Failed to parse source: {0}")]
    ParseFailed(String),

    /// Syntax error at a specific position (1-based line and column)
    #[error("Invalid syntax at line {line}, column {column}: {message}")]
    SyntaxError {
        /// Line of the first error node
        line: usize,
        /// Column of the first error node
        column: usize,
        /// Error message
        message: String,
    },

    /// Input/Output error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Syntactic form of an import statement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    /// `import a.b.c` (one entry per imported name)
    Import,
    /// `from a.b import c`
    From,
    /// `from __future__ import feature`
    Future,
}

/// Import information extracted from a file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportInfo {
    /// Dotted module name as written, without leading dots.
    /// Empty for `from . import x`.
    pub module: String,

    /// Statement form
    pub kind: ImportKind,

    /// Number of leading dots (0 for absolute imports)
    pub level: usize,

    /// 1-based line of the statement
    pub line: usize,
}

impl ImportInfo {
    /// Whether this import is relative to the importing package
    pub fn is_relative(&self) -> bool {
        self.level > 0
    }
}

/// Seam between the graph builder and a concrete language frontend.
///
/// Implementations turn raw source bytes into the list of import statements it contains.
/// They never resolve names or touch the filesystem.
pub trait ImportParser {
    /// Extract every import statement from source code
    ///
    /// # Arguments
    /// * `source` - Source code as bytes
    fn parse_imports(&self, source: &[u8]) -> Result<Vec<ImportInfo>>;

    /// Extract imports using a provided parser instance (for reuse across files)
    ///
    /// # Arguments
    /// * `source` - Source code as bytes
    /// * `parser` - Tree-sitter parser instance to reuse
    fn parse_imports_with_parser(
        &self,
        source: &[u8],
        _parser: &mut tree_sitter::Parser,
    ) -> Result<Vec<ImportInfo>> {
        self.parse_imports(source)
    }
}
