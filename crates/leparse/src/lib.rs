// leparse - Import Parsing Engine
//
// *Le Parse* (The Parsing) - tree-sitter based extraction of Python import statements

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Core parsing traits and types.
pub mod traits;

/// Lazy-loaded Python grammar.
pub mod grammar;

/// Python import statement parser.
pub mod python;

/// Depth-aware import extraction.
pub mod extractor;

pub use extractor::{truncate_module, ImportExtractor};
pub use python::PythonImportParser;
pub use traits::{Error, ImportInfo, ImportKind, ImportParser, Result};
