// Import extraction with depth truncation
//
// Turns the raw statement list from a parser into the module names the graph builder
// follows: relative imports are dropped, names are cut to the configured depth.

use crate::python::PythonImportParser;
use crate::traits::{ImportInfo, ImportParser, Result};
use std::num::NonZeroUsize;
use tree_sitter::Parser;

/// Truncate a dotted module name to at most `depth` segments
///
/// `truncate_module("a.b.c", Some(2))` is `"a.b"`; `None` returns the name unchanged.
pub fn truncate_module(name: &str, depth: Option<NonZeroUsize>) -> String {
    match depth {
        Some(depth) => name
            .split('.')
            .take(depth.get())
            .collect::<Vec<_>>()
            .join("."),
        None => name.to_string(),
    }
}

/// Extracts the absolute module names imported by a Python file
#[derive(Debug, Clone, Default)]
pub struct ImportExtractor {
    max_depth: Option<NonZeroUsize>,
    parser: PythonImportParser,
}

impl ImportExtractor {
    /// Create an extractor that truncates names to `max_depth` segments
    pub fn new(max_depth: Option<NonZeroUsize>) -> Self {
        Self {
            max_depth,
            parser: PythonImportParser::new(),
        }
    }

    /// Configured truncation depth
    pub fn max_depth(&self) -> Option<NonZeroUsize> {
        self.max_depth
    }

    /// Parse source and return the imported module names in statement order
    pub fn extract(&self, source: &[u8]) -> Result<Vec<String>> {
        let imports = self.parser.parse_imports(source)?;
        Ok(self.select(imports))
    }

    /// Same as [`extract`](Self::extract) but reuses a caller-owned parser
    pub fn extract_with_parser(&self, source: &[u8], parser: &mut Parser) -> Result<Vec<String>> {
        let imports = self.parser.parse_imports_with_parser(source, parser)?;
        Ok(self.select(imports))
    }

    /// Drop relative imports and truncate the rest
    pub fn select(&self, imports: Vec<ImportInfo>) -> Vec<String> {
        imports
            .into_iter()
            .filter(|import| !import.is_relative() && !import.module.is_empty())
            .map(|import| truncate_module(&import.module, self.max_depth))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn depth(n: usize) -> Option<NonZeroUsize> {
        NonZeroUsize::new(n)
    }

    #[rstest]
    #[case("x.y.z.w", 2, "x.y")]
    #[case("x.y.z.w", 1, "x")]
    #[case("x.y", 5, "x.y")]
    #[case("x", 1, "x")]
    fn test_truncate_module(#[case] name: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate_module(name, depth(max)), expected);
    }

    #[test]
    fn test_truncate_without_depth() {
        assert_eq!(truncate_module("a.b.c", None), "a.b.c");
    }

    #[test]
    fn test_extract_skips_relative_imports() {
        let extractor = ImportExtractor::new(None);
        let source = b"from . import a\nfrom .b import c\nfrom d.e import f\nimport g\n";
        let names = extractor.extract(source).unwrap();
        assert_eq!(names, vec!["d.e", "g"]);
    }

    #[test]
    fn test_extract_truncates_both_forms() {
        let extractor = ImportExtractor::new(depth(2));
        let source = b"import x.y.z.w\nfrom p.q.r import s\n";
        let names = extractor.extract(source).unwrap();
        assert_eq!(names, vec!["x.y", "p.q"]);
    }

    #[test]
    fn test_extract_keeps_duplicates_in_order() {
        let extractor = ImportExtractor::new(depth(1));
        let names = extractor.extract(b"import a.b\nimport a.c\n").unwrap();
        assert_eq!(names, vec!["a", "a"]);
    }

    #[test]
    fn test_extract_propagates_syntax_errors() {
        let extractor = ImportExtractor::new(None);
        assert!(extractor.extract(b"import (\n").is_err());
    }

    proptest! {
        #[test]
        fn prop_truncation_is_a_prefix(
            segments in proptest::collection::vec("[a-z_][a-z0-9_]{0,6}", 1..6),
            max in 1usize..8,
        ) {
            let name = segments.join(".");
            let truncated = truncate_module(&name, depth(max));

            prop_assert!(name.starts_with(&truncated));
            prop_assert_eq!(truncated.split('.').count(), segments.len().min(max));
        }
    }
}
