// Python language parser implementation

use crate::grammar;
use crate::traits::{Error, ImportInfo, ImportKind, ImportParser, Result};
use tree_sitter::{Node, Parser};

/// Python import parser backed by tree-sitter
#[derive(Debug, Default, Clone, Copy)]
pub struct PythonImportParser;

impl PythonImportParser {
    /// Create a new Python import parser
    pub fn new() -> Self {
        Self
    }

    fn parse_tree(&self, source: &[u8], parser: &mut Parser) -> Result<Vec<ImportInfo>> {
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::ParseFailed("Failed to parse Python source".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let error = syntax_error(&root);
            tracing::debug!("rejecting source with syntax errors: {}", error);
            return Err(error);
        }

        let mut imports = Vec::new();
        visit_tree(&root, source, &mut imports);
        tracing::trace!(count = imports.len(), "extracted import statements");
        Ok(imports)
    }
}

impl ImportParser for PythonImportParser {
    fn parse_imports(&self, source: &[u8]) -> Result<Vec<ImportInfo>> {
        let mut parser = grammar::python_parser()?;
        self.parse_tree(source, &mut parser)
    }

    fn parse_imports_with_parser(&self, source: &[u8], parser: &mut Parser) -> Result<Vec<ImportInfo>> {
        grammar::configure(parser)?;
        self.parse_tree(source, parser)
    }
}

/// Walk the whole tree; imports nested in functions, classes and guards count too.
///
/// Pre-order walk with a cursor so that deeply nested expressions cannot exhaust the stack.
fn visit_tree(root: &Node, source: &[u8], imports: &mut Vec<ImportInfo>) {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        let descend = match node.kind() {
            "import_statement" => {
                extract_plain_import(&node, source, imports);
                false
            }
            "import_from_statement" => {
                if let Some(info) = extract_from_import(&node, source) {
                    imports.push(info);
                }
                false
            }
            "future_import_statement" => {
                imports.push(ImportInfo {
                    module: "__future__".to_string(),
                    kind: ImportKind::Future,
                    level: 0,
                    line: line_of(&node),
                });
                false
            }
            _ => true,
        };

        if descend && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// `import a.b, c as d` yields one entry per imported name
fn extract_plain_import(node: &Node, source: &[u8], imports: &mut Vec<ImportInfo>) {
    let mut cursor = node.walk();
    for name in node.children_by_field_name("name", &mut cursor) {
        let dotted = match name.kind() {
            "dotted_name" => Some(name),
            "aliased_import" => name.child_by_field_name("name"),
            _ => None,
        };

        if let Some(module) = dotted.and_then(|d| dotted_name_text(&d, source)) {
            imports.push(ImportInfo {
                module,
                kind: ImportKind::Import,
                level: 0,
                line: line_of(node),
            });
        }
    }
}

/// `from a.b import c` or `from ..a import c`
fn extract_from_import(node: &Node, source: &[u8]) -> Option<ImportInfo> {
    let module_node = node.child_by_field_name("module_name")?;

    let (module, level) = match module_node.kind() {
        "dotted_name" => (dotted_name_text(&module_node, source)?, 0),
        "relative_import" => {
            let mut level = 0;
            let mut module = String::new();
            let mut cursor = module_node.walk();
            for child in module_node.children(&mut cursor) {
                match child.kind() {
                    "import_prefix" => {
                        level = child
                            .utf8_text(source)
                            .map(|dots| dots.chars().filter(|c| *c == '.').count())
                            .unwrap_or(0);
                    }
                    "dotted_name" => {
                        module = dotted_name_text(&child, source).unwrap_or_default();
                    }
                    _ => {}
                }
            }
            (module, level)
        }
        _ => return None,
    };

    Some(ImportInfo {
        module,
        kind: ImportKind::From,
        level,
        line: line_of(node),
    })
}

/// Join the identifiers of a `dotted_name`, ignoring whitespace around the dots
fn dotted_name_text(node: &Node, source: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let segments: Vec<&str> = node
        .named_children(&mut cursor)
        .filter(|child| child.kind() == "identifier")
        .filter_map(|child| child.utf8_text(source).ok())
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

fn line_of(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Build a syntax error pointing at the first ERROR or MISSING node
fn syntax_error(root: &Node) -> Error {
    let offending = first_error_node(root).unwrap_or(*root);
    let position = offending.start_position();
    let message = if offending.is_missing() {
        format!("missing {}", offending.kind())
    } else {
        "unexpected syntax".to_string()
    };

    Error::SyntaxError {
        line: position.row + 1,
        column: position.column + 1,
        message,
    }
}

fn first_error_node<'a>(root: &Node<'a>) -> Option<Node<'a>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}
