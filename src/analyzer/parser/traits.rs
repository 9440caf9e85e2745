use crate::types::{FunctionDescriptor, ProflogError, Result};

pub trait Parser: Send + Sync {
    /// Collect every function-like definition in `content`.
    ///
    /// `path` is only used for error context.
    fn parse(&self, path: &str, content: &str) -> Result<Vec<FunctionDescriptor>>;

    /// File name suffix handled by this parser (e.g. `.py`)
    fn file_suffix(&self) -> &'static str;
}

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
#[inline]
pub fn get_node_text<'a>(node: tree_sitter::Node, content: &'a [u8]) -> &'a str {
    node.utf8_text(content).unwrap_or_else(|e| {
        tracing::debug!(
            "UTF-8 extraction failed at {}:{}-{}:{}: {}",
            node.start_position().row + 1,
            node.start_position().column,
            node.end_position().row + 1,
            node.end_position().column,
            e
        );
        ""
    })
}

/// 1-based start and end lines of a tree-sitter node.
pub fn get_node_lines(node: tree_sitter::Node) -> (u32, u32) {
    (
        node.start_position().row as u32 + 1,
        node.end_position().row as u32 + 1,
    )
}

/// Create a tree-sitter parser for the given language.
pub fn create_ts_parser<L: Into<tree_sitter::Language>>(
    language: L,
    lang_name: &str,
) -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.into())
        .map_err(|e| ProflogError::Parse {
            message: format!("Failed to set {} language: {}", lang_name, e),
            path: String::new(),
        })?;
    Ok(parser)
}

/// Find the first ERROR or MISSING node in pre-order.
///
/// Returns `None` for a tree without syntax errors.
pub fn first_syntax_error(root: tree_sitter::Node) -> Option<tree_sitter::Node> {
    if !root.has_error() {
        return None;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    // has_error() was set but no explicit node found; report the root
    Some(root)
}
