//! Language Parser Module
//!
//! Tree-sitter based function discovery.
//!
//! ```rust,ignore
//! use proflog::analyzer::parser::{Parser, PythonParser};
//!
//! let parser = PythonParser::new()?;
//! let functions = parser.parse("app.py", source_code)?;
//! ```

pub mod python;
pub mod traits;

pub use python::PythonParser;
pub use traits::{Parser, create_ts_parser, first_syntax_error, get_node_lines, get_node_text};

use crate::types::Result;

/// Create the parser for the supported source language.
pub fn create_parser() -> Result<Box<dyn Parser>> {
    Ok(Box::new(PythonParser::new()?))
}
