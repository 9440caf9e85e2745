//! Code Analyzer Module
//!
//! Provides function discovery over a repository:
//! - Source file walking with substring exclusion
//! - Tree-sitter parsing and function/method extraction
//! - Repository-wide aggregation with per-file failure isolation

pub mod diagnostics;
pub mod parser;
pub mod repository;
pub mod scanner;

pub use diagnostics::{CollectingSink, DiagnosticsSink, FileFailure, TracingSink};
pub use repository::{RepositoryAnalyzer, analyze, extract};
pub use scanner::{FileScanner, walk};
