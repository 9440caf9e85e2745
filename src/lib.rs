//! proflog - Function inventory for Python repositories
//!
//! Walks a checked-out repository, parses every Python source file with
//! tree-sitter, and reports each function and method definition with its
//! line span, decorators, argument names and return annotation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use proflog::{CollectingSink, RepositoryAnalyzer};
//!
//! let sink = CollectingSink::new();
//! let report = RepositoryAnalyzer::new(&sink)?
//!     .with_exclude(vec!["tests/".to_string()])
//!     .analyze(Path::new("path/to/checkout"))?;
//!
//! for record in report.iter() {
//!     println!("{}: {} functions", record.path, record.functions.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: File walking, tree-sitter extraction, aggregation
//! - [`repository`]: Cloning a remote repository with the git CLI
//! - [`config`]: Layered configuration
//! - [`types`]: Descriptors, reports and errors

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod repository;
pub mod types;

// Configuration
pub use config::{Config, ConfigLoader, OutputFormat};

// Error Types
pub use types::error::{ProflogError, Result};

// Data Types
pub use types::{AnalysisReport, FileRecord, FunctionDescriptor};

// Analysis
pub use analyzer::{
    CollectingSink, DiagnosticsSink, RepositoryAnalyzer, TracingSink, analyze, extract,
    parser::{Parser, PythonParser},
    scanner::{FileScanner, walk},
};

// Repository provider
pub use repository::clone_repository;
