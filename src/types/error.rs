//! Unified Error Type
//!
//! Centralized error type for the analyzer, the repository provider and the CLI.
//!
//! ## Propagation
//!
//! - Per-file failures (`Io`, `Parse`) are recorded on a diagnostics sink and
//!   never abort a repository scan
//! - `InvalidRoot` is the only error the analysis pass surfaces to its caller
//! - `Config` and `Git` belong to the surrounding CLI

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProflogError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Analysis Errors
    // -------------------------------------------------------------------------
    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Invalid root {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    // -------------------------------------------------------------------------
    // Collaborator Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Git error: {0}")]
    Git(String),
}

pub type Result<T> = std::result::Result<T, ProflogError>;

impl ProflogError {
    /// Create a parse error for a file
    pub fn parse(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            path: path.as_ref().display().to_string(),
        }
    }

    /// Create an invalid-root error
    pub fn invalid_root(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
