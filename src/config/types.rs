//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/proflog/) and project (.proflog/) level configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{config as paths, scan};
use crate::types::{ProflogError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// File discovery settings
    pub analysis: AnalysisConfig,

    /// Where cloned repositories are checked out
    pub workspace: WorkspaceConfig,

    /// Report rendering
    pub report: ReportConfig,

    /// Logging settings
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            analysis: AnalysisConfig::default(),
            workspace: WorkspaceConfig::default(),
            report: ReportConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    /// Returns `ProflogError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        // An empty substring matches every path
        if self.analysis.exclude_patterns.iter().any(|p| p.is_empty()) {
            return Err(ProflogError::Config(
                "analysis.exclude_patterns must not contain empty patterns".to_string(),
            ));
        }

        let level = self.log.level.to_lowercase();
        if !paths::LOG_LEVELS.contains(&level.as_str()) {
            return Err(ProflogError::Config(format!(
                "log.level must be one of {}, got '{}'",
                paths::LOG_LEVELS.join(", "),
                self.log.level
            )));
        }

        if self.workspace.dir.as_os_str().is_empty() {
            return Err(ProflogError::Config(
                "workspace.dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Substrings that exclude a directory or file when found in its path
    pub exclude_patterns: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: scan::default_exclude_patterns(),
        }
    }
}

// =============================================================================
// Workspace Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Default clone target
    pub dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(paths::DEFAULT_WORKSPACE_DIR),
        }
    }
}

// =============================================================================
// Report Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: text, json",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: OutputFormat,
}

// =============================================================================
// Log Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,

    /// Optional plain-text log file, written alongside stderr
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
