//! Global Constants
//!
//! Centralized constants for scanning, configuration and the CLI.

/// File discovery constants
pub mod scan {
    /// Suffix of the source files the analyzer understands
    pub const SOURCE_SUFFIX: &str = ".py";

    /// Default exclusion substrings.
    ///
    /// Matched as plain substrings against the full path, so the `*` entries
    /// only match paths that literally contain an asterisk.
    pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
        "venv/",
        ".venv/",
        "env/",
        ".env/",
        "__pycache__/",
        "*.pyc",
        "*.pyo",
        "*.pyd",
        ".git/",
        "node_modules/",
        "dist/",
        "build/",
        "*.egg-info/",
    ];

    /// Owned copy of [`DEFAULT_EXCLUDE_PATTERNS`]
    pub fn default_exclude_patterns() -> Vec<String> {
        DEFAULT_EXCLUDE_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .collect()
    }
}

/// Configuration file locations
pub mod config {
    /// Project data directory
    pub const PROJECT_DIR: &str = ".proflog";

    /// Config file name inside the project and global directories
    pub const CONFIG_FILE: &str = "config.toml";

    /// Directory name under the XDG config home
    pub const GLOBAL_DIR_NAME: &str = "proflog";

    /// Environment variable prefix (`PROFLOG_LOG__LEVEL=debug`)
    pub const ENV_PREFIX: &str = "PROFLOG_";

    /// Separator for nested keys in environment variables
    pub const ENV_SEPARATOR: &str = "__";

    /// Default clone target
    pub const DEFAULT_WORKSPACE_DIR: &str = "workspace";

    /// Log levels accepted by `log.level`
    pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
}
