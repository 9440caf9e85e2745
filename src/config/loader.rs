//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/proflog/config.toml)
//! 3. Project config (.proflog/config.toml) or an explicit `--config` file
//! 4. Environment variables (PROFLOG_* prefix, `__` between nested keys)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::constants::config as paths;
use crate::types::{ProflogError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project (or `explicit`) → env vars
    pub fn load_with(explicit: Option<&Path>) -> Result<Config> {
        let local = match explicit {
            Some(path) if !path.exists() => {
                return Err(ProflogError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => Self::project_config_path(),
        };

        Self::load_layers(Self::global_config_path().as_deref(), Some(&local))
    }

    /// Merge defaults, the given files that exist (later wins), then env vars.
    fn load_layers(global: Option<&Path>, local: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in [global, local].into_iter().flatten() {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        // Merge environment variables (e.g., PROFLOG_LOG__LEVEL -> log.level)
        figment = figment.merge(
            Env::prefixed(paths::ENV_PREFIX)
                .split(paths::ENV_SEPARATOR)
                .lowercase(true),
        );

        let config: Config = figment
            .extract()
            .map_err(|e| ProflogError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| ProflogError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/proflog/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join(paths::GLOBAL_DIR_NAME))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(paths::CONFIG_FILE))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        Self::project_dir().join(paths::CONFIG_FILE)
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(paths::PROJECT_DIR)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(config: &Config, as_json: bool) -> Result<()> {
        if as_json {
            println!("{}", serde_json::to_string_pretty(config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(config).map_err(|e| ProflogError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            ProflogError::Config("Cannot determine global config directory".to_string())
        })?;
        Self::write_default(&global_dir, force)?;
        Ok(global_dir)
    }

    /// Initialize project configuration in the current directory
    pub fn init_project(force: bool) -> Result<PathBuf> {
        let project_dir = Self::project_dir();
        Self::write_default(&project_dir, force)?;
        Ok(project_dir)
    }

    /// Write the default config into `dir`, keeping an existing file unless `force`.
    pub fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let config_path = dir.join(paths::CONFIG_FILE);
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_config())?;
            info!("Created config: {}", config_path.display());
        } else {
            info!("Config exists: {}", config_path.display());
        }

        Ok(config_path)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Generate default config content (TOML)
    fn default_config() -> String {
        r#"# proflog Configuration

version = "1.0"

# File discovery. Each entry is a plain substring: any directory or file whose
# path contains it is skipped. This list replaces the built-in defaults.
[analysis]
exclude_patterns = [
    "venv/",
    ".venv/",
    "env/",
    ".env/",
    "__pycache__/",
    ".git/",
    "node_modules/",
    "dist/",
    "build/",
]

# Clone target for `proflog clone`
[workspace]
dir = "workspace"

# Report output: "text" or "json"
[report]
format = "text"

[log]
level = "info"
# file = "proflog.log"
"#
        .to_string()
    }
}
