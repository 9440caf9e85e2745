//! Config Command
//!
//! Manage proflog configuration.
//!
//! Usage:
//!   proflog config show [-f json]
//!   proflog config path
//!   proflog config init [-g] [--force]

use crate::cli::Output;
use crate::config::{Config, ConfigLoader, OutputFormat};
use crate::types::{ProflogError, Result};

/// Show the merged effective configuration, or the global file alone
pub fn show(global: bool, format: OutputFormat, config: &Config) -> Result<()> {
    let as_json = format == OutputFormat::Json;
    if !global {
        return ConfigLoader::show_config(config, as_json);
    }

    let path = ConfigLoader::global_config_path()
        .filter(|path| path.exists())
        .ok_or_else(|| {
            ProflogError::Config(
                "No global config found. Run `proflog config init --global`".to_string(),
            )
        })?;
    ConfigLoader::show_config(&ConfigLoader::load_from_file(&path)?, as_json)
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Initialize global or project configuration
pub fn init(global: bool, force: bool) -> Result<()> {
    let dir = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };

    let scope = if global { "global" } else { "project" };
    Output::new().success(&format!("Initialized {} configuration", scope));
    println!("  Directory: {}", dir.display());
    Ok(())
}
