//! Clone Command
//!
//! Clones a repository into the workspace and analyzes the checkout.
//!
//! Usage:
//!   proflog clone <URL> [--target-dir DIR] [--exclude PATTERN]... [--format text|json]

use std::path::PathBuf;

use super::analyze::{self, AnalyzeOptions};
use crate::cli::Output;
use crate::config::Config;
use crate::repository::{clone_repository, is_git_available};
use crate::types::{ProflogError, Result};

pub fn run(
    url: &str,
    target_dir: Option<PathBuf>,
    options: &AnalyzeOptions,
    config: &Config,
) -> Result<()> {
    if !is_git_available() {
        return Err(ProflogError::Git(
            "git was not found on PATH; install git to clone repositories".to_string(),
        ));
    }

    let target = target_dir.unwrap_or_else(|| config.workspace.dir.clone());
    let checkout = clone_repository(url, &target)?;
    Output::new().success(&format!(
        "Successfully cloned repository to {}",
        checkout.display()
    ));

    analyze::run(&checkout, options, config)
}
