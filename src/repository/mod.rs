//! Repository Provider
//!
//! Produces a checked-out working directory for analysis by shelling out to
//! the `git` CLI. No retries and no integrity checks.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::types::{ProflogError, Result};

/// Whether a usable `git` binary is on PATH
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Clone `url` into `target_dir` and return the checkout path.
///
/// `target_dir` and its parents are created when missing; git refuses a
/// target that already has content.
pub fn clone_repository(url: &str, target_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(target_dir)?;

    info!("Cloning repository: {}", url);
    let output = Command::new("git")
        .arg("clone")
        .arg("--")
        .arg(url)
        .arg(target_dir)
        .output()
        .map_err(|e| ProflogError::Git(format!("Failed to run git: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ProflogError::Git(format!(
            "Failed to clone repository {}: {}",
            url,
            stderr.trim()
        )));
    }

    debug!("Cloned {} into {}", url, target_dir.display());
    Ok(target_dir.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .current_dir(dir)
            .args(["-c", "user.name=proflog", "-c", "user.email=proflog@example.com"])
            .args(args)
            .output()
            .unwrap()
            .status;
        assert!(status.success(), "git {:?} failed", args);
    }

    #[test]
    fn test_clone_missing_source_fails() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("no-such-repo");
        let target = temp.path().join("checkout");

        let result = clone_repository(&source.to_string_lossy(), &target);
        assert!(matches!(result, Err(ProflogError::Git(_))));
    }

    #[test]
    fn test_clone_local_repository() {
        if !is_git_available() {
            return;
        }

        let temp = TempDir::new().unwrap();
        let source = temp.path().join("origin");
        fs::create_dir_all(&source).unwrap();
        fs::write(source.join("app.py"), "def main():\n    pass\n").unwrap();
        git(&source, &["init", "--quiet"]);
        git(&source, &["add", "app.py"]);
        git(&source, &["commit", "--quiet", "-m", "Initial commit"]);

        let target = temp.path().join("workspace/origin");
        let checkout = clone_repository(&source.to_string_lossy(), &target).unwrap();

        assert_eq!(checkout, target);
        assert!(checkout.join("app.py").is_file());
    }

    #[test]
    fn test_clone_into_non_empty_target_fails() {
        if !is_git_available() {
            return;
        }

        let temp = TempDir::new().unwrap();
        let target = temp.path().join("busy");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();

        let result = clone_repository("https://invalid.example/repo.git", &target);
        assert!(matches!(result, Err(ProflogError::Git(_))));
    }
}
