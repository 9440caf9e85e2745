use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::constants::scan::{SOURCE_SUFFIX, default_exclude_patterns};
use crate::types::{ProflogError, Result};

/// Enumerate source files under `root`.
///
/// `None` uses the default exclusion set; `Some` replaces it wholesale.
pub fn walk<P: AsRef<Path>>(root: P, exclude_patterns: Option<&[String]>) -> Result<Vec<PathBuf>> {
    let mut scanner = FileScanner::new(root);
    if let Some(patterns) = exclude_patterns {
        scanner = scanner.with_exclude(patterns.to_vec());
    }
    scanner.scan()
}

/// Recursive source file walker with substring exclusion.
///
/// A directory whose path contains any exclude pattern is pruned; a file is
/// kept when its name ends with the source suffix and its full path contains
/// no exclude pattern. Gitignore and hidden-file rules are not applied, and
/// symlinked directories are not followed.
pub struct FileScanner {
    root: PathBuf,
    exclude: Vec<String>,
    suffix: String,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude: default_exclude_patterns(),
            suffix: SOURCE_SUFFIX.to_string(),
        }
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        self.check_root()?;

        if is_excluded_dir(&self.root, &self.exclude) {
            debug!("Root {} matches an exclude pattern", self.root.display());
            return Ok(Vec::new());
        }

        let exclude = Arc::new(self.exclude.clone());
        let prune_patterns = Arc::clone(&exclude);

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| !is_pruned(entry, &prune_patterns))
            .build();

        let mut files = Vec::new();
        for item in walker {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };

            // Symlinked files count; symlinked directories are never entered
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            if !entry.file_name().to_string_lossy().ends_with(&self.suffix) {
                continue;
            }

            if contains_any(&path.to_string_lossy(), &exclude) {
                continue;
            }

            files.push(entry.into_path());
        }

        debug!("Found {} source files under {}", files.len(), self.root.display());
        Ok(files)
    }

    fn check_root(&self) -> Result<()> {
        let meta = std::fs::metadata(&self.root)
            .map_err(|e| ProflogError::invalid_root(&self.root, e.to_string()))?;
        if !meta.is_dir() {
            return Err(ProflogError::invalid_root(&self.root, "not a directory"));
        }
        Ok(())
    }
}

fn is_pruned(entry: &DirEntry, patterns: &[String]) -> bool {
    entry.file_type().is_some_and(|ft| ft.is_dir()) && is_excluded_dir(entry.path(), patterns)
}

/// Directory paths are matched with a trailing `/` so `venv/` prunes `venv`.
fn is_excluded_dir(dir: &Path, patterns: &[String]) -> bool {
    let mut path = dir.to_string_lossy().into_owned();
    if !path.ends_with('/') {
        path.push('/');
    }
    contains_any(&path, patterns)
}

#[inline]
fn contains_any(haystack: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| haystack.contains(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "def f():\n    pass\n").unwrap();
        path
    }

    fn rel_paths(root: &Path, files: &[PathBuf]) -> BTreeSet<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_default_excludes() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "src/main.py");
        touch(root, "src/pkg/util.py");
        touch(root, "venv/lib/site.py");
        touch(root, ".venv/lib/site.py");
        touch(root, "src/__pycache__/main.py");
        touch(root, ".git/hooks/hook.py");
        touch(root, "node_modules/x/y.py");
        touch(root, "build/lib/out.py");
        touch(root, "dist/out.py");
        touch(root, "pkg.egg-info/setup.py");

        let files = walk(root, None).unwrap();

        // `*.egg-info/` is a literal substring and does not match
        assert_eq!(
            rel_paths(root, &files),
            BTreeSet::from([
                "pkg.egg-info/setup.py".to_string(),
                "src/main.py".to_string(),
                "src/pkg/util.py".to_string(),
            ])
        );
    }

    #[test]
    fn test_custom_patterns_replace_defaults() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "src/main.py");
        touch(root, "tests/test_main.py");
        touch(root, "venv/site.py");

        let patterns = vec!["tests/".to_string()];
        let files = walk(root, Some(&patterns)).unwrap();

        assert_eq!(
            rel_paths(root, &files),
            BTreeSet::from(["src/main.py".to_string(), "venv/site.py".to_string()])
        );
    }

    #[test]
    fn test_substring_match_is_broad() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "environment/config.py");
        touch(root, "app/main.py");

        let files = FileScanner::new(root)
            .with_exclude(vec!["env".to_string()])
            .scan()
            .unwrap();

        assert_eq!(rel_paths(root, &files), BTreeSet::from(["app/main.py".to_string()]));
    }

    #[test]
    fn test_file_patterns_apply_to_full_path() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "app/settings_local.py");
        touch(root, "app/settings.py");

        let files = FileScanner::new(root)
            .with_exclude(vec!["_local".to_string()])
            .scan()
            .unwrap();

        assert_eq!(rel_paths(root, &files), BTreeSet::from(["app/settings.py".to_string()]));
    }

    #[test]
    fn test_only_source_suffix() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "a.py");
        touch(root, "b.pyc");
        touch(root, "c.txt");
        touch(root, "d.pyi");
        fs::create_dir_all(root.join("dir.py")).unwrap();

        let files = walk(root, None).unwrap();

        assert_eq!(rel_paths(root, &files), BTreeSet::from(["a.py".to_string()]));
    }

    #[test]
    fn test_with_suffix() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "a.py");
        touch(root, "b.pyi");

        let files = FileScanner::new(root).with_suffix(".pyi").scan().unwrap();

        assert_eq!(rel_paths(root, &files), BTreeSet::from(["b.pyi".to_string()]));
    }

    #[test]
    fn test_root_matching_pattern_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("venv");
        touch(&root, "lib/site.py");

        assert!(walk(&root, None).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_root() {
        let temp = TempDir::new().unwrap();

        let missing = walk(temp.path().join("missing"), None);
        assert!(matches!(missing, Err(ProflogError::InvalidRoot { .. })));

        let file = touch(temp.path(), "file.py");
        let not_dir = walk(&file, None);
        assert!(matches!(not_dir, Err(ProflogError::InvalidRoot { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directory_not_followed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        touch(&root, "src/main.py");
        let outside = temp.path().join("outside");
        touch(&outside, "secret.py");
        std::os::unix::fs::symlink(&outside, root.join("linked")).unwrap();

        let files = walk(&root, None).unwrap();

        assert_eq!(rel_paths(&root, &files), BTreeSet::from(["src/main.py".to_string()]));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "src/main.py");
        touch(root, "private/hidden.py");
        let private = root.join("private");
        fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind a privileged user
        let locked = fs::read_dir(&private).is_err();
        let files = if locked { walk(root, None) } else { Ok(Vec::new()) };
        fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();
        if !locked {
            return;
        }

        assert_eq!(
            rel_paths(root, &files.unwrap()),
            BTreeSet::from(["src/main.py".to_string()])
        );
    }

    const SEGMENTS: &[&str] = &["src", "venv", "env", "build", "lib", "tests", "environment", "pkg"];
    const FILE_NAMES: &[&str] = &["a.py", "b.py", "notes.txt", "mod.py"];
    const PATTERNS: &[&str] = &["venv/", "env/", "build/", "tests/", "lib", "a.py", "env"];

    fn rel_file() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(prop::sample::select(SEGMENTS), 0..4),
            prop::sample::select(FILE_NAMES),
        )
            .prop_map(|(dirs, file)| {
                let mut parts: Vec<&str> = dirs;
                parts.push(file);
                parts.join("/")
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_walk_never_returns_excluded_paths(
            files in prop::collection::vec(rel_file(), 1..12),
            patterns in prop::sample::subsequence(PATTERNS, 0..=PATTERNS.len()),
        ) {
            let temp = TempDir::new().unwrap();
            let root = temp.path();
            let created: BTreeSet<PathBuf> = files.iter().map(|f| touch(root, f)).collect();
            let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();

            let found: BTreeSet<PathBuf> = walk(root, Some(&patterns)).unwrap().into_iter().collect();

            for path in &found {
                let text = path.to_string_lossy();
                prop_assert!(!patterns.iter().any(|p| text.contains(p.as_str())));
            }

            let expected: BTreeSet<PathBuf> = created
                .into_iter()
                .filter(|p| p.to_string_lossy().ends_with(".py"))
                .filter(|p| !contains_any(&p.to_string_lossy(), &patterns))
                .collect();
            prop_assert_eq!(found, expected);
        }
    }
}
