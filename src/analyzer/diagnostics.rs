//! Diagnostics Sink
//!
//! Per-file failures are handed to a sink instead of a process-wide logger.
//! A sink must never fail back into the analyzer.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::types::ProflogError;

pub trait DiagnosticsSink: Send + Sync {
    /// Record that a single file could not be analyzed.
    fn record_failure(&self, path: &Path, error: &ProflogError);
}

/// Sink that forwards failures to `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record_failure(&self, path: &Path, error: &ProflogError) {
        tracing::error!(path = %path.display(), "Error parsing file: {}", error);
    }
}

/// A recorded per-file failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Sink that keeps failures in memory and forwards them to another sink.
///
/// The CLI wraps [`TracingSink`] with it to report a failure count.
#[derive(Debug, Default)]
pub struct CollectingSink<S = TracingSink> {
    inner: Option<S>,
    failures: Mutex<Vec<FileFailure>>,
}

impl CollectingSink<TracingSink> {
    /// Collect without forwarding
    pub fn new() -> Self {
        Self {
            inner: None,
            failures: Mutex::new(Vec::new()),
        }
    }
}

impl<S: DiagnosticsSink> CollectingSink<S> {
    /// Collect and forward to `inner`
    pub fn forwarding(inner: S) -> Self {
        Self {
            inner: Some(inner),
            failures: Mutex::new(Vec::new()),
        }
    }

    pub fn failures(&self) -> Vec<FileFailure> {
        self.failures
            .lock()
            .map(|failures| failures.clone())
            .unwrap_or_default()
    }

    pub fn failure_count(&self) -> usize {
        self.failures
            .lock()
            .map(|failures| failures.len())
            .unwrap_or(0)
    }
}

impl<S: DiagnosticsSink> DiagnosticsSink for CollectingSink<S> {
    fn record_failure(&self, path: &Path, error: &ProflogError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push(FileFailure {
                path: path.to_path_buf(),
                message: error.to_string(),
            });
        }
        if let Some(inner) = &self.inner {
            inner.record_failure(path, error);
        }
    }
}
