//! Repository Analyzer
//!
//! Walks a repository and collects the function definitions of every source file.
//!
//! Key properties:
//! - A file that cannot be read or parsed is reported to the diagnostics sink
//!   and left out of the report; it never aborts the scan
//! - Files without definitions are left out of the report
//! - Only an invalid root fails the whole call

use std::fs;
use std::path::Path;

use tracing::debug;

use super::diagnostics::DiagnosticsSink;
use super::parser::{Parser, create_parser};
use super::scanner::FileScanner;
use crate::types::{AnalysisReport, FunctionDescriptor, ProflogError, Result};

/// Extract the functions of one file, reporting failures to `sink`.
pub fn extract(path: &Path, sink: &dyn DiagnosticsSink) -> Vec<FunctionDescriptor> {
    match create_parser() {
        Ok(parser) => extract_with(parser.as_ref(), path, sink),
        Err(e) => {
            sink.record_failure(path, &e);
            Vec::new()
        }
    }
}

/// Analyze every source file under `root`.
///
/// `exclude_patterns` replaces the default exclusion set when given.
pub fn analyze(
    root: &Path,
    exclude_patterns: Option<&[String]>,
    sink: &dyn DiagnosticsSink,
) -> Result<AnalysisReport> {
    let mut analyzer = RepositoryAnalyzer::new(sink)?;
    if let Some(patterns) = exclude_patterns {
        analyzer = analyzer.with_exclude(patterns.to_vec());
    }
    analyzer.analyze(root)
}

pub struct RepositoryAnalyzer<'a> {
    parser: Box<dyn Parser>,
    sink: &'a dyn DiagnosticsSink,
    exclude: Option<Vec<String>>,
}

impl<'a> RepositoryAnalyzer<'a> {
    pub fn new(sink: &'a dyn DiagnosticsSink) -> Result<Self> {
        Ok(Self {
            parser: create_parser()?,
            sink,
            exclude: None,
        })
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = Some(patterns);
        self
    }

    pub fn extract(&self, path: &Path) -> Vec<FunctionDescriptor> {
        extract_with(self.parser.as_ref(), path, self.sink)
    }

    pub fn analyze(&self, root: &Path) -> Result<AnalysisReport> {
        let mut scanner = FileScanner::new(root).with_suffix(self.parser.file_suffix());
        if let Some(patterns) = &self.exclude {
            scanner = scanner.with_exclude(patterns.clone());
        }

        let mut report = AnalysisReport::new();
        for path in scanner.scan()? {
            let functions = self.extract(&path);
            report.insert(path.to_string_lossy(), functions);
        }

        debug!(
            "Analyzed {}: {} files, {} functions",
            root.display(),
            report.len(),
            report.function_count()
        );
        Ok(report)
    }
}

fn extract_with(
    parser: &dyn Parser,
    path: &Path,
    sink: &dyn DiagnosticsSink,
) -> Vec<FunctionDescriptor> {
    match read_and_parse(parser, path) {
        Ok(functions) => {
            debug!("{}: {} functions", path.display(), functions.len());
            functions
        }
        Err(e) => {
            sink.record_failure(path, &e);
            Vec::new()
        }
    }
}

fn read_and_parse(parser: &dyn Parser, path: &Path) -> Result<Vec<FunctionDescriptor>> {
    let content = fs::read_to_string(path).map_err(ProflogError::Io)?;
    // Python itself accepts a UTF-8 BOM at the start of a source file
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    parser.parse(&path.to_string_lossy(), content)
}
