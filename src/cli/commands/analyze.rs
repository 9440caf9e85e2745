//! Analyze Command
//!
//! Finds function and method definitions in a local checkout.
//!
//! Usage:
//!   proflog analyze <PATH> [--exclude PATTERN]... [--format text|json]

use std::path::Path;

use tracing::info;

use crate::analyzer::{CollectingSink, RepositoryAnalyzer, TracingSink};
use crate::cli::Output;
use crate::config::{Config, OutputFormat};
use crate::types::{AnalysisReport, Result};

/// Options shared by `analyze` and `clone`
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    /// Replaces the configured exclude patterns when set
    pub exclude: Option<Vec<String>>,
    /// Overrides the configured report format when set
    pub format: Option<OutputFormat>,
}

impl AnalyzeOptions {
    pub fn exclude_patterns(&self, config: &Config) -> Vec<String> {
        self.exclude
            .clone()
            .unwrap_or_else(|| config.analysis.exclude_patterns.clone())
    }

    pub fn format(&self, config: &Config) -> OutputFormat {
        self.format.unwrap_or(config.report.format)
    }
}

pub fn run(root: &Path, options: &AnalyzeOptions, config: &Config) -> Result<()> {
    info!("Analyzing {}", root.display());

    let sink = CollectingSink::forwarding(TracingSink);
    let report = RepositoryAnalyzer::new(&sink)?
        .with_exclude(options.exclude_patterns(config))
        .analyze(root)?;

    render(&report, options.format(config), sink.failure_count())
}

pub(crate) fn render(report: &AnalysisReport, format: OutputFormat, failed_files: usize) -> Result<()> {
    let output = Output::new();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => output.report(report),
    }
    output.summary(report, failed_files);

    Ok(())
}
