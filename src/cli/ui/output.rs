use console::style;

use crate::types::AnalysisReport;

/// Terminal output.
///
/// Status lines go to stderr so a report on stdout can be piped.
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", style("✓").green(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    /// Print the report as an indented listing
    pub fn report(&self, report: &AnalysisReport) {
        for record in report.iter() {
            println!("{}", style(&record.path).bold());
            for function in &record.functions {
                let kind = if function.is_method {
                    style(format!("{:<8}", "method")).cyan()
                } else {
                    style(format!("{:<8}", "function")).green()
                };
                println!("  {} {}", kind, function.signature());
            }
        }
    }

    /// Print the one-line scan summary
    pub fn summary(&self, report: &AnalysisReport, failed_files: usize) {
        let message = format!(
            "Found {} functions ({} methods) in {} files",
            report.function_count(),
            report.method_count(),
            report.len()
        );
        self.success(&message);

        if failed_files > 0 {
            self.warning(&format!(
                "{} files could not be parsed and were skipped (see log)",
                failed_files
            ));
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
