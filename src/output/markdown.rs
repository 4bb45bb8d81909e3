//! Markdown report generation
//!
//! This module generates a human-readable markdown report of a batch,
//! including band statistics, the clinics found to own equipment, and the
//! targets that could not be classified.

use super::traits::{BatchReport, OutputHandler, OutputResult};
use crate::model::ScanResult;
use crate::state::ConfidenceBand;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the markdown report to a file
pub struct MarkdownOutput {
    path: PathBuf,
}

impl MarkdownOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for MarkdownOutput {
    fn name(&self) -> &str {
        "markdown"
    }

    fn write_report(&self, report: &BatchReport<'_>) -> OutputResult<()> {
        generate_markdown_report(report, &self.path)
    }
}

/// Generates a markdown report of a finished batch
///
/// # Arguments
///
/// * `report` - The finished batch
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_report(report: &BatchReport<'_>, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a batch as markdown
pub fn format_markdown_report(report: &BatchReport<'_>) -> String {
    let summary = report.summary;
    let mut md = String::new();

    md.push_str("# Clinic Scanner Probe Report\n\n");

    // Run metadata
    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Started**: {}\n",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    let duration = summary.duration_seconds();
    md.push_str(&format!(
        "- **Duration**: {} seconds ({:.2} minutes)\n",
        duration,
        duration as f64 / 60.0
    ));
    if let Some(hash) = &summary.config_hash {
        md.push_str(&format!("- **Config Hash**: {}\n", hash));
    }
    md.push('\n');

    // Overall statistics
    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Input Rows**: {}\n", summary.total_rows));
    md.push_str(&format!("- **Targets Crawled**: {}\n", summary.targets()));
    md.push_str(&format!("- **Rows Skipped**: {}\n", summary.skipped()));
    md.push_str(&format!("- **Pages Examined**: {}\n", summary.pages_examined));
    md.push_str(&format!("- **Equipment Found**: {}\n", summary.positives()));
    md.push_str(&format!(
        "- **Throughput**: {:.1} targets/min\n\n",
        summary.rate_per_minute()
    ));

    // Band breakdown
    md.push_str("## Confidence Bands\n\n");
    md.push_str("| Band | Count |\n");
    md.push_str("|------|-------|\n");
    for band in ConfidenceBand::all_bands() {
        md.push_str(&format!("| {} | {} |\n", band, summary.count(band)));
    }
    md.push('\n');

    // Positive classifications, strongest first
    let mut found: Vec<&ScanResult> = report.results.iter().filter(|r| r.has_equipment).collect();
    found.sort_by(|a, b| b.score.cmp(&a.score).then(a.target.row.cmp(&b.target.row)));

    if !found.is_empty() {
        md.push_str("## Equipment Found\n\n");
        md.push_str("| Clinic | Website | Band | Score | Evidence |\n");
        md.push_str("|--------|---------|------|-------|----------|\n");
        for result in found {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                escape_cell(&result.target.name),
                escape_cell(&result.target.website),
                result.band,
                result.score,
                escape_cell(&result.evidence)
            ));
        }
        md.push('\n');
    }

    // Failures
    let failed: Vec<&ScanResult> = report.results.iter().filter(|r| r.band.is_failure()).collect();
    if !failed.is_empty() {
        md.push_str("## Unclassified Targets\n\n");
        md.push_str("| Clinic | Website | Band | Reason |\n");
        md.push_str("|--------|---------|------|--------|\n");
        for result in failed {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                escape_cell(&result.target.name),
                escape_cell(&result.target.website),
                result.band,
                escape_cell(&result.reason)
            ));
        }
        md.push('\n');
    }

    md
}

/// Keeps a value from breaking the table layout
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
