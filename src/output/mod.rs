//! Output module for writing batch results and reports
//!
//! This module handles:
//! - Writing the row-preserving result CSV
//! - Generating markdown reports of a batch
//! - Counting results per band and printing the run summary

mod csv_output;
mod markdown;
pub mod stats;
mod traits;

pub use csv_output::{default_output_path, write_results, CsvOutput, RESULT_COLUMNS};
pub use markdown::{format_markdown_report, generate_markdown_report, MarkdownOutput};
pub use stats::{print_summary, BatchSummary};
pub use traits::{BatchReport, OutputError, OutputHandler, OutputResult};
