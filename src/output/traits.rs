//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! bundle of data every handler receives once a batch has finished.

use super::stats::BatchSummary;
use crate::input::InputTable;
use crate::model::ScanResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Everything known about a finished batch
#[derive(Debug, Clone, Copy)]
pub struct BatchReport<'a> {
    /// The input table, every original row included
    pub table: &'a InputTable,

    /// One result per crawled target, in target order
    pub results: &'a [ScanResult],

    pub summary: &'a BatchSummary,

    /// Value that marks an absent email or website in the input
    pub placeholder: &'a str,
}

/// Trait for output handlers
///
/// Handlers turn a finished batch into an artifact (a file, a report).
/// Each handler is invoked once per run.
pub trait OutputHandler {
    /// Short name used in log lines
    fn name(&self) -> &str;

    /// Writes the batch
    ///
    /// # Arguments
    ///
    /// * `report` - The finished batch
    fn write_report(&self, report: &BatchReport<'_>) -> OutputResult<()>;
}
