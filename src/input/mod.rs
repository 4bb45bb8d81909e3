//! Input module for loading clinic records
//!
//! This module handles:
//! - Decoding input files in legacy encodings (EUC-KR by default)
//! - Parsing the CSV table while keeping every original row
//! - Selecting which rows become crawl targets

mod reader;
mod selection;

pub use reader::{decode_input, parse_table, read_input, InputTable};
pub use selection::{select_targets, skip_reason, SkipReason};

use thiserror::Error;

/// Errors that can occur while loading input records
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown input encoding: {0}")]
    UnknownEncoding(String),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input file has no header line")]
    MissingHeader,
}

/// Result type for input operations
pub type InputResult<T> = Result<T, InputError>;
