//! Clinic-Probe: website-evidence classifier for dental equipment ownership
//!
//! This crate crawls each clinic's own website within a page and depth budget,
//! prioritizing equipment and treatment pages, and scores the keyword evidence
//! it finds into a confidence band.

pub mod config;
pub mod crawler;
pub mod input;
pub mod model;
pub mod output;
pub mod scoring;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Clinic-Probe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] input::InputError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown text encoding: {0}")]
    UnknownEncoding(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Clinic-Probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{BatchScheduler, HttpFetcher, PageFetcher, SiteCrawler};
pub use model::{ScanResult, Target};
pub use state::{ConfidenceBand, CrawlState};
pub use crate::url::{extract_host, normalize_url};
