//! URL handling module for Clinic-Probe
//!
//! This module provides seed URL preparation, link normalization and the
//! exact-host comparison that keeps every crawl on its clinic's own site.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, same_host};
pub use normalize::{normalize_url, prepare_seed};
