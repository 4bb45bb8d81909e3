//! State module for tracking crawl progress and classification outcome
//!
//! # Components
//!
//! - `CrawlState`: one target's frontier, visited set, page text and counters
//! - `ConfidenceBand`: the classification band attached to every result

mod band;
mod crawl_state;

// Re-export main types
pub use band::{ConfidenceBand, HIGH_THRESHOLD, LOW_THRESHOLD, MEDIUM_THRESHOLD};
pub use crawl_state::{CrawlState, FrontierEntry};
