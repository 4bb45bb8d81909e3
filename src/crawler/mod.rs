//! Crawler module for site traversal and batch execution
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and body decoding
//! - HTML parsing and link extraction
//! - Link prioritization within a site
//! - The per-target crawl loop
//! - Concurrent batch scheduling with a global deadline

mod fetcher;
mod parser;
pub mod prioritizer;
pub mod progress;
mod scheduler;
mod site;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::{build_http_client, decode_body, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use parser::{parse_html, PageLink, ParsedPage};
pub use prioritizer::{prioritize_links, LinkCandidate};
pub use progress::{ProgressSnapshot, ProgressTracker};
pub use scheduler::BatchScheduler;
pub use site::{CrawlFailure, SiteCrawler};
