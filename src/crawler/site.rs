//! Per-target site crawler
//!
//! Walks one clinic's website breadth-first from its seed URL, within a page
//! budget and a depth ceiling, then scores the collected text. A crawl never
//! fails from the caller's point of view: every outcome, including failures
//! and cancellation, is folded into a [`ScanResult`].

use super::fetcher::{FetchedPage, PageFetcher};
use super::prioritizer::prioritize_links;
use crate::config::Config;
use crate::model::{ScanResult, Target};
use crate::scoring::{self, find_matching_keywords};
use crate::state::CrawlState;
use crate::url::{extract_host, normalize_url, prepare_seed, same_host};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Page titles longer than this are shortened in evidence entries
const EVIDENCE_TITLE_CHARS: usize = 20;

/// Why a target could not be classified
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CrawlFailure {
    #[error("seed page unreachable ({url}): {message}")]
    SeedUnreachable { url: String, message: String },

    #[error("too many timeouts ({count})")]
    TimeoutEscalation { count: u32 },

    #[error("batch deadline exceeded")]
    SchedulerTimeout,

    #[error("crawl task failed: {0}")]
    TaskPanicked(String),
}

/// Crawls and classifies one target at a time
///
/// Cheap to clone: the fetcher and configuration are shared.
#[derive(Clone)]
pub struct SiteCrawler {
    fetcher: Arc<dyn PageFetcher>,
    config: Arc<Config>,
}

impl SiteCrawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    /// Crawls the target's website and classifies it
    ///
    /// # Outcomes
    ///
    /// | Situation | Band |
    /// |-----------|------|
    /// | No website | None, no request made |
    /// | Seed fetch fails | Error |
    /// | Timeouts reach `max_timeout_retries` | Error |
    /// | `cancel` fires mid-crawl | Timeout, pages so far reported |
    /// | Crawl completes | scored band |
    pub async fn crawl(&self, target: Target, cancel: &CancellationToken) -> ScanResult {
        if !target.has_website() {
            debug!(name = %target.name, "No website, skipping crawl");
            return ScanResult::no_website(target);
        }

        let seed = match prepare_seed(&target.website) {
            Ok(seed) => seed,
            Err(e) => {
                let failure = CrawlFailure::SeedUnreachable {
                    url: target.website.clone(),
                    message: e.to_string(),
                };
                warn!(name = %target.name, "{}", failure);
                return ScanResult::error(target, failure.to_string(), 0);
            }
        };

        let host = extract_host(&seed).unwrap_or_default();
        let mut state = CrawlState::new(seed, host);

        match self.traverse(&mut state, cancel).await {
            Ok(()) => {
                let classification = scoring::score(
                    state.aggregated_text(),
                    state.evidence(),
                    state.page_count(),
                    &self.config.keywords,
                );
                ScanResult::classified(target, classification, state.page_count())
            }
            Err(failure @ CrawlFailure::SchedulerTimeout) => {
                debug!(name = %target.name, pages = state.page_count(), "Crawl cancelled");
                ScanResult::timed_out(target, failure.to_string(), state.page_count())
            }
            Err(failure) => {
                warn!(name = %target.name, "{}", failure);
                ScanResult::error(target, failure.to_string(), state.page_count())
            }
        }
    }

    /// Runs the fetch loop until the frontier or the budget runs out
    async fn traverse(
        &self,
        state: &mut CrawlState,
        cancel: &CancellationToken,
    ) -> Result<(), CrawlFailure> {
        let limits = &self.config.crawler;
        let delay = Duration::from_millis(limits.politeness_delay_ms);

        while !state.budget_exhausted(limits.max_pages) {
            let Some(entry) = state.next_entry() else {
                break;
            };
            let is_seed = entry.depth == 0;

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CrawlFailure::SchedulerTimeout),
                fetched = self.fetcher.fetch(&entry.url) => fetched,
            };

            let page = match fetched {
                Ok(page) => page,
                Err(error) if is_seed => {
                    return Err(CrawlFailure::SeedUnreachable {
                        url: entry.url.to_string(),
                        message: error.message,
                    });
                }
                Err(error) => {
                    debug!(url = %entry.url, error = %error, "Skipping page");
                    if error.is_timeout {
                        state.record_timeout();
                        if state.timeout_count() >= limits.max_timeout_retries {
                            return Err(CrawlFailure::TimeoutEscalation {
                                count: state.timeout_count(),
                            });
                        }
                    }
                    continue;
                }
            };

            if page.final_url != entry.url {
                if is_seed {
                    if let Some(host) = extract_host(&page.final_url) {
                        if host != state.host() {
                            debug!(from = %state.host(), to = %host, "Seed redirected to another host");
                            state.rebase_host(host);
                        }
                    }
                } else if !same_host(&page.final_url, state.host()) {
                    debug!(url = %entry.url, to = %page.final_url, "Skipping page: redirected off site");
                    continue;
                }

                let landed = normalize_url(page.final_url.as_str()).unwrap_or_else(|_| page.final_url.clone());
                if landed != entry.url {
                    if state.has_visited(landed.as_str()) {
                        debug!(url = %entry.url, to = %landed, "Skipping page: redirected to a page already fetched");
                        continue;
                    }
                    state.mark_visited(&landed);
                }
            }

            self.accumulate(state, &page);

            let candidates = prioritize_links(
                &page.links,
                state,
                &self.config.keywords,
                limits.max_pages,
                entry.depth,
                limits.max_depth,
            );
            for candidate in candidates {
                trace!(
                    url = %candidate.url,
                    anchor = %candidate.anchor_text,
                    priority = candidate.priority,
                    "Queueing link"
                );
                state.enqueue(candidate.url, entry.depth + 1);
            }

            let more_to_fetch = state.frontier_len() > 0 && !state.budget_exhausted(limits.max_pages);
            if more_to_fetch && !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CrawlFailure::SchedulerTimeout),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }

        Ok(())
    }

    /// Adds a fetched page's text and scanner findings to the state
    fn accumulate(&self, state: &mut CrawlState, page: &FetchedPage) {
        state.record_page_text(&page.text);

        let found = find_matching_keywords(&page.text, &self.config.keywords.primary);
        if !found.is_empty() {
            let title = page.title.as_deref().unwrap_or_else(|| page.final_url.path());
            state.record_evidence(format!("page[{}]: {}", shorten_title(title), found.join(", ")));
        }
    }
}

/// Cuts a title to a fixed number of characters, marking the cut
fn shorten_title(title: &str) -> String {
    if title.chars().count() > EVIDENCE_TITLE_CHARS {
        let head: String = title.chars().take(EVIDENCE_TITLE_CHARS).collect();
        format!("{}...", head)
    } else {
        title.to_string()
    }
}
