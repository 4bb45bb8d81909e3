use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL waiting in the frontier together with its hop distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Tracks one target's traversal while its crawler runs
///
/// The state is owned by a single crawler task and dropped once the target is
/// scored. A URL enters the frontier at most once, so the frontier never holds
/// a URL that has already been fetched.
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// Host every fetched URL must match exactly
    host: String,

    /// URLs already taken from the frontier
    visited: HashSet<String>,

    /// Every URL ever enqueued, visited or not
    seen: HashSet<String>,

    /// FIFO queue of URLs awaiting fetch
    frontier: VecDeque<FrontierEntry>,

    /// Lowercased text of every successfully fetched page
    aggregated_text: String,

    /// Per-page keyword findings, in fetch order
    evidence: Vec<String>,

    /// Fetch attempts so far, failed ones included
    page_count: u32,

    /// Timeouts observed across the whole target
    timeout_count: u32,
}

impl CrawlState {
    /// Creates a state whose frontier holds only the seed at depth 0
    pub fn new(seed: Url, host: impl Into<String>) -> Self {
        let mut state = Self {
            host: host.into(),
            visited: HashSet::new(),
            seen: HashSet::new(),
            frontier: VecDeque::new(),
            aggregated_text: String::new(),
            evidence: Vec::new(),
            page_count: 0,
            timeout_count: 0,
        };
        state.enqueue(seed, 0);
        state
    }

    /// Host of the seed URL
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Adopts the host the seed redirected to
    ///
    /// Only meaningful right after the seed fetch, while the frontier is
    /// still empty: later links are resolved against the redirected URL.
    pub fn rebase_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    /// Records a URL as fetched without it passing through the frontier
    ///
    /// Used for redirect targets so the same page is not fetched twice. A
    /// queued entry for the URL is dropped from the frontier.
    pub fn mark_visited(&mut self, url: &Url) {
        self.seen.insert(url.as_str().to_string());
        if self.visited.insert(url.as_str().to_string()) {
            self.frontier.retain(|entry| entry.url != *url);
        }
    }

    /// Adds a URL to the back of the frontier
    ///
    /// Returns false, leaving the frontier untouched, if the URL was already
    /// enqueued or fetched.
    pub fn enqueue(&mut self, url: Url, depth: u32) -> bool {
        if !self.seen.insert(url.as_str().to_string()) {
            return false;
        }
        self.frontier.push_back(FrontierEntry { url, depth });
        true
    }

    /// Returns true if the URL has been enqueued or fetched before
    pub fn is_known(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Returns true if the URL has been taken from the frontier
    pub fn has_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Takes the next URL to fetch, counting it against the page budget
    pub fn next_entry(&mut self) -> Option<FrontierEntry> {
        let entry = self.frontier.pop_front()?;
        self.visited.insert(entry.url.as_str().to_string());
        self.page_count += 1;
        Some(entry)
    }

    /// Returns true once `max_pages` fetches have been attempted
    pub fn budget_exhausted(&self, max_pages: u32) -> bool {
        self.page_count >= max_pages
    }

    /// Appends a fetched page's text, lowercased
    pub fn record_page_text(&mut self, text: &str) {
        self.aggregated_text.push_str(&text.to_lowercase());
        self.aggregated_text.push(' ');
    }

    /// Records a per-page finding
    pub fn record_evidence(&mut self, finding: String) {
        self.evidence.push(finding);
    }

    /// Counts a timeout against the whole target
    pub fn record_timeout(&mut self) {
        self.timeout_count += 1;
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn timeout_count(&self) -> u32 {
        self.timeout_count
    }

    pub fn aggregated_text(&self) -> &str {
        &self.aggregated_text
    }

    pub fn evidence(&self) -> &[String] {
        &self.evidence
    }

    /// Number of URLs still waiting in the frontier
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}
