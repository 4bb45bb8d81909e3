//! Link prioritization
//!
//! Decides which links of a fetched page enter the frontier and in what
//! order. Pages whose URL or anchor mentions equipment, treatments or the
//! clinic itself come first; boards, blogs and other noise are vetoed.

use super::parser::PageLink;
use crate::config::KeywordConfig;
use crate::state::CrawlState;
use crate::url::{normalize_url, same_host};
use std::collections::HashMap;
use url::Url;

/// Points for each priority keyword found in the link URL
pub const URL_KEYWORD_WEIGHT: u32 = 10;

/// Points for each priority keyword found in the anchor text
pub const ANCHOR_KEYWORD_WEIGHT: u32 = 15;

/// A link that passed every filter, ready to be enqueued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    pub url: Url,
    pub anchor_text: String,
    pub priority: u32,
    /// Position of the link on its page; breaks priority ties
    pub discovery: usize,
}

/// Computes the priority of a link
///
/// Returns 0 when the link is vetoed by an exclusion keyword. A link that
/// survives the veto but matches no priority keyword gets 1, so it is still
/// eligible behind the promising ones.
///
/// Only the path and query of the URL are matched: the host is shared by
/// every candidate of a site and says nothing about the page.
pub fn link_priority(url: &Url, anchor_text: &str, keywords: &KeywordConfig) -> u32 {
    let location = location_of(url).to_lowercase();
    let anchor = anchor_text.to_lowercase();

    let vetoed = keywords
        .excluded_pages
        .iter()
        .map(|k| k.to_lowercase())
        .any(|k| location.contains(&k) || anchor.contains(&k));
    if vetoed {
        return 0;
    }

    let mut priority = 0;
    for keyword in &keywords.priority_pages {
        let keyword = keyword.to_lowercase();
        if location.contains(&keyword) {
            priority += URL_KEYWORD_WEIGHT;
        }
        if anchor.contains(&keyword) {
            priority += ANCHOR_KEYWORD_WEIGHT;
        }
    }

    priority.max(1)
}

/// Returns true if the anchor text names a downloadable resource
pub fn is_resource_link(anchor_text: &str, extensions: &[String]) -> bool {
    let anchor = anchor_text.trim().to_lowercase();
    extensions
        .iter()
        .any(|ext| anchor.ends_with(&ext.to_lowercase()))
}

/// Filters and orders the links of one page
///
/// # Rules
///
/// 1. Nothing is returned once `current_depth` reaches `max_depth`
/// 2. Links must parse and share the seed host exactly
/// 3. Exclusion keywords and resource anchors discard a link
/// 4. URLs already visited or queued are dropped
/// 5. Duplicates on the page keep their best priority and first position
/// 6. Order is priority descending, then page position
/// 7. At most `max_pages - 1` candidates are returned
pub fn prioritize_links(
    links: &[PageLink],
    state: &CrawlState,
    keywords: &KeywordConfig,
    max_pages: u32,
    current_depth: u32,
    max_depth: u32,
) -> Vec<LinkCandidate> {
    if current_depth >= max_depth {
        return Vec::new();
    }

    let mut best: HashMap<String, LinkCandidate> = HashMap::new();

    for (discovery, link) in links.iter().enumerate() {
        let Ok(url) = normalize_url(&link.url) else {
            continue;
        };

        if !same_host(&url, state.host()) {
            continue;
        }

        if state.is_known(url.as_str()) {
            continue;
        }

        if is_resource_link(&link.anchor_text, &keywords.resource_extensions) {
            continue;
        }

        let priority = link_priority(&url, &link.anchor_text, keywords);
        if priority == 0 {
            continue;
        }

        best.entry(url.as_str().to_string())
            .and_modify(|existing| {
                if priority > existing.priority {
                    existing.priority = priority;
                    existing.anchor_text = link.anchor_text.clone();
                }
            })
            .or_insert_with(|| LinkCandidate {
                url,
                anchor_text: link.anchor_text.clone(),
                priority,
                discovery,
            });
    }

    let mut candidates: Vec<LinkCandidate> = best.into_values().collect();
    candidates.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(a.discovery.cmp(&b.discovery))
    });
    candidates.truncate(max_pages.saturating_sub(1) as usize);

    candidates
}

/// Path plus query, the part of a URL that identifies a page within a site
fn location_of(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
