//! Scripted page source for crawler and scheduler tests

use super::fetcher::{FetchError, FetchedPage, PageFetcher};
use super::parser::parse_html;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use url::Url;

enum Script {
    Page { final_url: Option<String>, html: String },
    Timeout,
    Fail,
    Hang,
    Panic,
}

/// Serves canned responses keyed by exact URL; unknown URLs answer 404
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, html: &str) -> Self {
        self.scripts.insert(
            url.to_string(),
            Script::Page {
                final_url: None,
                html: html.to_string(),
            },
        );
        self
    }

    pub(crate) fn redirect(mut self, url: &str, final_url: &str, html: &str) -> Self {
        self.scripts.insert(
            url.to_string(),
            Script::Page {
                final_url: Some(final_url.to_string()),
                html: html.to_string(),
            },
        );
        self
    }

    pub(crate) fn timeout(mut self, url: &str) -> Self {
        self.scripts.insert(url.to_string(), Script::Timeout);
        self
    }

    pub(crate) fn fail(mut self, url: &str) -> Self {
        self.scripts.insert(url.to_string(), Script::Fail);
        self
    }

    pub(crate) fn hang(mut self, url: &str) -> Self {
        self.scripts.insert(url.to_string(), Script::Hang);
        self
    }

    pub(crate) fn panic(mut self, url: &str) -> Self {
        self.scripts.insert(url.to_string(), Script::Panic);
        self
    }

    /// URLs requested so far, in request order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        match self.scripts.get(url.as_str()) {
            Some(Script::Page { final_url, html }) => {
                let final_url = match final_url {
                    Some(u) => Url::parse(u).unwrap(),
                    None => url.clone(),
                };
                let parsed = parse_html(html, &final_url);
                Ok(FetchedPage {
                    final_url,
                    title: parsed.title,
                    text: parsed.text,
                    links: parsed.links,
                })
            }
            Some(Script::Timeout) => Err(FetchError::timeout("Request timeout")),
            Some(Script::Fail) => Err(FetchError::other("HTTP 500")),
            Some(Script::Hang) => std::future::pending().await,
            Some(Script::Panic) => panic!("scripted fetch panic for {}", url),
            None => Err(FetchError::other("HTTP 404")),
        }
    }
}
