//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests that follow redirects
//! - Decoding bodies in legacy Korean charsets
//! - Error classification (timeout versus everything else)

use super::parser::{parse_html, PageLink};
use crate::config::Config;
use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// How many leading bytes are searched for a `<meta charset>` declaration
const META_SNIFF_LIMIT: usize = 2048;

/// A successfully fetched and parsed page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects; links resolve against it
    pub final_url: Url,
    pub title: Option<String>,
    pub text: String,
    pub links: Vec<PageLink>,
}

/// A failed fetch
///
/// Only the timeout flag matters to the crawler: timeouts count toward
/// escalation, everything else is skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
    pub is_timeout: bool,
}

impl FetchError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_timeout: true,
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_timeout: false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::timeout("Request timeout")
        } else if e.is_connect() {
            FetchError::other(format!("Connection failed: {}", e))
        } else if e.is_redirect() {
            FetchError::other(format!("Redirect error: {}", e))
        } else {
            FetchError::other(e.to_string())
        }
    }
}

/// Source of pages for the site crawler
///
/// The HTTP implementation is [`HttpFetcher`]; tests substitute scripted
/// fetchers.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one URL and returns its parsed content
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The probe configuration (user agent and request timeout)
///
/// # Example
///
/// ```no_run
/// use clinic_probe::config::Config;
/// use clinic_probe::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_millis(config.crawler.request_timeout_ms);

    Client::builder()
        .user_agent(config.user_agent.value.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP with a shared client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::other(format!("HTTP {}", status.as_u16())));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(content_type) = &content_type {
            if !is_html_content_type(content_type) {
                return Err(FetchError::other(format!("Not an HTML page: {}", content_type)));
            }
        }

        let body = response.bytes().await?;
        let html = decode_body(&body, content_type.as_deref());
        let parsed = parse_html(&html, &final_url);

        Ok(FetchedPage {
            final_url,
            title: parsed.title,
            text: parsed.text,
            links: parsed.links,
        })
    }
}

fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type.to_ascii_lowercase();
    mime.contains("text/html") || mime.contains("application/xhtml")
}

/// Decodes a response body to UTF-8
///
/// Charset detection order: byte-order mark, the `charset` parameter of the
/// Content-Type header, a `<meta charset>` near the top of the document, and
/// finally UTF-8. Malformed sequences are replaced, never fatal.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| content_type.and_then(charset_param))
        .or_else(|| sniff_meta_charset(bytes))
        .unwrap_or(UTF_8);

    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

fn charset_param(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

fn sniff_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_SNIFF_LIMIT)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();

    let start = head.find("charset=")? + "charset=".len();
    let label: String = head[start..]
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    Encoding::for_label(label.as_bytes())
}
