use url::Url;

/// Extracts the host from a URL
///
/// The host is returned lowercased and without the port. Subdomains are kept
/// as-is: `www.example.com` and `example.com` are different hosts.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use clinic_probe::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("https://www.example.com/path").unwrap();
/// assert_eq!(extract_host(&url), Some("www.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if `url` lives on exactly `host`
pub fn same_host(url: &Url, host: &str) -> bool {
    extract_host(url).is_some_and(|h| h == host)
}
