use url::Url;

/// Extracts the host key used for same-domain comparisons
///
/// The host is lower-cased and a leading `www.` is dropped, so the key of a
/// normalized URL equals the key of any of its un-normalized spellings.
/// Ports are not part of the key.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sift_crawl::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Example.com:8443/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let host = h.to_lowercase();
        match host.strip_prefix("www.") {
            Some(stripped) => stripped.to_string(),
            None => host,
        }
    })
}

/// Returns true if `url` lives on `host` (a key produced by [`extract_domain`])
pub fn is_same_host(url: &Url, host: &str) -> bool {
    extract_domain(url).as_deref() == Some(host)
}
