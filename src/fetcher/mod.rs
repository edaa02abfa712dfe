//! Page fetching
//!
//! The crawler only sees the [`PageFetcher`] trait: given a URL it returns
//! the page title, main text and outbound links, or a [`FetchError`]. Every
//! fetch error is a per-page failure and never stops a crawl.
//!
//! [`HttpFetcher`] is the network implementation, built on reqwest and
//! scraper.

mod http;
mod parser;
mod politeness;

pub use http::{build_http_client, HttpFetcher};
pub use parser::{parse_page, ContentSelectors, ParsedPage};
pub use politeness::HostThrottle;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// URL the content was served from, after redirects
    pub final_url: Url,

    /// Page title (empty when the page has none)
    pub title: String,

    /// Main text of the page, whitespace collapsed
    pub text: String,

    /// Absolute, normalized outbound links in document order
    pub links: Vec<Url>,
}

/// Why a single page could not be fetched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {status}")]
    Http { status: u16 },

    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("blocked: {0}")]
    Blocked(String),

    #[error("unsupported content type: {content_type}")]
    Unsupported { content_type: String },

    #[error("response looks like an error page")]
    ErrorPage,
}

impl FetchError {
    /// Short stable label used for statistics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::Http { .. } => "http",
            FetchError::Unreachable(_) => "unreachable",
            FetchError::Blocked(_) => "blocked",
            FetchError::Unsupported { .. } => "unsupported",
            FetchError::ErrorPage => "error_page",
        }
    }
}

/// Resolves a URL to page content
///
/// Implementations may suspend on network I/O; this is the only place a
/// crawl waits.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}
