//! HTTP page fetcher
//!
//! # Request Flow
//!
//! 1. Consult robots.txt for the URL's origin (when enabled)
//!    - Disallowed → `Blocked`, no page request is sent
//! 2. Wait for the host's politeness slot
//! 3. Send a GET request, following up to 10 redirects
//! 4. Classify the response
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Timeout | `Timeout` |
//! | Connection or TLS failure | `Unreachable` |
//! | Non-2xx status | `Http { status }` |
//! | Content-Type without `html` | `Unsupported` |
//! | Short body with error wording | `ErrorPage` |

use crate::config::FetcherConfig;
use crate::fetcher::parser::{parse_page, ContentSelectors};
use crate::fetcher::politeness::HostThrottle;
use crate::fetcher::{FetchError, FetchedPage, PageFetcher};
use crate::robots::RobotsCache;
use crate::SiftError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use tracing::debug;
use url::Url;

const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client for page and robots.txt requests
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] over HTTP(S)
#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
    robots: Option<RobotsCache>,
    throttle: HostThrottle,
    minimum_delay: Duration,
    selectors: ContentSelectors,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, SiftError> {
        let client = build_http_client(config)?;
        let selectors = ContentSelectors::from_config(config)?;
        let robots = config
            .respect_robots
            .then(|| RobotsCache::new(client.clone(), config.user_agent.clone()));

        Ok(Self {
            client,
            robots,
            throttle: HostThrottle::new(),
            minimum_delay: Duration::from_millis(config.minimum_delay_ms),
            selectors,
        })
    }

    async fn request(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.to_ascii_lowercase().contains("html") {
                return Err(FetchError::Unsupported {
                    content_type: content_type.to_string(),
                });
            }
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Unreachable(format!("failed to read body: {}", e)))?;

        let parsed = parse_page(&body, &final_url, &self.selectors);
        if parsed.looks_like_error {
            return Err(FetchError::ErrorPage);
        }

        Ok(FetchedPage {
            final_url,
            title: parsed.title,
            text: parsed.text,
            links: parsed.links,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let mut delay = self.minimum_delay;

        if let Some(robots) = &self.robots {
            let decision = robots.check(url).await;
            if !decision.allowed {
                return Err(FetchError::Blocked("disallowed by robots.txt".to_string()));
            }
            if let Some(crawl_delay) = decision.crawl_delay {
                delay = delay.max(crawl_delay);
            }
        }

        let host = match url.port() {
            Some(port) => format!("{}:{}", url.host_str().unwrap_or_default(), port),
            None => url.host_str().unwrap_or_default().to_string(),
        };
        self.throttle.wait_turn(&host, delay).await;

        debug!("Fetching {}", url);
        self.request(url).await
    }
}

fn classify_send_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Unreachable(format!("connection failed: {}", e))
    } else {
        FetchError::Unreachable(e.to_string())
    }
}
