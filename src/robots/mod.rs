//! robots.txt hook
//!
//! [`RobotsCache`] fetches robots.txt once per origin, keeps it for a day,
//! and answers whether a URL may be fetched and how long to wait between
//! requests. A robots.txt that cannot be fetched allows everything.

mod cache;
mod parser;

pub use cache::{CachedRobots, ROBOTS_TTL_HOURS};
pub use parser::RobotsRules;

use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

/// Upper bound applied to a robots.txt `Crawl-delay`
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Outcome of a robots.txt check for one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotsDecision {
    pub allowed: bool,
    pub crawl_delay: Option<Duration>,
}

/// Per-origin robots.txt cache
#[derive(Debug)]
pub struct RobotsCache {
    client: Client,
    user_agent: String,
    entries: Mutex<HashMap<String, CachedRobots>>,
}

impl RobotsCache {
    pub fn new(client: Client, user_agent: impl Into<String>) -> Self {
        Self {
            client,
            user_agent: user_agent.into(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Checks `url` against its origin's robots.txt, fetching it if needed
    pub async fn check(&self, url: &Url) -> RobotsDecision {
        let origin = url.origin().ascii_serialization();

        // The lock is held across the fetch so each origin is fetched once
        let mut entries = self.entries.lock().await;
        let stale = entries.get(&origin).map_or(true, CachedRobots::is_stale);
        if stale {
            let rules = fetch_robots(&self.client, &origin).await;
            entries.insert(origin.clone(), CachedRobots::new(rules));
        }

        match entries.get(&origin) {
            Some(cached) => RobotsDecision {
                allowed: cached.rules.is_allowed(url, &self.user_agent),
                crawl_delay: cached
                    .rules
                    .crawl_delay(&self.user_agent)
                    .map(|d| d.min(MAX_CRAWL_DELAY)),
            },
            None => RobotsDecision {
                allowed: true,
                crawl_delay: None,
            },
        }
    }
}

/// Fetches and parses `<origin>/robots.txt`
///
/// Any failure (network error, non-2xx status, unreadable body) yields
/// allow-all rules.
pub async fn fetch_robots(client: &Client, origin: &str) -> RobotsRules {
    let robots_url = format!("{}/robots.txt", origin);

    let response = match client.get(&robots_url).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!("robots.txt unavailable at {}: {}", robots_url, e);
            return RobotsRules::allow_all();
        }
    };

    if !response.status().is_success() {
        debug!(
            "robots.txt at {} returned HTTP {}",
            robots_url,
            response.status().as_u16()
        );
        return RobotsRules::allow_all();
    }

    match response.text().await {
        Ok(body) => RobotsRules::parse(&body),
        Err(e) => {
            debug!("Failed to read robots.txt at {}: {}", robots_url, e);
            RobotsRules::allow_all()
        }
    }
}
