//! Crawl frontier
//!
//! The frontier is the breadth-first queue of discovered but not yet fetched
//! URLs, together with the set of URLs already handed out for fetching. It is
//! owned by exactly one crawl run.
//!
//! Every URL is normalized before it is compared or stored, so two spellings
//! of the same resource can never both be fetched.

use crate::url::{extract_domain, is_same_host, normalize_url};
use crate::UrlError;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, trace};
use url::Url;

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized absolute URL
    pub url: Url,

    /// Link distance from the seed (the seed is depth 0)
    pub depth: u32,

    /// Page on which this URL was discovered (none for the seed)
    pub discovered_from: Option<Url>,
}

/// Result of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The URL was appended to the queue
    Queued,

    /// The URL is already queued or has already been handed out
    ///
    /// A queued entry rediscovered at a shallower depth takes that depth.
    AlreadySeen,

    /// The URL's depth exceeds the maximum depth
    TooDeep,

    /// The URL's host differs from the seed host (a leading `www.` is ignored)
    OffDomain,

    /// The URL could not be normalized
    Invalid,
}

impl Admission {
    pub fn is_queued(self) -> bool {
        self == Admission::Queued
    }
}

/// Breadth-first frontier with same-host filtering
///
/// # Invariants
///
/// - Entries leave the queue in the order they were admitted
/// - A normalized URL is admitted at most once per frontier
/// - A queued entry carries the smallest depth it was discovered at
/// - The visited set only grows
#[derive(Debug)]
pub struct Frontier {
    /// Entries in discovery order
    queue: VecDeque<FrontierEntry>,

    /// Normalized URLs currently in `queue`
    pending: HashSet<String>,

    /// Normalized URLs already dequeued
    visited: HashSet<String>,

    /// Host every admitted URL must share
    seed_host: String,

    /// Deepest admissible depth
    max_depth: u32,
}

impl Frontier {
    /// Creates an empty frontier bound to a host
    ///
    /// # Arguments
    ///
    /// * `seed_host` - Host key as produced by [`extract_domain`]
    /// * `max_depth` - Deepest depth that may be admitted
    pub fn new(seed_host: impl Into<String>, max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            pending: HashSet::new(),
            visited: HashSet::new(),
            seed_host: seed_host.into(),
            max_depth,
        }
    }

    /// Creates a frontier holding only the seed at depth 0
    ///
    /// # Returns
    ///
    /// * `Ok(Frontier)` - Frontier bound to the seed's host
    /// * `Err(UrlError)` - The seed is not a valid HTTP(S) URL
    pub fn with_seed(seed: &str, max_depth: u32) -> Result<Self, UrlError> {
        let seed = normalize_url(seed)?;
        let host = extract_domain(&seed).ok_or(UrlError::MissingDomain)?;

        let mut frontier = Self::new(host, max_depth);
        frontier.admit(seed, 0, None);
        Ok(frontier)
    }

    /// Offers a URL to the frontier
    ///
    /// The URL is normalized first. It is rejected when it cannot be
    /// normalized, when `depth` exceeds the maximum depth, when its host
    /// differs from the seed host, or when it has already been queued or
    /// visited. Rejection is never an error.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL as discovered
    /// * `depth` - Depth the URL would be fetched at
    /// * `from` - Page the URL was found on
    pub fn enqueue(&mut self, url: &str, depth: u32, from: Option<&Url>) -> Admission {
        let url = match normalize_url(url) {
            Ok(url) => url,
            Err(e) => {
                trace!("Rejected {}: {}", url, e);
                return Admission::Invalid;
            }
        };

        if depth > self.max_depth {
            trace!("Rejected {} at depth {}: too deep", url, depth);
            return Admission::TooDeep;
        }

        if !is_same_host(&url, &self.seed_host) {
            trace!("Rejected {}: off domain", url);
            return Admission::OffDomain;
        }

        if self.pending.contains(url.as_str()) {
            self.promote(&url, depth, from);
            return Admission::AlreadySeen;
        }
        if self.visited.contains(url.as_str()) {
            return Admission::AlreadySeen;
        }

        self.admit(url, depth, from.cloned());
        Admission::Queued
    }

    fn admit(&mut self, url: Url, depth: u32, discovered_from: Option<Url>) {
        debug!("Queued {} at depth {}", url, depth);
        self.pending.insert(url.as_str().to_string());
        self.queue.push_back(FrontierEntry {
            url,
            depth,
            discovered_from,
        });
    }

    /// Lowers the depth of a queued entry found again on a shorter path
    fn promote(&mut self, url: &Url, depth: u32, from: Option<&Url>) {
        if let Some(entry) = self
            .queue
            .iter_mut()
            .find(|entry| entry.url == *url && entry.depth > depth)
        {
            debug!("Raised {} from depth {} to {}", url, entry.depth, depth);
            entry.depth = depth;
            entry.discovered_from = from.cloned();
        }
    }

    /// Pops the oldest entry and marks it visited
    ///
    /// The visited mark is a check-and-set: an entry whose URL is already
    /// visited is skipped, so each URL is handed out at most once.
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        while let Some(entry) = self.queue.pop_front() {
            let key = entry.url.as_str();
            self.pending.remove(key);
            if self.visited.insert(key.to_string()) {
                return Some(entry);
            }
            trace!("Skipping already visited {}", entry.url);
        }
        None
    }

    /// Number of entries waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn seed_host(&self) -> &str {
        &self.seed_host
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
