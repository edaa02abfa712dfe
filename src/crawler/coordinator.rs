//! Crawl coordinator: the main loop
//!
//! The loop is the single writer of all crawl state. Fetches may run
//! concurrently (up to `workers`), but every completed fetch is scored,
//! collected and checked against the budget one at a time, in completion
//! order.
//!
//! # Loop
//!
//! 1. Top up the in-flight set from the frontier
//! 2. If nothing is in flight, the frontier is exhausted: stop
//! 3. Take the next completed fetch
//!    - Failure: record it and continue
//!    - Redirected to another host: record a `Blocked` failure and continue
//!    - Success: score, collect if `score >= min_score`
//! 4. If the cumulative score reached the threshold: stop, abandoning any
//!    fetches still in flight
//! 5. If the page is shallower than `max_depth`, enqueue its links

use crate::config::{validate_crawler_config, CrawlerConfig};
use crate::crawler::state::CrawlState;
use crate::crawler::{CrawlOutcome, ScoredPage, TerminationReason};
use crate::fetcher::{FetchError, FetchedPage, PageFetcher};
use crate::frontier::{Frontier, FrontierEntry};
use crate::keywords::KeywordSet;
use crate::scoring::Scorer;
use crate::url::is_same_host;
use crate::ConfigError;
use futures::stream::{FuturesUnordered, StreamExt};
use std::ops::ControlFlow;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Budgeted, breadth-first crawler
///
/// A `Crawler` holds no per-run state; each call to [`Crawler::run`] builds
/// its own frontier and collection, so runs never share state.
///
/// With `workers > 1` pages complete out of breadth-first order. A queued URL
/// rediscovered on a shorter path takes the smaller depth, but a URL already
/// fetched keeps the depth it was fetched at, so a few of its links may fall
/// outside `max_depth` where a serial crawl would have followed them.
pub struct Crawler<F, S> {
    fetcher: F,
    scorer: S,
    config: CrawlerConfig,
}

impl<F: PageFetcher, S: Scorer> Crawler<F, S> {
    /// Creates a crawler
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - The configuration is valid
    /// * `Err(ConfigError)` - The configuration is invalid; no crawl can start
    pub fn new(fetcher: F, scorer: S, config: CrawlerConfig) -> Result<Self, ConfigError> {
        validate_crawler_config(&config)?;
        Ok(Self {
            fetcher,
            scorer,
            config,
        })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawls from `seed` and returns the collected pages
    ///
    /// Page failures never abort the run. The only error is a seed that is
    /// not a valid HTTP(S) URL, reported before anything is fetched.
    pub async fn run(&self, seed: &str, keywords: &KeywordSet) -> Result<CrawlOutcome, ConfigError> {
        let frontier = Frontier::with_seed(seed, self.config.max_depth)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", seed, e)))?;

        info!(
            "Starting crawl of {} (max depth {}, min score {}, threshold {}, {} keywords)",
            seed,
            self.config.max_depth,
            self.config.min_score,
            self.config.cumulative_score_threshold,
            keywords.len()
        );

        let started = Instant::now();
        let workers = self.config.workers.max(1) as usize;
        let mut state = CrawlState::new(frontier);
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < workers {
                match state.frontier.dequeue() {
                    Some(entry) => in_flight.push(self.fetch_entry(entry)),
                    None => break,
                }
            }

            let Some((entry, result)) = in_flight.next().await else {
                info!(
                    "Frontier exhausted after {} pages; collected {} (cumulative score {:.2})",
                    state.visits.len(),
                    state.collected.len(),
                    state.cumulative_score
                );
                return Ok(state.into_outcome(
                    TerminationReason::StoppedByExhaustion,
                    0,
                    started.elapsed(),
                ));
            };

            if let ControlFlow::Break(reason) = self.handle(&mut state, entry, result, keywords) {
                let abandoned = in_flight.len();
                info!(
                    "Score budget reached: {:.2} >= {:.2}; abandoning {} in-flight fetches",
                    state.cumulative_score, self.config.cumulative_score_threshold, abandoned
                );
                return Ok(state.into_outcome(reason, abandoned, started.elapsed()));
            }
        }
    }

    async fn fetch_entry(
        &self,
        entry: FrontierEntry,
    ) -> (FrontierEntry, Result<FetchedPage, FetchError>) {
        let result = self.fetcher.fetch(&entry.url).await;
        (entry, result)
    }

    /// Applies one completed fetch to the crawl state
    fn handle(
        &self,
        state: &mut CrawlState,
        entry: FrontierEntry,
        result: Result<FetchedPage, FetchError>,
        keywords: &KeywordSet,
    ) -> ControlFlow<TerminationReason> {
        let page = match result {
            Ok(page) => page,
            Err(error) => {
                warn!("Failed to fetch {}: {}", entry.url, error);
                state.record_failure(&entry, error);
                return ControlFlow::Continue(());
            }
        };

        if !is_same_host(&page.final_url, state.frontier.seed_host()) {
            warn!(
                "Discarding {}: redirected off-domain to {}",
                entry.url, page.final_url
            );
            state.record_failure(
                &entry,
                FetchError::Blocked(format!("redirected off-domain to {}", page.final_url)),
            );
            return ControlFlow::Continue(());
        }

        let score = self.scorer.score(&page.title, &page.text, keywords);
        info!(
            "Page: {} | Title: {} | Score: {:.2}",
            entry.url, page.title, score
        );

        let links = page.links.clone();
        let scored = ScoredPage {
            url: entry.url.clone(),
            title: page.title,
            raw_text: page.text,
            relevance_score: score,
            links: page.links,
            depth: entry.depth,
        };

        if state.record_page(scored, self.config.min_score) {
            info!(
                "Collected {} (cumulative {:.2}/{:.2})",
                entry.url, state.cumulative_score, self.config.cumulative_score_threshold
            );
        } else {
            debug!(
                "Discarded {} (score {:.2} < {:.2})",
                entry.url, score, self.config.min_score
            );
        }

        if state.budget_reached(self.config.cumulative_score_threshold) {
            return ControlFlow::Break(TerminationReason::StoppedByBudget);
        }

        if entry.depth < self.config.max_depth {
            let mut queued = 0;
            for link in &links {
                let admission =
                    state
                        .frontier
                        .enqueue(link.as_str(), entry.depth + 1, Some(&entry.url));
                if admission.is_queued() {
                    queued += 1;
                }
            }
            debug!(
                "Queued {} of {} links from {}",
                queued,
                links.len(),
                entry.url
            );
        }

        ControlFlow::Continue(())
    }
}
