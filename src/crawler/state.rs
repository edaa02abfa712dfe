use crate::crawler::{CrawlOutcome, ScoredPage, TerminationReason, VisitRecord, VisitStatus};
use crate::fetcher::FetchError;
use crate::frontier::{Frontier, FrontierEntry};
use std::time::Duration;

/// Mutable state of one crawl run
///
/// Owned by the crawl loop for the lifetime of a single run and consumed into
/// a [`CrawlOutcome`] when the run ends.
#[derive(Debug)]
pub(crate) struct CrawlState {
    pub frontier: Frontier,
    pub collected: Vec<ScoredPage>,
    pub cumulative_score: f64,
    pub visits: Vec<VisitRecord>,
}

impl CrawlState {
    pub fn new(frontier: Frontier) -> Self {
        Self {
            frontier,
            collected: Vec::new(),
            cumulative_score: 0.0,
            visits: Vec::new(),
        }
    }

    /// Applies the collection decision to a scored page
    ///
    /// Returns true if the page was collected.
    pub fn record_page(&mut self, page: ScoredPage, min_score: f64) -> bool {
        let score = page.relevance_score;
        let collect = score >= min_score;

        self.visits.push(VisitRecord {
            url: page.url.clone(),
            depth: page.depth,
            status: if collect {
                VisitStatus::Collected { score }
            } else {
                VisitStatus::Discarded { score }
            },
        });

        if collect {
            self.cumulative_score += score;
            self.collected.push(page);
        }
        collect
    }

    pub fn record_failure(&mut self, entry: &FrontierEntry, error: FetchError) {
        self.visits.push(VisitRecord {
            url: entry.url.clone(),
            depth: entry.depth,
            status: VisitStatus::Failed(error),
        });
    }

    pub fn budget_reached(&self, threshold: f64) -> bool {
        self.cumulative_score >= threshold
    }

    pub fn into_outcome(
        self,
        reason: TerminationReason,
        abandoned_in_flight: usize,
        elapsed: Duration,
    ) -> CrawlOutcome {
        CrawlOutcome {
            frontier_remaining: self.frontier.len(),
            collected: self.collected,
            cumulative_score: self.cumulative_score,
            reason,
            visits: self.visits,
            abandoned_in_flight,
            elapsed,
        }
    }
}
