//! Crawler module: the budgeted crawl loop
//!
//! This module contains the crawl state machine, including:
//! - Driving the frontier breadth-first from a seed URL
//! - Fetching pages through a [`PageFetcher`](crate::fetcher::PageFetcher)
//! - Scoring each page and deciding whether to collect it
//! - Stopping once the collected pages reach the cumulative score budget
//!
//! A run ends in one of two terminal states, recorded as a
//! [`TerminationReason`]. Both produce the same [`CrawlOutcome`] shape.

mod coordinator;
mod state;

pub use coordinator::Crawler;

use crate::fetcher::FetchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// A fetched and scored page
///
/// Created once, right after the page is scored, and never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPage {
    /// Normalized URL the page was requested at
    pub url: Url,
    pub title: String,
    pub raw_text: String,
    /// Relevance score, `>= 0`
    pub relevance_score: f64,
    /// Outbound links found on the page
    pub links: Vec<Url>,
    pub depth: u32,
}

/// Why a crawl run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The cumulative score reached the threshold
    StoppedByBudget,

    /// The frontier drained before the threshold was reached
    StoppedByExhaustion,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::StoppedByBudget => "stopped_by_budget",
            TerminationReason::StoppedByExhaustion => "stopped_by_exhaustion",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to one fetched URL
#[derive(Debug, Clone, PartialEq)]
pub enum VisitStatus {
    /// Scored at or above the minimum and added to the collection
    Collected { score: f64 },

    /// Scored below the minimum; its links were still followed
    Discarded { score: f64 },

    /// The fetch failed
    Failed(FetchError),
}

/// One entry of the fetch log, in completion order
#[derive(Debug, Clone, PartialEq)]
pub struct VisitRecord {
    pub url: Url,
    pub depth: u32,
    pub status: VisitStatus,
}

/// Result of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Collected pages in collection order
    pub collected: Vec<ScoredPage>,

    /// Sum of `relevance_score` over `collected`
    pub cumulative_score: f64,

    pub reason: TerminationReason,

    /// Every completed fetch, successful or not
    pub visits: Vec<VisitRecord>,

    /// Fetches still running when the budget stopped the crawl
    pub abandoned_in_flight: usize,

    /// Entries left in the frontier at termination
    pub frontier_remaining: usize,

    pub elapsed: Duration,
}

impl CrawlOutcome {
    /// Number of completed fetches
    pub fn fetched(&self) -> usize {
        self.visits.len()
    }

    /// Failed visits with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&VisitRecord, &FetchError)> {
        self.visits.iter().filter_map(|visit| match &visit.status {
            VisitStatus::Failed(error) => Some((visit, error)),
            _ => None,
        })
    }

    /// Number of pages scored below the minimum
    pub fn discarded(&self) -> usize {
        self.visits
            .iter()
            .filter(|visit| matches!(visit.status, VisitStatus::Discarded { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_reason_serializes_snake_case() {
        let json = serde_json::to_string(&TerminationReason::StoppedByBudget).unwrap();
        assert_eq!(json, "\"stopped_by_budget\"");
        assert_eq!(
            TerminationReason::StoppedByExhaustion.to_string(),
            "stopped_by_exhaustion"
        );
    }
}
