//! Crawl statistics
//!
//! Derived from a finished [`CrawlOutcome`] and printed on request.

use crate::crawler::{CrawlOutcome, VisitStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlStatistics {
    /// Completed fetches, successful or not
    pub pages_fetched: usize,
    pub pages_collected: usize,
    /// Fetched pages scored below the minimum
    pub pages_discarded: usize,
    pub pages_failed: usize,

    /// Failure kind -> count
    pub failures_by_kind: BTreeMap<String, usize>,

    /// Depth -> completed fetches at that depth
    pub depth_breakdown: BTreeMap<u32, usize>,

    pub abandoned_in_flight: usize,
    pub frontier_remaining: usize,
    pub elapsed_ms: u64,
}

impl CrawlStatistics {
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let mut stats = Self {
            pages_fetched: outcome.visits.len(),
            pages_collected: outcome.collected.len(),
            abandoned_in_flight: outcome.abandoned_in_flight,
            frontier_remaining: outcome.frontier_remaining,
            elapsed_ms: u64::try_from(outcome.elapsed.as_millis()).unwrap_or(u64::MAX),
            ..Self::default()
        };

        for visit in &outcome.visits {
            *stats.depth_breakdown.entry(visit.depth).or_insert(0) += 1;
            match &visit.status {
                VisitStatus::Collected { .. } => {}
                VisitStatus::Discarded { .. } => stats.pages_discarded += 1,
                VisitStatus::Failed(error) => {
                    stats.pages_failed += 1;
                    *stats
                        .failures_by_kind
                        .entry(error.kind().to_string())
                        .or_insert(0) += 1;
                }
            }
        }

        stats
    }

    /// Share of fetches that ended in collection, as a percentage
    pub fn collection_rate(&self) -> f64 {
        if self.pages_fetched == 0 {
            return 0.0;
        }
        self.pages_collected as f64 / self.pages_fetched as f64 * 100.0
    }
}

/// Formats statistics as plain text
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::from("=== Crawl Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Pages fetched: {}\n", stats.pages_fetched));
    out.push_str(&format!(
        "  Pages collected: {} ({:.1}%)\n",
        stats.pages_collected,
        stats.collection_rate()
    ));
    out.push_str(&format!("  Pages discarded: {}\n", stats.pages_discarded));
    out.push_str(&format!("  Pages failed: {}\n", stats.pages_failed));
    out.push_str(&format!(
        "  Abandoned in flight: {}\n",
        stats.abandoned_in_flight
    ));
    out.push_str(&format!("  Frontier remaining: {}\n", stats.frontier_remaining));
    out.push_str(&format!("  Elapsed: {} ms\n", stats.elapsed_ms));

    if !stats.depth_breakdown.is_empty() {
        out.push_str("\nPages by Depth:\n");
        for (depth, count) in &stats.depth_breakdown {
            out.push_str(&format!("  {}: {}\n", depth, count));
        }
    }

    if !stats.failures_by_kind.is_empty() {
        out.push_str("\nFailures:\n");
        let mut kinds: Vec<_> = stats.failures_by_kind.iter().collect();
        kinds.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (kind, count) in kinds {
            out.push_str(&format!("  {}: {}\n", kind, count));
        }
    }

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", format_statistics(stats));
}
