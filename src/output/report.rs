use crate::crawler::{CrawlOutcome, TerminationReason};
use crate::keywords::KeywordSet;
use crate::output::CrawlStatistics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary used when a crawl collects nothing
pub const NO_RESULTS_SUMMARY: &str =
    "No relevant content found. Try different keywords or a different starting URL.";

/// A keyword as recorded in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportKeyword {
    pub term: String,
    pub weight: f64,
}

/// Digest of one collected page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageDetail {
    pub title: String,
    pub url: String,
    pub depth: u32,
    pub score: f64,
    pub content_summary: String,
    pub key_points: Vec<String>,
}

/// A page that could not be fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub url: String,
    pub depth: u32,
    pub kind: String,
    pub error: String,
}

/// Final result of an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// The instructions the run was asked to satisfy
    pub query: String,
    pub source_url: String,
    pub keywords: Vec<ReportKeyword>,
    pub keyword_source: String,
    pub termination: TerminationReason,
    pub cumulative_score: f64,
    pub collected_pages: usize,
    pub summary: String,
    pub key_points: Vec<String>,
    /// Collected pages, highest score first
    pub details: Vec<PageDetail>,
    pub failures: Vec<FailureRecord>,
    pub statistics: CrawlStatistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Starts a report from a finished crawl
    ///
    /// Summary, key points and details are left empty for the caller to fill.
    pub fn from_outcome(
        query: &str,
        source_url: &str,
        keywords: &KeywordSet,
        keyword_source: &str,
        outcome: &CrawlOutcome,
    ) -> Self {
        Self {
            query: query.to_string(),
            source_url: source_url.to_string(),
            keywords: keywords
                .iter()
                .map(|k| ReportKeyword {
                    term: k.term.clone(),
                    weight: k.weight,
                })
                .collect(),
            keyword_source: keyword_source.to_string(),
            termination: outcome.reason,
            cumulative_score: outcome.cumulative_score,
            collected_pages: outcome.collected.len(),
            summary: String::new(),
            key_points: Vec::new(),
            details: Vec::new(),
            failures: outcome
                .failures()
                .map(|(visit, error)| FailureRecord {
                    url: visit.url.to_string(),
                    depth: visit.depth,
                    kind: error.kind().to_string(),
                    error: error.to_string(),
                })
                .collect(),
            statistics: CrawlStatistics::from_outcome(outcome),
            config_hash: None,
            generated_at: Utc::now(),
        }
    }
}
