//! End-to-end analysis: keywords, crawl, summaries
//!
//! The [`Analyzer`] extracts keywords from the user's instructions once, runs
//! a budgeted crawl, then digests every collected page and folds the page
//! digests into one combined summary.

use crate::config::Config;
use crate::crawler::{CrawlOutcome, Crawler, ScoredPage};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::keywords::{keyword_source, KeywordSet, KeywordSource};
use crate::output::{AnalysisReport, PageDetail, NO_RESULTS_SUMMARY};
use crate::processor::{content_processor, ContentProcessor};
use crate::scoring::{KeywordScorer, Scorer};
use crate::SiftError;
use tracing::{debug, info};

/// Runs the whole pipeline for one seed URL and one set of instructions
pub struct Analyzer<F, S> {
    keywords: Box<dyn KeywordSource>,
    crawler: Crawler<F, S>,
    processor: Box<dyn ContentProcessor>,
    config_hash: Option<String>,
}

impl Analyzer<HttpFetcher, KeywordScorer> {
    /// Builds the production pipeline from a validated configuration
    ///
    /// The keyword source and content processor use the language model when
    /// `[llm]` is configured and its key is set, and the deterministic
    /// variants otherwise.
    pub fn from_config(config: &Config) -> Result<Self, SiftError> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        let scorer = KeywordScorer::new(config.scoring.clone());
        let crawler = Crawler::new(fetcher, scorer, config.crawler.clone())?;

        Ok(Self::new(
            keyword_source(config.llm.as_ref()),
            crawler,
            content_processor(config.llm.as_ref()),
        ))
    }
}

impl<F: PageFetcher, S: Scorer> Analyzer<F, S> {
    pub fn new(
        keywords: Box<dyn KeywordSource>,
        crawler: Crawler<F, S>,
        processor: Box<dyn ContentProcessor>,
    ) -> Self {
        Self {
            keywords,
            crawler,
            processor,
            config_hash: None,
        }
    }

    /// Records the hash of the config file the run was started with
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    pub fn crawler(&self) -> &Crawler<F, S> {
        &self.crawler
    }

    /// Extracts the keywords a run would use, without crawling
    pub async fn extract_keywords(&self, instructions: &str) -> KeywordSet {
        let keywords = self.keywords.extract(instructions).await;
        info!(
            "Extracted {} keywords via {}: {:?}",
            keywords.len(),
            self.keywords.name(),
            keywords.terms()
        );
        keywords
    }

    /// Crawls from `seed` and summarizes what was collected
    ///
    /// # Arguments
    ///
    /// * `seed` - Starting URL
    /// * `instructions` - What the user wants to learn
    ///
    /// # Returns
    ///
    /// * `Ok(AnalysisReport)` - The run finished, possibly with nothing collected
    /// * `Err(SiftError)` - The seed URL was rejected before any fetch
    pub async fn analyze(&self, seed: &str, instructions: &str) -> Result<AnalysisReport, SiftError> {
        let keywords = self.extract_keywords(instructions).await;
        self.analyze_with_keywords(seed, instructions, &keywords)
            .await
    }

    /// Same as [`analyze`](Self::analyze) with keywords supplied by the caller
    pub async fn analyze_with_keywords(
        &self,
        seed: &str,
        instructions: &str,
        keywords: &KeywordSet,
    ) -> Result<AnalysisReport, SiftError> {
        let outcome = self.crawler.run(seed, keywords).await?;
        info!(
            "Crawl finished ({}): {} pages collected, cumulative score {:.2}",
            outcome.reason,
            outcome.collected.len(),
            outcome.cumulative_score
        );

        let mut report = AnalysisReport::from_outcome(
            instructions,
            seed,
            keywords,
            self.keywords.name(),
            &outcome,
        );
        report.config_hash = self.config_hash.clone();

        if outcome.collected.is_empty() {
            report.summary = NO_RESULTS_SUMMARY.to_string();
            return Ok(report);
        }

        self.summarize(&outcome, instructions, &mut report).await;
        Ok(report)
    }

    async fn summarize(&self, outcome: &CrawlOutcome, instructions: &str, report: &mut AnalysisReport) {
        let mut pages: Vec<&ScoredPage> = outcome.collected.iter().collect();
        pages.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));

        let mut blocks = Vec::with_capacity(pages.len());
        for page in pages {
            let prompt = format!(
                "Based on the following content from {}, provide a detailed summary about {}",
                page.url, instructions
            );
            let digest = self.processor.summarize(&page.raw_text, &prompt).await;
            debug!("Summarized {} via {}", page.url, self.processor.name());

            blocks.push(format!(
                "--- From {} ({}) (Score: {:.2}) ---\n{}",
                page.title, page.url, page.relevance_score, digest.summary
            ));
            report.details.push(PageDetail {
                title: page.title.clone(),
                url: page.url.to_string(),
                depth: page.depth,
                score: page.relevance_score,
                content_summary: digest.summary,
                key_points: digest.key_points,
            });
        }

        let prompt = format!(
            "Based on the following information from multiple pages about {}, \
             provide a comprehensive analysis and summary:",
            instructions
        );
        let combined = self.processor.summarize(&blocks.join("\n\n"), &prompt).await;
        report.summary = combined.summary;
        report.key_points = combined.key_points;
    }
}
