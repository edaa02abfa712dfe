//! Stopping and traversal properties of the crawl loop
//!
//! These tests drive the crawler with an in-memory site so every score and
//! link is known up front, for one worker and for several.

use async_trait::async_trait;
use sift_crawl::config::CrawlerConfig;
use sift_crawl::crawler::VisitStatus;
use sift_crawl::{
    CrawlOutcome, Crawler, FetchError, FetchedPage, KeywordScorer, KeywordSet, PageFetcher,
    Scorer, TerminationReason,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

const HOST: &str = "https://example.com";

struct Page {
    score: f64,
    links: Vec<String>,
    delay_ms: u64,
}

/// In-memory site; every request is appended to a fetch log
struct Site {
    pages: HashMap<String, Page>,
    log: Arc<Mutex<Vec<String>>>,
}

impl Site {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn page(self, path: &str, score: f64, links: &[&str]) -> Self {
        self.slow_page(path, score, links, 0)
    }

    /// Serves a page at an absolute URL, on any host
    fn page_at(mut self, url: &str, score: f64, links: &[&str]) -> Self {
        self.pages.insert(
            url.to_string(),
            Page {
                score,
                links: links.iter().map(|l| l.to_string()).collect(),
                delay_ms: 0,
            },
        );
        self
    }

    fn slow_page(mut self, path: &str, score: f64, links: &[&str], delay_ms: u64) -> Self {
        self.pages.insert(
            format!("{}{}", HOST, path),
            Page {
                score,
                links: links.iter().map(|l| l.to_string()).collect(),
                delay_ms,
            },
        );
        self
    }

    fn fetch_log(&self) -> FetchLog {
        FetchLog(self.log.clone())
    }
}

#[async_trait]
impl PageFetcher for Site {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.log.lock().unwrap().push(url.to_string());

        let page = self
            .pages
            .get(url.as_str())
            .ok_or(FetchError::Http { status: 404 })?;
        if page.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(page.delay_ms)).await;
        }

        let base = Url::parse(HOST).unwrap();
        Ok(FetchedPage {
            final_url: url.clone(),
            title: page.score.to_string(),
            text: "Residence halls and dining options for students.".to_string(),
            links: page.links.iter().map(|l| base.join(l).unwrap()).collect(),
        })
    }
}

/// Shared view of a site's fetch log, usable after the site moves into a crawler
struct FetchLog(Arc<Mutex<Vec<String>>>);

impl FetchLog {
    fn urls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Reads the score back out of the title
struct TitleScore;

impl Scorer for TitleScore {
    fn score(&self, title: &str, _raw_text: &str, _keywords: &KeywordSet) -> f64 {
        title.parse().unwrap_or(0.0)
    }
}

fn config(max_depth: u32, min_score: f64, threshold: f64, workers: u32) -> CrawlerConfig {
    CrawlerConfig {
        max_depth,
        min_score,
        cumulative_score_threshold: threshold,
        workers,
    }
}

async fn crawl(site: Site, config: CrawlerConfig) -> (CrawlOutcome, FetchLog) {
    let log = site.fetch_log();
    let crawler = Crawler::new(site, TitleScore, config).unwrap();
    let outcome = crawler
        .run(&format!("{}/", HOST), &KeywordSet::from_terms(["housing"]))
        .await
        .unwrap();
    (outcome, log)
}

/// A site with hubs, cycles, duplicate and off-site links
fn tangled_site() -> Site {
    let mut site = Site::new().page(
        "/",
        0.0,
        &["/a", "/b", "/c", "/a#top", "https://other.org/a", "/d?utm_source=x"],
    );
    let scores = [15.0, 0.0, 30.0, 5.0, 25.0, 40.0, 10.0, 20.0];
    let names = ["a", "b", "c", "d", "e", "f", "g", "h"];
    for (i, name) in names.iter().enumerate() {
        let next = names[(i + 1) % names.len()];
        let skip = names[(i + 3) % names.len()];
        let links = [
            format!("/{}", next),
            format!("/{}/", skip),
            "/".to_string(),
            "/missing".to_string(),
        ];
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        site = site.slow_page(
            &format!("/{}", name),
            scores[i],
            &links,
            (i as u64 * 3) % 7,
        );
    }
    site
}

fn assert_invariants(log: &FetchLog, outcome: &CrawlOutcome, config: &CrawlerConfig) {
    // No duplicate fetch
    let log = log.urls();
    let unique: HashSet<&String> = log.iter().collect();
    assert_eq!(unique.len(), log.len(), "duplicate fetch in {:?}", log);

    // Same host, depth bound
    for visit in &outcome.visits {
        assert_eq!(visit.url.host_str(), Some("example.com"));
        assert!(visit.depth <= config.max_depth);
    }

    // Cumulative score is the sum over collected pages
    let sum: f64 = outcome.collected.iter().map(|p| p.relevance_score).sum();
    assert!((outcome.cumulative_score - sum).abs() < 1e-9);
    assert!(outcome
        .collected
        .iter()
        .all(|p| p.relevance_score >= config.min_score));

    match outcome.reason {
        TerminationReason::StoppedByBudget => {
            let last = outcome.collected.last().unwrap();
            assert!(outcome.cumulative_score >= config.cumulative_score_threshold);
            assert!(
                outcome.cumulative_score - last.relevance_score
                    < config.cumulative_score_threshold
            );
        }
        TerminationReason::StoppedByExhaustion => {
            assert!(outcome.cumulative_score < config.cumulative_score_threshold);
            assert_eq!(outcome.abandoned_in_flight, 0);
            assert_eq!(outcome.frontier_remaining, 0);
        }
    }
}

#[tokio::test]
async fn test_seed_collected_child_discarded() {
    let site = Site::new()
        .page("/", 80.0, &["/child"])
        .page("/child", 30.0, &[]);

    let (outcome, _) = crawl(site, config(2, 60.0, 100.0, 1)).await;

    assert_eq!(outcome.reason, TerminationReason::StoppedByExhaustion);
    assert_eq!(outcome.collected.len(), 1);
    assert_eq!(outcome.collected[0].url.as_str(), "https://example.com/");
    assert_eq!(outcome.cumulative_score, 80.0);
    assert_eq!(outcome.fetched(), 2);
    assert!(matches!(
        outcome.visits[1].status,
        VisitStatus::Discarded { score } if score == 30.0
    ));
}

#[tokio::test]
async fn test_empty_keywords_collect_nothing() {
    let site = Site::new()
        .page("/", 0.0, &["/a", "/b"])
        .page("/a", 0.0, &["/b"])
        .page("/b", 0.0, &[]);
    let crawler =
        Crawler::new(site, KeywordScorer::default(), config(3, 60.0, 1.0, 1)).unwrap();

    let outcome = crawler
        .run("https://example.com/", &KeywordSet::new())
        .await
        .unwrap();

    assert!(outcome.collected.is_empty());
    assert_eq!(outcome.reason, TerminationReason::StoppedByExhaustion);
    assert_eq!(outcome.fetched(), 3);
}

#[tokio::test]
async fn test_max_depth_zero_fetches_only_seed() {
    let site = Site::new()
        .page("/", 10.0, &["/a", "/b"])
        .page("/a", 10.0, &[])
        .page("/b", 10.0, &[]);

    let (outcome, log) = crawl(site, config(0, 0.0, 100.0, 1)).await;
    assert_eq!(outcome.reason, TerminationReason::StoppedByExhaustion);
    assert_eq!(log.urls(), vec!["https://example.com/"]);

    let site = Site::new().page("/", 150.0, &["/a"]);
    let (outcome, _) = crawl(site, config(0, 0.0, 100.0, 1)).await;
    assert_eq!(outcome.reason, TerminationReason::StoppedByBudget);
}

#[tokio::test]
async fn test_low_scoring_hub_is_followed() {
    let site = Site::new()
        .page("/", 1.0, &["/hub"])
        .page("/hub", 2.0, &["/leaf-a", "/leaf-b"])
        .page("/leaf-a", 70.0, &[])
        .page("/leaf-b", 65.0, &[]);

    let (outcome, _) = crawl(site, config(2, 60.0, 1000.0, 1)).await;

    let collected: Vec<&str> = outcome.collected.iter().map(|p| p.url.path()).collect();
    assert_eq!(collected, vec!["/leaf-a", "/leaf-b"]);
    assert_eq!(outcome.discarded(), 2);
}

#[tokio::test]
async fn test_budget_check_precedes_enqueue() {
    let site = Site::new()
        .page("/", 50.0, &["/a"])
        .page("/a", 60.0, &["/b"])
        .page("/b", 10.0, &[]);

    let (outcome, log) = crawl(site, config(5, 0.0, 110.0, 1)).await;

    assert_eq!(outcome.reason, TerminationReason::StoppedByBudget);
    assert_eq!(outcome.cumulative_score, 110.0);
    assert_eq!(log.urls().len(), 2);
    assert_eq!(outcome.frontier_remaining, 0);
}

#[tokio::test]
async fn test_invariants_single_worker() {
    for threshold in [10.0, 45.0, 90.0, 10_000.0] {
        let site = tangled_site();
        let config = config(3, 10.0, threshold, 1);
        let (outcome, log) = crawl(site, config.clone()).await;
        assert_invariants(&log, &outcome, &config);
    }
}

#[tokio::test]
async fn test_invariants_concurrent_workers() {
    for workers in [2, 4, 8] {
        for threshold in [10.0, 45.0, 90.0, 10_000.0] {
            let site = tangled_site();
            let config = config(3, 10.0, threshold, workers);
            let (outcome, log) = crawl(site, config.clone()).await;
            assert_invariants(&log, &outcome, &config);
        }
    }
}

#[tokio::test]
async fn test_concurrent_exhaustion_visits_everything() {
    let site = tangled_site();
    let (outcome, _) = crawl(site, config(3, 10.0, 10_000.0, 4)).await;

    assert_eq!(outcome.reason, TerminationReason::StoppedByExhaustion);
    // Seed, eight pages and the shared missing page
    assert_eq!(outcome.fetched(), 10);
    assert_eq!(outcome.failures().count(), 1);
}

#[tokio::test]
async fn test_www_seed_fetched_as_given() {
    let site = Site::new()
        .page_at("https://www.example.com/", 80.0, &["https://www.example.com/about", "/contact"])
        .page_at("https://www.example.com/about", 70.0, &[])
        .page("/contact", 65.0, &[]);
    let log = site.fetch_log();
    let crawler = Crawler::new(site, TitleScore, config(1, 60.0, 1000.0, 1)).unwrap();

    let outcome = crawler
        .run("https://www.example.com/", &KeywordSet::new())
        .await
        .unwrap();

    assert_eq!(
        log.urls(),
        vec![
            "https://www.example.com/",
            "https://www.example.com/about",
            "https://example.com/contact"
        ]
    );
    assert_eq!(outcome.collected.len(), 3);
    assert_eq!(outcome.cumulative_score, 215.0);
}
