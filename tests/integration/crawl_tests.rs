//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, parse, score and collect cycle end-to-end.

use sift_crawl::config::{BonusPolicy, CrawlerConfig, FetcherConfig, ScoringConfig};
use sift_crawl::crawler::VisitStatus;
use sift_crawl::{Crawler, HttpFetcher, KeywordScorer, KeywordSet, TerminationReason};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FILLER: &str = "This paragraph is padding so the page carries enough visible text.";

/// Builds an HTML page whose score is the number of times `housing` appears
fn html_page(title: &str, housing_mentions: usize, links: &[&str]) -> String {
    let mut body = format!("<p>{}</p>", FILLER);
    if housing_mentions > 0 {
        body.push_str(&format!(
            "<p>Notes on campus life: {}</p>",
            "housing ".repeat(housing_mentions).trim()
        ));
    }
    for link in links {
        body.push_str(&format!("<a href=\"{}\">link</a>", link));
    }
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, body
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Scores by raw keyword count: no bonuses, no length damping
fn counting_scorer() -> KeywordScorer {
    KeywordScorer::new(ScoringConfig {
        title_bonus_factor: 0.0,
        intro_bonus_factor: 0.0,
        intro_window: 0,
        target_length: 1,
        bonus_policy: BonusPolicy::Additive,
    })
}

fn crawler(min_score: f64, threshold: f64) -> Crawler<HttpFetcher, KeywordScorer> {
    let fetcher = HttpFetcher::new(&FetcherConfig::default()).unwrap();
    let config = CrawlerConfig {
        max_depth: 2,
        min_score,
        cumulative_score_threshold: threshold,
        workers: 1,
    };
    Crawler::new(fetcher, counting_scorer(), config).unwrap()
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_collects_relevant_pages() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(html_page(
            "Home",
            3,
            &["/dorms", "/sports", "https://elsewhere.test/housing"],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dorms"))
        .respond_with(html(html_page("Dorms", 5, &["/"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sports"))
        .respond_with(html(html_page("Sports", 0, &[])))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let keywords = KeywordSet::from_terms(["housing"]);
    let outcome = crawler(1.0, 1000.0).run(&seed, &keywords).await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::StoppedByExhaustion);
    assert_eq!(outcome.fetched(), 3);

    let collected: Vec<&str> = outcome.collected.iter().map(|p| p.url.path()).collect();
    assert_eq!(collected, vec!["/", "/dorms"]);
    assert_eq!(outcome.cumulative_score, 8.0);
    assert_eq!(outcome.collected[1].title, "Dorms");
    assert_eq!(outcome.collected[1].depth, 1);

    // Below the minimum but still fetched
    assert_eq!(outcome.discarded(), 1);
}

#[tokio::test]
async fn test_budget_stops_before_children() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(html_page("Home", 4, &["/next"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html(html_page("Next", 4, &[])))
        .expect(0)
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let keywords = KeywordSet::from_terms(["housing"]);
    let outcome = crawler(1.0, 4.0).run(&seed, &keywords).await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::StoppedByBudget);
    assert_eq!(outcome.collected.len(), 1);
    assert_eq!(outcome.cumulative_score, 4.0);
}

#[tokio::test]
async fn test_failed_pages_do_not_abort() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(html_page(
            "Home",
            2,
            &["/missing", "/brochure.pdf", "/ok"],
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html(html_page("Ok", 1, &[])))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let keywords = KeywordSet::from_terms(["housing"]);
    let outcome = crawler(1.0, 1000.0).run(&seed, &keywords).await.unwrap();

    assert_eq!(outcome.reason, TerminationReason::StoppedByExhaustion);
    assert_eq!(outcome.collected.len(), 2);

    let mut kinds: Vec<&str> = outcome.failures().map(|(_, e)| e.kind()).collect();
    kinds.sort();
    assert_eq!(kinds, vec!["http", "unsupported"]);
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(html_page("Home", 1, &["/private/rooms", "/public"])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/rooms"))
        .respond_with(html(html_page("Private", 9, &[])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(html(html_page("Public", 1, &[])))
        .mount(&server)
        .await;

    let seed = format!("{}/", server.uri());
    let keywords = KeywordSet::from_terms(["housing"]);
    let outcome = crawler(1.0, 1000.0).run(&seed, &keywords).await.unwrap();

    let blocked: Vec<_> = outcome
        .visits
        .iter()
        .filter(|v| matches!(&v.status, VisitStatus::Failed(e) if e.kind() == "blocked"))
        .map(|v| v.url.path().to_string())
        .collect();
    assert_eq!(blocked, vec!["/private/rooms"]);
    assert_eq!(outcome.collected.len(), 2);
}

#[tokio::test]
async fn test_off_domain_redirect_not_collected() {
    let site = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    mount_robots(&site, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(html_page("Home", 2, &["/away"])))
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/away"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/page", elsewhere.uri()).as_str()),
        )
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(html_page("Other", 9, &["/more"])))
        .mount(&elsewhere)
        .await;

    // Both servers listen on 127.0.0.1; reach the site by another host name
    let port = url::Url::parse(&site.uri()).unwrap().port().unwrap();
    let seed = format!("http://localhost:{}/", port);
    let keywords = KeywordSet::from_terms(["housing"]);
    let outcome = crawler(1.0, 1000.0).run(&seed, &keywords).await.unwrap();

    let collected: Vec<&str> = outcome.collected.iter().map(|p| p.url.path()).collect();
    assert_eq!(collected, vec!["/"]);
    assert_eq!(outcome.cumulative_score, 2.0);

    let failures: Vec<_> = outcome
        .failures()
        .map(|(visit, error)| (visit.url.path().to_string(), error.kind()))
        .collect();
    assert_eq!(failures, vec![("/away".to_string(), "blocked")]);
}
