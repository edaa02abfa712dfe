//! Sift-Crawl: a topic-driven, budgeted web crawler
//!
//! This crate crawls a site from a seed URL, scores every fetched page for
//! relevance to a natural-language topic, and stops as soon as the collected
//! pages carry enough cumulative relevance.

pub mod analysis;
pub mod config;
pub mod crawler;
pub mod fetcher;
pub mod frontier;
pub mod keywords;
pub mod llm;
pub mod output;
pub mod processor;
pub mod robots;
pub mod scoring;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Sift-Crawl operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are the only errors that abort a crawl, and they are always raised
/// before the first fetch.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Sift-Crawl operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::analysis::Analyzer;
pub use crate::config::Config;
pub use crate::crawler::{CrawlOutcome, Crawler, ScoredPage, TerminationReason};
pub use crate::fetcher::{FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use crate::frontier::{Frontier, FrontierEntry};
pub use crate::keywords::{Keyword, KeywordSet, KeywordSource};
pub use crate::scoring::{KeywordScorer, Scorer};
pub use crate::url::{extract_domain, normalize_url};
