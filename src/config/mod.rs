//! Configuration module for Sift-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sift_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sift.toml")).unwrap();
//! println!("Stopping at cumulative score {}", config.crawler.cumulative_score_threshold);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BonusPolicy, Config, CrawlerConfig, FetcherConfig, LlmConfig, OutputConfig, ScoringConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::{validate, validate_crawler_config, validate_scoring_config, MAX_WORKERS};
