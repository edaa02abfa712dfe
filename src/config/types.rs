use serde::{Deserialize, Serialize};

/// Main configuration structure for Sift-Crawl
///
/// Every section is optional in the TOML file; missing sections fall back to
/// their defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub llm: Option<LlmConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Traversal and stopping configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Maximum link depth from the seed page (seed is depth 0)
    pub max_depth: u32,

    /// Minimum relevance score for a page to be collected
    pub min_score: f64,

    /// Cumulative relevance of collected pages at which the crawl stops
    pub cumulative_score_threshold: f64,

    /// Maximum number of fetches in flight
    pub workers: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            min_score: 60.0,
            cumulative_score_threshold: 600.0,
            workers: 1,
        }
    }
}

/// How positional bonuses interact with the base keyword count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BonusPolicy {
    /// Bonuses are added on top of a base count that includes every occurrence
    #[default]
    Additive,

    /// Occurrences inside the intro window are left out of the base count;
    /// the positional bonus stands in for them
    Replace,
}

/// Relevance scoring configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScoringConfig {
    /// Multiplier on a keyword's weight when it appears in the page title
    pub title_bonus_factor: f64,

    /// Multiplier on a keyword's weight when it appears in the intro window
    pub intro_bonus_factor: f64,

    /// Number of leading body tokens treated as the introduction
    pub intro_window: usize,

    /// Token count at and above which no length penalty applies
    pub target_length: usize,

    /// Interaction between positional bonuses and base counts
    pub bonus_policy: BonusPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            title_bonus_factor: 5.0,
            intro_bonus_factor: 2.0,
            intro_window: 100,
            target_length: 200,
            bonus_policy: BonusPolicy::Additive,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FetcherConfig {
    /// User agent sent with every request
    pub user_agent: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Whether to consult robots.txt before fetching
    pub respect_robots: bool,

    /// Minimum time between two requests to the same host (milliseconds)
    pub minimum_delay_ms: u64,

    /// CSS selectors tried in order to locate the main content of a page
    pub content_selectors: Vec<String>,

    /// CSS selectors whose subtrees never contribute page text
    pub exclude_selectors: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("sift-crawl/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 45,
            connect_timeout_secs: 10,
            respect_robots: true,
            minimum_delay_ms: 0,
            content_selectors: [
                "main",
                "article",
                "#content",
                ".content",
                "#main-content",
                ".main-content",
                ".post",
                ".entry",
                ".article",
                ".page-content",
                ".entry-content",
                "[role='main']",
                ".main",
                "#main",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            exclude_selectors: [
                "nav",
                "footer",
                "header",
                "script",
                "style",
                "noscript",
                ".menu",
                "#menu",
                ".navigation",
                ".sidebar",
                "#sidebar",
                ".ads",
                ".advertisement",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Chat-completions endpoint used for keyword extraction and summarization
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (without the trailing path)
    pub api_base: String,

    /// Model name
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Token cap for summarization responses
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            max_tokens: 800,
            temperature: 0.3,
        }
    }
}

impl LlmConfig {
    /// Reads the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path of the JSON report
    pub report_path: Option<String>,

    /// Path of the markdown summary
    pub summary_path: Option<String>,

    /// Path of the SQLite report database
    pub database_path: Option<String>,
}
