use crate::config::types::{Config, CrawlerConfig, FetcherConfig, LlmConfig, ScoringConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Upper bound on concurrent fetches
pub const MAX_WORKERS: u32 = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_scoring_config(&config.scoring)?;
    validate_fetcher_config(&config.fetcher)?;
    if let Some(llm) = &config.llm {
        validate_llm_config(llm)?;
    }
    Ok(())
}

/// Validates traversal and stopping settings
pub fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if !config.min_score.is_finite() || config.min_score < 0.0 {
        return Err(ConfigError::Validation(format!(
            "min_score must be a finite number >= 0, got {}",
            config.min_score
        )));
    }

    if !config.cumulative_score_threshold.is_finite() || config.cumulative_score_threshold <= 0.0
    {
        return Err(ConfigError::Validation(format!(
            "cumulative_score_threshold must be a finite number > 0, got {}",
            config.cumulative_score_threshold
        )));
    }

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    Ok(())
}

/// Validates scoring settings
pub fn validate_scoring_config(config: &ScoringConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("title_bonus_factor", config.title_bonus_factor),
        ("intro_bonus_factor", config.intro_bonus_factor),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a finite number >= 0, got {}",
                name, value
            )));
        }
    }

    if config.target_length == 0 {
        return Err(ConfigError::Validation(
            "target_length must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetcher settings
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got timeout={}s connect={}s",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    for selector in config
        .content_selectors
        .iter()
        .chain(config.exclude_selectors.iter())
    {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::Validation(format!(
                "invalid CSS selector '{}'",
                selector
            )));
        }
    }

    Ok(())
}

/// Validates LLM endpoint settings
fn validate_llm_config(config: &LlmConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.api_base)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid api_base: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "api_base must use HTTP or HTTPS, got '{}'",
            config.api_base
        )));
    }

    if config.model.trim().is_empty() {
        return Err(ConfigError::Validation("model cannot be empty".to_string()));
    }

    if config.api_key_env.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api_key_env cannot be empty".to_string(),
        ));
    }

    Ok(())
}
