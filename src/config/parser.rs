use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sift_crawl::config::load_config;
///
/// let config = load_config(Path::new("sift.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is recorded in every report so results can be traced back to the
/// exact settings that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BonusPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-depth = 3
min-score = 40.0
cumulative-score-threshold = 250.0
workers = 4

[scoring]
title-bonus-factor = 6.0
intro-window = 50
bonus-policy = "replace"

[fetcher]
user-agent = "TestCrawler/1.0"
respect-robots = false

[llm]
model = "gpt-4o-mini"

[output]
report-path = "./report.json"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.min_score, 40.0);
        assert_eq!(config.crawler.cumulative_score_threshold, 250.0);
        assert_eq!(config.crawler.workers, 4);
        assert_eq!(config.scoring.title_bonus_factor, 6.0);
        assert_eq!(config.scoring.intro_bonus_factor, 2.0);
        assert_eq!(config.scoring.intro_window, 50);
        assert_eq!(config.scoring.bonus_policy, BonusPolicy::Replace);
        assert_eq!(config.fetcher.user_agent, "TestCrawler/1.0");
        assert!(!config.fetcher.respect_robots);
        let llm = config.llm.unwrap();
        assert_eq!(llm.model, "gpt-4o-mini");
        assert_eq!(llm.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.output.report_path.as_deref(), Some("./report.json"));
        assert!(config.output.summary_path.is_none());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.max_depth, 2);
        assert_eq!(config.crawler.min_score, 60.0);
        assert_eq!(config.crawler.cumulative_score_threshold, 600.0);
        assert_eq!(config.crawler.workers, 1);
        assert_eq!(config.scoring.title_bonus_factor, 5.0);
        assert!(config.llm.is_none());
    }

    #[test]
    fn test_negative_depth_is_parse_error() {
        let result = parse_config("[crawler]\nmax-depth = -1\n");
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/sift.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::Io(_)));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\ncumulative-score-threshold = 0.0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
