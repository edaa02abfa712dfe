//! Keyword extraction
//!
//! Turns free-text instructions into an ordered, weighted [`KeywordSet`].
//! Two sources exist: a language-model backed extractor and a deterministic
//! frequency extractor. The source is chosen once, when it is constructed.

pub mod fallback;
pub mod llm;
pub mod types;

pub use fallback::FrequencyExtractor;
pub use llm::{parse_keyword_response, LlmExtractor};
pub use types::{Keyword, KeywordSet, DEFAULT_WEIGHT};

use crate::config::LlmConfig;
use crate::llm::LlmClient;
use async_trait::async_trait;

/// Capability for turning instructions into keywords
///
/// Implementations never fail: when their backing service is unavailable they
/// degrade to a deterministic result, which may be empty.
#[async_trait]
pub trait KeywordSource: Send + Sync {
    async fn extract(&self, instructions: &str) -> KeywordSet;

    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;
}

/// Builds the keyword source for a configuration
///
/// The language model variant is used when an `[llm]` section is present and
/// its API key is available; otherwise the frequency extractor is returned.
pub fn keyword_source(llm: Option<&LlmConfig>) -> Box<dyn KeywordSource> {
    let client = llm.and_then(|config| match LlmClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build LLM client, using frequency extractor: {}", e);
            None
        }
    });

    match client {
        Some(client) => Box::new(LlmExtractor::new(client)),
        None => Box::new(FrequencyExtractor::new()),
    }
}
