//! Content processing
//!
//! Turns collected page text into a [`Digest`]: a summary plus key points.
//! Runs only after a crawl has finished, over the collected pages.

mod chunk;
mod extractive;
mod llm;

pub use chunk::{chunk_content, DEFAULT_CHUNK_CHARS};
pub use extractive::{extract_key_points, split_sentences, ExtractiveProcessor};
pub use llm::LlmProcessor;

use crate::config::LlmConfig;
use crate::llm::LlmClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Summary text used when there is nothing to summarize
pub const NO_CONTENT: &str = "No content found";

/// Summary and key points derived from some content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Digest {
    pub summary: String,
    pub key_points: Vec<String>,
}

impl Digest {
    pub fn empty() -> Self {
        Self {
            summary: NO_CONTENT.to_string(),
            key_points: Vec::new(),
        }
    }
}

/// Capability for summarizing text with respect to a request
#[async_trait]
pub trait ContentProcessor: Send + Sync {
    /// Summarizes `content` following `instructions`
    async fn summarize(&self, content: &str, instructions: &str) -> Digest;

    fn name(&self) -> &'static str;
}

/// Builds the content processor for a configuration
///
/// Mirrors [`keyword_source`](crate::keywords::keyword_source): the language
/// model variant when configured and keyed, the extractive one otherwise.
pub fn content_processor(llm: Option<&LlmConfig>) -> Box<dyn ContentProcessor> {
    let client = llm.and_then(|config| match LlmClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Failed to build LLM client, using extractive summaries: {}", e);
            None
        }
    });

    match client {
        Some(client) => Box::new(LlmProcessor::new(client)),
        None => Box::new(ExtractiveProcessor::new()),
    }
}
