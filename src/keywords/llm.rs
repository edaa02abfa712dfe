//! Language model keyword extraction

use crate::keywords::fallback::FrequencyExtractor;
use crate::keywords::types::{KeywordSet, DEFAULT_WEIGHT};
use crate::keywords::KeywordSource;
use crate::llm::{CompletionOptions, LlmClient};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You are a precise keyword extraction assistant. \
Extract the most relevant search terms from the user's instructions. \
Return a JSON object of the form {\"keywords\": [\"term\", ...]}. \
Use short noun phrases, most important first. \
A keyword may instead be an object {\"term\": \"...\", \"weight\": 2.0} to mark emphasis.";

/// Keyword source backed by a chat model, with a deterministic fallback
#[derive(Debug, Clone)]
pub struct LlmExtractor {
    client: LlmClient,
    fallback: FrequencyExtractor,
}

impl LlmExtractor {
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            fallback: FrequencyExtractor::new(),
        }
    }
}

#[async_trait]
impl KeywordSource for LlmExtractor {
    async fn extract(&self, instructions: &str) -> KeywordSet {
        let options = CompletionOptions {
            max_tokens: 150,
            temperature: 0.0,
            json: true,
        };
        let user = format!("Extract keywords from: {}", instructions);

        match self.client.complete(SYSTEM_PROMPT, &user, options).await {
            Ok(reply) => match parse_keyword_response(&reply) {
                Some(keywords) if !keywords.is_empty() => {
                    info!("Extracted keywords: {:?}", keywords.terms());
                    keywords
                }
                _ => {
                    warn!("Model returned no usable keywords, using frequency extractor");
                    self.fallback.extract_keywords(instructions)
                }
            },
            Err(e) => {
                warn!("Keyword extraction failed, using frequency extractor: {}", e);
                self.fallback.extract_keywords(instructions)
            }
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}

/// Parses a model reply into keywords
///
/// Accepts `{"keywords": [...]}`, a bare JSON array, and markdown-fenced
/// variants of either. Array items may be strings or `{term, weight}`
/// objects. Returns `None` if the reply is not one of these shapes.
pub fn parse_keyword_response(reply: &str) -> Option<KeywordSet> {
    let body = strip_code_fence(reply.trim());
    let value: Value = serde_json::from_str(body).ok()?;

    let items = match &value {
        Value::Array(items) => items,
        Value::Object(map) => map.get("keywords")?.as_array()?,
        _ => return None,
    };

    let mut keywords = KeywordSet::new();
    for item in items {
        match item {
            Value::String(term) => {
                keywords.insert(term, DEFAULT_WEIGHT);
            }
            Value::Object(map) => {
                let Some(term) = map.get("term").and_then(Value::as_str) else {
                    continue;
                };
                let weight = map
                    .get("weight")
                    .and_then(Value::as_f64)
                    .unwrap_or(DEFAULT_WEIGHT);
                keywords.insert(term, weight);
            }
            _ => {}
        }
    }
    Some(keywords)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
