use crate::llm::LlmClient;
use crate::processor::{chunk_content, extract_key_points, ContentProcessor, Digest, DEFAULT_CHUNK_CHARS};
use async_trait::async_trait;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You summarize web content accurately and concisely, \
keeping the information most relevant to the user's request.";

/// Summarizer backed by a chat model
///
/// Long content is split into chunks and each chunk is summarized on its
/// own; the chunk summaries are joined in order.
#[derive(Debug, Clone)]
pub struct LlmProcessor {
    client: LlmClient,
    chunk_chars: usize,
}

impl LlmProcessor {
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            chunk_chars: DEFAULT_CHUNK_CHARS,
        }
    }

    pub fn with_chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars;
        self
    }
}

#[async_trait]
impl ContentProcessor for LlmProcessor {
    async fn summarize(&self, content: &str, instructions: &str) -> Digest {
        if content.trim().is_empty() {
            return Digest::empty();
        }

        let chunks = chunk_content(content, self.chunk_chars);
        let total = chunks.len();
        let mut parts = Vec::with_capacity(total);

        for (i, chunk) in chunks.iter().enumerate() {
            let prompt = if total > 1 {
                format!("{} (Content part {}/{})", instructions, i + 1, total)
            } else {
                instructions.to_string()
            };
            let user = format!("{}\n\n{}", prompt, chunk);

            match self
                .client
                .complete(SYSTEM_PROMPT, &user, self.client.defaults())
                .await
            {
                Ok(text) => {
                    debug!("Summarized chunk {}/{}", i + 1, total);
                    parts.push(text);
                }
                Err(e) => {
                    warn!("Error processing content chunk {}/{}: {}", i + 1, total, e);
                    parts.push(format!("Error processing content: {}", e));
                }
            }
        }

        let summary = parts.join("\n\n");
        let key_points = extract_key_points(&summary);
        Digest {
            summary,
            key_points,
        }
    }

    fn name(&self) -> &'static str {
        "llm"
    }
}
