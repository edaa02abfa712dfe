//! Deterministic keyword extraction
//!
//! Used whenever no language model is configured or the model fails. The
//! extractor drops stopwords and instruction filler, keeps multi-word phrases
//! of content words, and weights individual words by how often the
//! instructions mention them.

use crate::keywords::types::KeywordSet;
use crate::keywords::KeywordSource;
use async_trait::async_trait;
use std::collections::HashMap;

/// Weight given to the topic of "details/information about X" requests
const TOPIC_WEIGHT: f64 = 2.0;

const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Words that describe the request rather than its subject
const FILLER: &[&str] = &[
    "get", "find", "show", "give", "tell", "list", "look", "fetch", "collect", "gather", "search",
    "want", "need", "please", "detail", "details", "information", "info", "page", "pages",
    "website", "site", "related", "regarding", "everything", "anything",
];

const TOPIC_MARKERS: &[&str] = &["details", "detail", "information", "info"];
const TOPIC_LINKS: &[&str] = &["of", "about", "on", "regarding"];

/// Stopword and frequency based keyword extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyExtractor;

impl FrequencyExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts keywords from instructions without any I/O
    pub fn extract_keywords(&self, instructions: &str) -> KeywordSet {
        let words: Vec<String> = instructions
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();

        let is_content =
            |w: &str| w.chars().all(char::is_alphabetic) && !is_stopword(w) && !is_filler(w);

        let mut keywords = KeywordSet::new();

        // Phrases: maximal runs of two or more content words
        let mut run: Vec<&str> = Vec::new();
        for word in words.iter().map(String::as_str).chain(std::iter::once("")) {
            if !word.is_empty() && is_content(word) {
                run.push(word);
                continue;
            }
            if run.len() > 1 {
                keywords.insert(&run.join(" "), 1.0);
            }
            run.clear();
        }

        // Individual words, weighted by frequency
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for word in words.iter().map(String::as_str).filter(|w| is_content(w)) {
            let count = counts.entry(word).or_insert(0);
            if *count == 0 {
                order.push(word);
            }
            *count += 1;
        }
        for word in order {
            keywords.insert(word, counts[word] as f64);
        }

        // "details of X" style requests emphasise X
        for window in words.windows(3) {
            if TOPIC_MARKERS.contains(&window[0].as_str())
                && TOPIC_LINKS.contains(&window[1].as_str())
                && window[2].chars().all(char::is_alphabetic)
                && !is_stopword(&window[2])
            {
                keywords.insert(&window[2], TOPIC_WEIGHT);
            }
        }

        tracing::info!(
            "Fallback extracted keywords: {:?}",
            keywords.terms()
        );
        keywords
    }
}

#[async_trait]
impl KeywordSource for FrequencyExtractor {
    async fn extract(&self, instructions: &str) -> KeywordSet {
        self.extract_keywords(instructions)
    }

    fn name(&self) -> &'static str {
        "frequency"
    }
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

fn is_filler(word: &str) -> bool {
    FILLER.contains(&word)
}
