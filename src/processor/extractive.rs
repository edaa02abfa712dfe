use crate::processor::{ContentProcessor, Digest};
use async_trait::async_trait;

/// Sentences taken for an extractive summary
const SUMMARY_SENTENCES: usize = 3;

/// Upper bound on an extractive summary, in characters
const SUMMARY_MAX_CHARS: usize = 600;

const MAX_KEY_POINTS: usize = 10;
const MAX_SENTENCE_POINTS: usize = 5;

/// Deterministic summarizer: leading sentences plus key points
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveProcessor;

impl ExtractiveProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn digest(&self, content: &str) -> Digest {
        // Source banners of combined digests are not content
        let body = content
            .lines()
            .filter(|line| !line.trim_start().starts_with("---"))
            .collect::<Vec<_>>()
            .join("\n");
        if body.trim().is_empty() {
            return Digest::empty();
        }

        let lead = split_sentences(&body)
            .into_iter()
            .take(SUMMARY_SENTENCES)
            .collect::<Vec<_>>()
            .join(" ");

        Digest {
            summary: truncate_at_word(&lead, SUMMARY_MAX_CHARS),
            key_points: extract_key_points(&body),
        }
    }
}

#[async_trait]
impl ContentProcessor for ExtractiveProcessor {
    async fn summarize(&self, content: &str, _instructions: &str) -> Digest {
        self.digest(content)
    }

    fn name(&self) -> &'static str {
        "extractive"
    }
}

/// Splits text into sentences ending in `.`, `!` or `?`
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let boundary = matches!(c, '.' | '!' | '?')
            && chars.peek().map_or(true, |next| next.is_whitespace());
        if boundary {
            let sentence = current.split_whitespace().collect::<Vec<_>>().join(" ");
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            current.clear();
        }
    }

    let rest = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !rest.is_empty() {
        sentences.push(rest);
    }
    sentences
}

/// Pulls key points out of text
///
/// Bulleted (`•`, `-`, `*`) or numbered (`1.`) lines longer than five
/// characters are taken first. Without any, sentences of 20 to 200
/// characters are used (at most five). Never more than ten points.
pub fn extract_key_points(text: &str) -> Vec<String> {
    let mut points: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > 5 && is_list_item(line))
        .map(|line| {
            line.trim_start_matches(|c: char| {
                matches!(c, '•' | '-' | '*' | '.' | ')') || c.is_ascii_digit() || c.is_whitespace()
            })
            .to_string()
        })
        .filter(|point| !point.is_empty())
        .collect();

    if points.is_empty() {
        points = split_sentences(text)
            .into_iter()
            .filter(|sentence| {
                let len = sentence.chars().count();
                len > 20 && len < 200
            })
            .take(MAX_SENTENCE_POINTS)
            .collect();
    }

    points.truncate(MAX_KEY_POINTS);
    points
}

fn is_list_item(line: &str) -> bool {
    if line.starts_with("---") {
        return false;
    }
    if line.starts_with(['•', '-', '*']) {
        return true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    digits > 0 && line[digits..].starts_with('.')
}

fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out = String::new();
    for word in text.split_whitespace() {
        let extra = if out.is_empty() { 0 } else { 1 };
        if out.chars().count() + extra + word.chars().count() > max_chars {
            break;
        }
        if extra == 1 {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
