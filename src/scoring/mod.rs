//! Page relevance scoring
//!
//! A [`Scorer`] turns a page's title and text into a non-negative relevance
//! score for a keyword set. Scoring is pure: no I/O, no randomness, and the
//! same inputs always give the same score.

mod scorer;

pub use crate::config::BonusPolicy;
pub use scorer::KeywordScorer;

use crate::keywords::KeywordSet;

/// Computes the relevance of one page
pub trait Scorer: Send + Sync {
    /// Scores a page; the result is finite and `>= 0`
    fn score(&self, title: &str, raw_text: &str, keywords: &KeywordSet) -> f64;
}
