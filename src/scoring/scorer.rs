use crate::config::{BonusPolicy, ScoringConfig};
use crate::keywords::KeywordSet;
use crate::scoring::Scorer;
use crate::text::{contains_sequence, sequence_starts, tokenize};

/// Weighted keyword-count scorer with positional bonuses
///
/// For each keyword the score accumulates:
///
/// - `count * weight` for occurrences in the body text
/// - `title_bonus_factor * weight` if the keyword appears in the title, or
///   else `intro_bonus_factor * weight` if it appears within the first
///   `intro_window` body tokens (the two bonuses never stack)
///
/// The total is multiplied by `min(1, tokens / target_length)` and returned
/// unrounded. Under [`BonusPolicy::Replace`] occurrences starting inside the
/// intro window are left out of the count.
#[derive(Debug, Clone, Default)]
pub struct KeywordScorer {
    config: ScoringConfig,
}

impl KeywordScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    fn length_factor(&self, token_count: usize) -> f64 {
        let target = self.config.target_length.max(1);
        (token_count as f64 / target as f64).min(1.0)
    }
}

impl Scorer for KeywordScorer {
    fn score(&self, title: &str, raw_text: &str, keywords: &KeywordSet) -> f64 {
        let text = tokenize(raw_text);
        if text.is_empty() || keywords.is_empty() {
            return 0.0;
        }
        let title = tokenize(title);
        let intro = &text[..self.config.intro_window.min(text.len())];

        let mut total = 0.0;
        for keyword in keywords {
            let needle = keyword.tokens();
            let starts = sequence_starts(&text, needle);
            let counted = match self.config.bonus_policy {
                BonusPolicy::Additive => starts.len(),
                BonusPolicy::Replace => starts
                    .iter()
                    .filter(|&&start| start >= self.config.intro_window)
                    .count(),
            };
            total += counted as f64 * keyword.weight;

            if contains_sequence(&title, needle) {
                total += self.config.title_bonus_factor * keyword.weight;
            } else if contains_sequence(intro, needle) {
                total += self.config.intro_bonus_factor * keyword.weight;
            }
        }

        let score = total * self.length_factor(text.len());
        if score.is_finite() {
            score.max(0.0)
        } else {
            0.0
        }
    }
}
