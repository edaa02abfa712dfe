use crate::text::tokenize;
use serde::{Deserialize, Serialize};

/// Default weight of a keyword that carries no emphasis
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A weighted search term
///
/// `term` is the normalized spelling (space-joined normalized tokens), so two
/// keywords with the same `term` always match the same text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub weight: f64,
    #[serde(skip)]
    tokens: Vec<String>,
}

impl Keyword {
    /// Builds a keyword from raw text
    ///
    /// Returns `None` when the text contains no alphanumeric content. Negative
    /// or non-finite weights are clamped to zero.
    pub fn new(raw: &str, weight: f64) -> Option<Self> {
        let tokens = tokenize(raw);
        if tokens.is_empty() {
            return None;
        }

        let weight = if weight.is_finite() && weight > 0.0 {
            weight
        } else {
            0.0
        };

        Some(Self {
            term: tokens.join(" "),
            weight,
            tokens,
        })
    }

    /// Normalized tokens of the term, matched as a contiguous run
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// An ordered, de-duplicated collection of keywords
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from plain terms, each with the default weight
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for term in terms {
            set.insert(term.as_ref(), DEFAULT_WEIGHT);
        }
        set
    }

    /// Adds a term, merging with an existing keyword of the same normalized form
    ///
    /// The first-seen position is kept and the larger weight wins. Returns
    /// false if the term normalized to nothing.
    pub fn insert(&mut self, raw: &str, weight: f64) -> bool {
        let Some(keyword) = Keyword::new(raw, weight) else {
            return false;
        };

        match self.keywords.iter_mut().find(|k| k.term == keyword.term) {
            Some(existing) => {
                if keyword.weight > existing.weight {
                    existing.weight = keyword.weight;
                }
            }
            None => self.keywords.push(keyword),
        }
        true
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Keyword> {
        self.keywords.iter()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn get(&self, term: &str) -> Option<&Keyword> {
        let normalized = tokenize(term).join(" ");
        self.keywords.iter().find(|k| k.term == normalized)
    }

    /// Normalized terms in order
    pub fn terms(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.term.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a KeywordSet {
    type Item = &'a Keyword;
    type IntoIter = std::slice::Iter<'a, Keyword>;

    fn into_iter(self) -> Self::IntoIter {
        self.keywords.iter()
    }
}
