//! Term normalization shared by keyword construction and scoring
//!
//! Keywords and page text must go through the same normalization, otherwise a
//! keyword could never match the page it was extracted for. A term is
//! lower-cased, stripped to alphanumeric characters, and reduced by a light
//! plural stemmer (`policies` → `policy`, `classes` → `class`,
//! `burgers` → `burger`).

/// Splits text into normalized terms
///
/// Any character that is not alphanumeric separates terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|raw| !raw.is_empty())
        .map(normalize_term)
        .filter(|term| !term.is_empty())
        .collect()
}

/// Normalizes a single word
pub fn normalize_term(word: &str) -> String {
    let lower: String = word
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    stem(&lower)
}

/// Light suffix stemmer for English plurals
///
/// Only plural endings are removed; anything shorter than four characters is
/// left alone so short words and acronyms survive intact.
pub fn stem(word: &str) -> String {
    if word.chars().count() <= 3 || !word.is_ascii() {
        return word.to_string();
    }

    if let Some(base) = word.strip_suffix("ies") {
        if base.len() >= 2 {
            return format!("{}y", base);
        }
    }
    if let Some(base) = word.strip_suffix("sses") {
        return format!("{}ss", base);
    }
    for suffix in ["xes", "ches", "shes", "zzes"] {
        if let Some(base) = word.strip_suffix(suffix) {
            return format!("{}{}", base, &suffix[..suffix.len() - 2]);
        }
    }
    if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !word.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Start indices of non-overlapping occurrences of `needle` as a contiguous
/// run in `haystack`, scanning left to right
pub fn sequence_starts(haystack: &[String], needle: &[String]) -> Vec<usize> {
    let mut starts = Vec::new();
    if needle.is_empty() || needle.len() > haystack.len() {
        return starts;
    }

    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == *needle {
            starts.push(i);
            i += needle.len();
        } else {
            i += 1;
        }
    }
    starts
}

/// Returns true if `needle` occurs as a contiguous run in `haystack`
pub fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty()
        && needle.len() <= haystack.len()
        && haystack
            .windows(needle.len())
            .any(|window| window == needle)
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
