/// Default chunk size for model requests, in characters
pub const DEFAULT_CHUNK_CHARS: usize = 4000;

/// Splits text into chunks of at most `max_chars` characters
///
/// Paragraphs (separated by blank lines) are kept together where possible.
/// A paragraph longer than `max_chars` is split at word boundaries.
pub fn chunk_content(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0;

    let pieces = text
        .split("\n\n")
        .flat_map(|paragraph| split_long(paragraph, max_chars));

    for piece in pieces {
        let len = piece.chars().count();
        let separator = if current.is_empty() { 0 } else { 2 };
        if current_len + separator + len > max_chars && !current.is_empty() {
            chunks.push(current.join("\n\n"));
            current.clear();
            current_len = 0;
        } else {
            current_len += separator;
        }
        current_len += len;
        current.push(piece);
    }

    if !current.is_empty() {
        chunks.push(current.join("\n\n"));
    }
    chunks
}

/// Breaks one paragraph into word-aligned pieces of at most `max_chars`
fn split_long(paragraph: &str, max_chars: usize) -> Vec<String> {
    if paragraph.chars().count() <= max_chars {
        return vec![paragraph.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_len = 0;

    for word in paragraph.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if piece.is_empty() { word_len } else { word_len + 1 };

        if piece_len + needed > max_chars && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece_len = 0;
        }

        if word_len > max_chars {
            // A single oversized word is cut at character boundaries
            let chars: Vec<char> = word.chars().collect();
            for part in chars.chunks(max_chars) {
                pieces.push(part.iter().collect());
            }
            continue;
        }

        if !piece.is_empty() {
            piece.push(' ');
            piece_len += 1;
        }
        piece.push_str(word);
        piece_len += word_len;
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
