//! Snippet extraction: locate query terms in a document's raw text and
//! window the earliest usable match.
//!
//! Matching is literal byte-substring search of the (already lowercased)
//! query terms against the raw content. Window edges are nudged to UTF-8
//! character boundaries, since content is stored lossily decoded.

const CONTEXT_BYTES: usize = 200;
const MIN_SNIPPET_LEN: usize = 100;
const FALLBACK_LEN: usize = 300;
const MIN_FALLBACK_LEN: usize = 50;
const MIN_MATCH_TERM_LEN: usize = 2;

/// Extract a snippet of `text` around the query terms. Falls back to the
/// head of the document when nothing matches.
pub fn extract(text: &str, query_terms: &[String]) -> String {
    if text.is_empty() || query_terms.is_empty() {
        return String::new();
    }

    let mut matches: Vec<(usize, &str)> = Vec::new();
    for term in query_terms {
        if term.len() < MIN_MATCH_TERM_LEN {
            continue;
        }
        let mut from = 0;
        while let Some(found) = text[from..].find(term.as_str()) {
            let pos = from + found;
            matches.push((pos, term.as_str()));
            // Step one character so overlapping occurrences are all seen.
            from = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }

    if matches.is_empty() {
        return leading_fallback(text);
    }

    matches.sort_unstable();
    for &(pos, _) in &matches {
        let start = floor_boundary(text, pos.saturating_sub(CONTEXT_BYTES));
        let end = ceil_boundary(text, (pos + CONTEXT_BYTES).min(text.len()));
        let mut snippet = String::new();
        if start > 0 {
            snippet.push_str("...");
        }
        snippet.push_str(&text[start..end]);
        if end < text.len() {
            snippet.push_str("...");
        }
        if snippet.len() >= MIN_SNIPPET_LEN {
            return snippet;
        }
    }
    head(text, FALLBACK_LEN)
}

/// No term matched: the head of the document starting at the first
/// alphabetic character, if long enough to be useful.
fn leading_fallback(text: &str) -> String {
    if let Some(start) = text.bytes().position(|b| b.is_ascii_alphabetic()) {
        let end = ceil_boundary(text, (start + FALLBACK_LEN).min(text.len()));
        let slice = &text[start..end];
        if slice.len() > MIN_FALLBACK_LEN {
            return slice.to_string();
        }
    }
    head(text, FALLBACK_LEN)
}

fn head(text: &str, len: usize) -> String {
    let end = ceil_boundary(text, len.min(text.len()));
    text[..end].to_string()
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while i < text.len() && !text.is_char_boundary(i) {
        i += 1;
    }
    i
}
