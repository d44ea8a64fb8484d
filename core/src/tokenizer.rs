//! Byte-scanning tokenizer with stop-word filtering and length gating.
//!
//! Text is treated as bytes; a run of ASCII alphanumerics forms a
//! candidate token, lowercased by ASCII fold. A completed run is emitted
//! only if it is 2..=15 bytes long, not a stop word, and not all digits.
//! The emitted sequence index is the token's position, consumed by the
//! ranker's position weighting.

use lazy_static::lazy_static;
use std::collections::HashSet;

pub const MIN_TOKEN_LEN: usize = 2;
pub const MAX_TOKEN_LEN: usize = 15;
/// Bytes past this point in a single alphanumeric run are discarded
/// without terminating the run, so an overlong run yields no token rather
/// than a truncated one.
pub const SCAN_BUFFER_LEN: usize = 31;
pub const MAX_TOKENS_PER_DOC: usize = 100_000;

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "the", "and", "for", "are", "but", "not", "you", "all", "any", "can",
            "had", "her", "was", "one", "our", "out", "day", "get", "has", "him",
            "his", "how", "man", "new", "now", "old", "see", "two", "way", "who",
            "boy", "did", "its", "let", "put", "say", "she", "too", "use", "may",
            "also", "than", "that", "this", "with", "from", "have", "were", "been",
            "they", "what", "when", "where", "which", "will", "your", "their",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Tokenize `text` into normalized terms, at most [`MAX_TOKENS_PER_DOC`].
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    if text.is_empty() {
        return tokens;
    }
    let mut buf = String::with_capacity(SCAN_BUFFER_LEN);
    for &byte in text.as_bytes() {
        if tokens.len() >= MAX_TOKENS_PER_DOC {
            return tokens;
        }
        if byte.is_ascii_alphanumeric() {
            if buf.len() < SCAN_BUFFER_LEN {
                buf.push(byte.to_ascii_lowercase() as char);
            }
        } else if !buf.is_empty() {
            flush(&mut buf, &mut tokens);
        }
    }
    if !buf.is_empty() && tokens.len() < MAX_TOKENS_PER_DOC {
        flush(&mut buf, &mut tokens);
    }
    tokens
}

fn flush(buf: &mut String, tokens: &mut Vec<String>) {
    if (MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&buf.len())
        && !STOP_WORDS.contains(buf.as_str())
        && !buf.bytes().all(|b| b.is_ascii_digit())
    {
        tokens.push(buf.clone());
    }
    buf.clear();
}
