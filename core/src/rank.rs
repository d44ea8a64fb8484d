//! Scoring of documents against a query.
//!
//! Per matched posting the score combines length-normalized TF, IDF
//! (`log10(N/df + 1)`), a weight for terms near the top of a document,
//! filename match multipliers, an exact-phrase bonus, and a high-frequency
//! bonus. Accumulated scores are then adjusted by document length, and the
//! survivors are ordered by a deterministic tuple.

use crate::index::{DocId, InvertedIndex};
use crate::tokenizer::tokenize;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Documents scoring at or below this are dropped from the result set.
pub const SCORE_EPSILON: f32 = 1e-6;
/// Scores are compared at 1e-4 granularity; ties fall through to the
/// occurrence count.
const SCORE_CMP_SCALE: f32 = 1e4;
/// Query terms shorter than this never count as filename matches.
const MIN_TITLE_TERM_LEN: usize = 3;
/// Filename hits this close to the start of the name score extra.
const TITLE_LEADING_WINDOW: usize = 20;

/// One scored document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedDoc {
    pub doc_id: DocId,
    pub score: f32,
    pub total_occurrences: u32,
    pub in_title: bool,
    pub exact_phrase_match: bool,
    pub title_boost: f32,
}

impl RankedDoc {
    fn sort_key(&self) -> (bool, OrderedFloat<f32>, i64, u32) {
        (
            self.exact_phrase_match,
            OrderedFloat(self.title_boost),
            (self.score * SCORE_CMP_SCALE).round() as i64,
            self.total_occurrences,
        )
    }
}

/// Rank every matching document against `query`, best first. The order is
/// total: descending by (exact phrase, title boost, score, occurrences),
/// with ascending `doc_id` as the final tiebreak.
pub fn rank(index: &InvertedIndex, query: &str) -> Vec<RankedDoc> {
    if index.docs.is_empty() {
        return Vec::new();
    }
    let exact_phrase = query.to_ascii_lowercase();
    let query_terms = tokenize(&exact_phrase);
    if query_terms.is_empty() {
        return Vec::new();
    }

    let phrase_docs = exact_phrase_docs(index, &exact_phrase, &query_terms);
    let title_boosts = title_boosts(index, &query_terms);

    let mut idf_by_term: HashMap<&str, f32> = HashMap::new();
    for term in &query_terms {
        idf_by_term
            .entry(term.as_str())
            .or_insert_with(|| idf(index, term));
    }

    let mut doc_scores: HashMap<DocId, f32> = HashMap::new();
    let mut doc_occurrences: HashMap<DocId, u32> = HashMap::new();

    for term in &query_terms {
        let Some(postings) = index.postings.get(term.as_str()) else {
            continue;
        };
        let term_idf = idf_by_term[term.as_str()];
        for posting in postings {
            let total_tokens = index.docs[posting.doc_id as usize].total_tokens as f32;
            let tf = posting.freq as f32 / (1.0 + (1.0 + total_tokens / 1000.0).ln());

            let mut position_weight = 1.0f32;
            if !posting.positions.is_empty() {
                let mean: f32 = posting.positions.iter().map(|&p| p as f32).sum::<f32>()
                    / posting.positions.len() as f32;
                let ratio = mean / total_tokens;
                if ratio < 0.2 {
                    position_weight = 1.0 + (0.2 - ratio) * 2.0;
                }
            }

            let mut base = tf * term_idf * position_weight;
            if let Some(&boost) = title_boosts.get(&posting.doc_id) {
                base *= 10.0 + boost * 5.0;
            }
            if phrase_docs.contains(&posting.doc_id) {
                base *= 5.0;
            }
            if posting.freq > 10 {
                base *= (1.0 + (posting.freq as f32).ln() / 5.0).min(3.0);
            }
            *doc_scores.entry(posting.doc_id).or_insert(0.0) += base;
            *doc_occurrences.entry(posting.doc_id).or_insert(0) += posting.freq;
        }
    }

    let mut results: Vec<RankedDoc> = Vec::with_capacity(doc_scores.len());
    for (doc_id, mut score) in doc_scores {
        let total_tokens = index.docs[doc_id as usize].total_tokens;
        if total_tokens < 100 {
            score *= 0.1;
        } else if total_tokens > 1000 && total_tokens < 100_000 {
            score *= 1.2;
        } else if total_tokens > 200_000 {
            score *= 0.9;
        }
        let title_boost = title_boosts.get(&doc_id).copied().unwrap_or(0.0);
        if title_boost > 0.0 {
            score *= 1.0 + title_boost;
        }
        if score <= SCORE_EPSILON {
            continue;
        }
        results.push(RankedDoc {
            doc_id,
            score,
            total_occurrences: doc_occurrences.get(&doc_id).copied().unwrap_or(0),
            in_title: title_boost > 0.0,
            exact_phrase_match: phrase_docs.contains(&doc_id),
            title_boost,
        });
    }

    results.sort_unstable_by(|a, b| {
        b.sort_key()
            .cmp(&a.sort_key())
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
    results
}

/// `log10(N / df + 1)`, zero when the term is unknown or the index empty.
pub fn idf(index: &InvertedIndex, term: &str) -> f32 {
    let df = index.doc_freq.get(term).copied().unwrap_or(0);
    let n = index.docs.len();
    if df == 0 || n == 0 {
        return 0.0;
    }
    (n as f32 / df as f32 + 1.0).log10()
}

/// Documents whose lowercased content contains the lowercased query
/// verbatim. Only meaningful for multi-token queries; single-token
/// queries yield the empty set.
fn exact_phrase_docs(
    index: &InvertedIndex,
    exact_phrase: &str,
    query_terms: &[String],
) -> HashSet<DocId> {
    let mut docs = HashSet::new();
    if query_terms.len() < 2 {
        return docs;
    }
    for (doc_id, doc) in index.docs.iter().enumerate() {
        if doc.full_content.to_ascii_lowercase().contains(exact_phrase) {
            docs.insert(doc_id as DocId);
        }
    }
    docs
}

/// Per-document filename match score. A hit counts 1.0, 2.0 when
/// whole-word, times 1.5 when within the leading window of the name.
fn title_boosts(index: &InvertedIndex, query_terms: &[String]) -> HashMap<DocId, f32> {
    let mut boosts = HashMap::new();
    for (doc_id, doc) in index.docs.iter().enumerate() {
        let filename = doc.filename.to_ascii_lowercase();
        let bytes = filename.as_bytes();
        let mut score = 0.0f32;
        for term in query_terms {
            if term.len() < MIN_TITLE_TERM_LEN {
                continue;
            }
            let Some(pos) = filename.find(term.as_str()) else {
                continue;
            };
            let end = pos + term.len();
            let starts_clean = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();
            let ends_clean = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
            let mut term_score = if starts_clean && ends_clean { 2.0 } else { 1.0 };
            if pos < TITLE_LEADING_WINDOW {
                term_score *= 1.5;
            }
            score += term_score;
        }
        if score > 0.0 {
            boosts.insert(doc_id as DocId, score);
        }
    }
    boosts
}
