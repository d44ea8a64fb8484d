//! Positional inverted index built in one pass over the input documents.
//!
//! Terms map to posting lists (at most one posting per document per
//! term); each posting carries the occurrence count and the first token
//! positions. The vocabulary is mirrored into the trie for autocomplete.

use crate::tokenizer::tokenize;
use crate::trie::Trie;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

pub type DocId = u32;

/// Inputs larger than this are skipped with a diagnostic.
pub const MAX_FILE_BYTES: usize = 100 * 1024 * 1024;
/// Occurrences past this count increment nothing.
pub const MAX_POSTING_FREQ: u32 = 1000;
/// Only the earliest occurrences are kept positionally; later ones still
/// count toward `freq`.
pub const MAX_POSTING_POSITIONS: usize = 50;
/// Ingestion stops entirely once the vocabulary reaches this size.
pub const MAX_VOCABULARY: usize = 200_000;

const TRIE_MIN_WORD_LEN: usize = 2;
const TRIE_MAX_WORD_LEN: usize = 20;
const PROGRESS_LOG_EVERY: usize = 5;

/// One input to the index build: a named blob of file bytes. The path is
/// opaque to the core and only carried through to results.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub filename: String,
    pub filepath: String,
    pub bytes: Vec<u8>,
}

/// Per-(term, document) record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: DocId,
    pub freq: u32,
    /// Strictly increasing token indices of the earliest occurrences.
    pub positions: Vec<u32>,
}

/// An indexed document. `full_content` is kept verbatim for snippet
/// extraction and exact-phrase matching.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub filepath: String,
    pub total_tokens: usize,
    pub file_size: u64,
    pub full_content: String,
}

/// The index plus per-document metadata. Built once by
/// [`InvertedIndex::build_from_files`] and immutable afterwards; `doc_id`s
/// are dense indices into `docs` in build order.
#[derive(Default)]
pub struct InvertedIndex {
    pub postings: HashMap<String, Vec<Posting>>,
    pub doc_freq: HashMap<String, u32>,
    pub docs: Vec<Document>,
    pub trie: Trie,
    pub total_words_processed: u64,
    pub total_files_processed: usize,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index from `files`, in order. Clears any previous
    /// state first; an empty input leaves the index cleared.
    pub fn build_from_files(&mut self, files: Vec<SourceFile>) {
        self.clear();
        if files.is_empty() {
            return;
        }
        let started = Instant::now();
        let file_count = files.len();
        info!(files = file_count, "building index");

        let mut vocabulary: HashSet<String> = HashSet::new();
        let mut vocabulary_order: Vec<String> = Vec::new();

        for file in files {
            if file.bytes.len() > MAX_FILE_BYTES {
                warn!(
                    path = %file.filepath,
                    size_mb = file.bytes.len() / (1024 * 1024),
                    "skipping very large file"
                );
                continue;
            }
            let doc_id = self.docs.len() as DocId;
            let file_size = file.bytes.len() as u64;
            let full_content = String::from_utf8_lossy(&file.bytes).into_owned();
            let tokens = tokenize(&full_content);
            self.total_words_processed += tokens.len() as u64;

            let mut local: HashMap<&str, Posting> = HashMap::new();
            for (position, term) in tokens.iter().enumerate() {
                let posting = local.entry(term.as_str()).or_insert_with(|| Posting {
                    doc_id,
                    freq: 0,
                    positions: Vec::new(),
                });
                if posting.freq < MAX_POSTING_FREQ {
                    posting.freq += 1;
                    if posting.positions.len() < MAX_POSTING_POSITIONS {
                        posting.positions.push(position as u32);
                    }
                }
                if !vocabulary.contains(term) {
                    vocabulary.insert(term.clone());
                    vocabulary_order.push(term.clone());
                }
            }
            for (term, posting) in local {
                self.postings.entry(term.to_string()).or_default().push(posting);
            }

            self.docs.push(Document {
                filename: file.filename,
                filepath: file.filepath,
                total_tokens: tokens.len(),
                file_size,
                full_content,
            });
            self.total_files_processed += 1;

            if self.total_files_processed % PROGRESS_LOG_EVERY == 0 {
                debug!(
                    processed = self.total_files_processed,
                    total = file_count,
                    unique_words = vocabulary.len(),
                    "indexing progress"
                );
            }
            if vocabulary.len() >= MAX_VOCABULARY {
                info!(unique_words = vocabulary.len(), "vocabulary limit reached, stopping ingestion early");
                break;
            }
        }

        for (term, postings) in &self.postings {
            self.doc_freq.insert(term.clone(), postings.len() as u32);
        }

        // Shortest words first: keeps trie pages for short prefixes warm.
        vocabulary_order.sort_by_key(|word| word.len());
        let mut trie_words = 0usize;
        for word in &vocabulary_order {
            if (TRIE_MIN_WORD_LEN..=TRIE_MAX_WORD_LEN).contains(&word.len()) {
                self.trie.insert(word);
                trie_words += 1;
            }
        }

        info!(
            documents = self.docs.len(),
            unique_terms = self.postings.len(),
            trie_words,
            total_words = self.total_words_processed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "index built"
        );
    }

    /// Drop postings, documents, the trie, and its cache.
    pub fn clear(&mut self) {
        self.postings.clear();
        self.doc_freq.clear();
        self.docs.clear();
        self.trie.clear();
        self.total_words_processed = 0;
        self.total_files_processed = 0;
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn unique_term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(doc_id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> SourceFile {
        SourceFile {
            filename: name.to_string(),
            filepath: format!("/data/{name}"),
            bytes: content.as_bytes().to_vec(),
        }
    }

    fn build(files: Vec<SourceFile>) -> InvertedIndex {
        let mut index = InvertedIndex::new();
        index.build_from_files(files);
        index
    }

    #[test]
    fn assigns_dense_doc_ids_in_input_order() {
        let index = build(vec![
            file("a.txt", "apple banana"),
            file("b.txt", "banana cherry"),
        ]);
        assert_eq!(index.doc_count(), 2);
        assert_eq!(index.docs[0].filename, "a.txt");
        assert_eq!(index.docs[1].filename, "b.txt");
        let postings = &index.postings["banana"];
        let ids: Vec<DocId> = postings.iter().map(|p| p.doc_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn doc_freq_matches_posting_list_length() {
        let index = build(vec![
            file("a.txt", "apple banana apple"),
            file("b.txt", "banana cherry"),
            file("c.txt", "banana"),
        ]);
        for (term, postings) in &index.postings {
            assert_eq!(index.doc_freq[term], postings.len() as u32);
            let mut seen = std::collections::HashSet::new();
            for posting in postings {
                assert!(seen.insert(posting.doc_id), "duplicate doc in {term}");
            }
        }
        assert_eq!(index.doc_freq["banana"], 3);
        assert_eq!(index.doc_freq["apple"], 1);
    }

    #[test]
    fn postings_record_freq_and_positions() {
        let index = build(vec![file("a.txt", "red blue red green red")]);
        let posting = &index.postings["red"][0];
        assert_eq!(posting.freq, 3);
        assert_eq!(posting.positions, vec![0, 2, 4]);
    }

    #[test]
    fn positions_cap_at_fifty_but_freq_keeps_counting() {
        let text = vec!["echo"; 80].join(" ");
        let index = build(vec![file("a.txt", &text)]);
        let posting = &index.postings["echo"][0];
        assert_eq!(posting.freq, 80);
        assert_eq!(posting.positions.len(), MAX_POSTING_POSITIONS);
        assert!(posting.positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(posting.positions[0], 0);
        assert_eq!(posting.positions[49], 49);
    }

    #[test]
    fn total_tokens_counts_emitted_terms() {
        let index = build(vec![file("a.txt", "the cat sat a 99 mat")]);
        // "the" is a stop word, "a" and "99" fail the filters.
        assert_eq!(index.docs[0].total_tokens, 3);
        assert_eq!(index.total_words_processed, 3);
    }

    #[test]
    fn vocabulary_terms_land_in_trie() {
        let mut index = build(vec![file("a.txt", "searchable words everywhere")]);
        assert_eq!(index.trie.starts_with("searcha", 10), vec!["searchable"]);
    }

    #[test]
    fn empty_input_leaves_cleared_state() {
        let index = build(Vec::new());
        assert_eq!(index.doc_count(), 0);
        assert_eq!(index.unique_term_count(), 0);
        assert_eq!(index.total_words_processed, 0);
    }

    #[test]
    fn rebuild_replaces_previous_state() {
        let mut index = build(vec![file("a.txt", "alpha beta")]);
        index.build_from_files(vec![file("b.txt", "gamma delta")]);
        assert_eq!(index.doc_count(), 1);
        assert!(index.postings.contains_key("gamma"));
        assert!(!index.postings.contains_key("alpha"));
        assert!(index.trie.starts_with("al", 10).is_empty());
    }

    #[test]
    fn keeps_full_content_verbatim() {
        let index = build(vec![file("a.txt", "Keep THIS exact, punctuation included!")]);
        assert_eq!(index.docs[0].full_content, "Keep THIS exact, punctuation included!");
    }
}
