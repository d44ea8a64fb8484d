//! Search facade: composes the tokenizer, index, ranker, and snippet
//! extractor, and adds the result cache and pagination on top.

use crate::cache::FifoCache;
use crate::index::{DocId, Document, InvertedIndex, SourceFile};
use crate::rank::{self, RankedDoc};
use crate::snippet;

const SEARCH_CACHE_CAPACITY: usize = 1000;
/// Prefix search expands to at most this many completions joined into a
/// synthetic query.
const PREFIX_EXPANSION_TERMS: usize = 5;

pub struct SearchEngine {
    index: InvertedIndex,
    search_cache: FifoCache<Vec<RankedDoc>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            index: InvertedIndex::new(),
            search_cache: FifoCache::new(SEARCH_CACHE_CAPACITY),
        }
    }

    /// Build (or rebuild) the index from `files`. Flushes the result
    /// cache; the index is immutable until the next rebuild.
    pub fn build_from_files(&mut self, files: Vec<SourceFile>) {
        self.index.build_from_files(files);
        self.search_cache.clear();
    }

    pub fn document_count(&self) -> usize {
        self.index.doc_count()
    }

    pub fn unique_term_count(&self) -> usize {
        self.index.unique_term_count()
    }

    pub fn total_words_indexed(&self) -> u64 {
        self.index.total_words_processed
    }

    pub fn total_files_indexed(&self) -> usize {
        self.index.total_files_processed
    }

    pub fn document(&self, doc_id: DocId) -> Option<&Document> {
        self.index.document(doc_id)
    }

    /// Ranked results for `query`, sliced to the 1-indexed `page` of
    /// `results_per_page` rows. Pages past the end are empty.
    pub fn search_with_pagination(
        &mut self,
        query: &str,
        page: usize,
        results_per_page: usize,
    ) -> Vec<RankedDoc> {
        let page = page.max(1);
        let results_per_page = results_per_page.max(1);
        let cache_key = format!("{query}|PAGE|{page}|{results_per_page}");
        if let Some(hit) = self.search_cache.get(&cache_key) {
            return hit.clone();
        }
        let ranked = rank::rank(&self.index, query);
        let start = (page - 1).saturating_mul(results_per_page).min(ranked.len());
        let end = page.saturating_mul(results_per_page).min(ranked.len());
        let page_results = ranked[start..end].to_vec();
        self.search_cache.insert(cache_key, page_results.clone());
        page_results
    }

    /// Total number of results for `query` across all pages.
    pub fn get_total_results_count(&mut self, query: &str) -> usize {
        self.search_with_pagination(query, 1, usize::MAX).len()
    }

    /// Up to `limit` vocabulary completions of `prefix` (ASCII-folded).
    pub fn autocomplete(&mut self, prefix: &str, limit: usize) -> Vec<String> {
        self.index
            .trie
            .starts_with(&prefix.to_ascii_lowercase(), limit)
    }

    /// Expand `prefix` to its completions and search for them.
    pub fn prefix_search_with_pagination(
        &mut self,
        prefix: &str,
        expand_limit: usize,
        page: usize,
        results_per_page: usize,
    ) -> Vec<RankedDoc> {
        match self.expand_prefix(prefix, expand_limit) {
            Some(query) => self.search_with_pagination(&query, page, results_per_page),
            None => Vec::new(),
        }
    }

    pub fn get_prefix_total_results_count(&mut self, prefix: &str, expand_limit: usize) -> usize {
        match self.expand_prefix(prefix, expand_limit) {
            Some(query) => self.get_total_results_count(&query),
            None => 0,
        }
    }

    fn expand_prefix(&mut self, prefix: &str, expand_limit: usize) -> Option<String> {
        let suggestions = self.autocomplete(prefix, expand_limit);
        if suggestions.is_empty() {
            return None;
        }
        Some(
            suggestions
                .iter()
                .take(PREFIX_EXPANSION_TERMS)
                .cloned()
                .collect::<Vec<String>>()
                .join(" "),
        )
    }

    /// Snippet of `doc_id`'s content around `query_terms`; empty for an
    /// unknown document.
    pub fn snippet_for_doc(&self, query_terms: &[String], doc_id: DocId) -> String {
        match self.index.document(doc_id) {
            Some(doc) => snippet::extract(&doc.full_content, query_terms),
            None => String::new(),
        }
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}
