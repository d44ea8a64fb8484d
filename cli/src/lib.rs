//! Driver layer around [`scour_core`]: directory scanning, query-mode
//! runners, and the JSON output shapes. The binary in `main.rs` stays a
//! thin wrapper so integration tests can drive the full pipeline
//! in-process.

use anyhow::{ensure, Result};
use scour_core::tokenizer::tokenize;
use scour_core::{RankedDoc, SearchEngine, SourceFile};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;
use walkdir::WalkDir;

/// The directory scanner ignores files larger than this; the index build
/// applies its own tighter cap per file.
pub const MAX_SCAN_FILE_BYTES: u64 = 200 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub status: &'static str,
    pub documents: usize,
    pub unique_terms: usize,
    pub data_directory: String,
    pub total_words_indexed: u64,
}

#[derive(Debug, Serialize)]
pub struct ResultItem {
    pub rank: usize,
    pub filename: String,
    pub filepath: String,
    pub score: f32,
    #[serde(rename = "totalOccurrences")]
    pub total_occurrences: u32,
    #[serde(rename = "inTitle")]
    pub in_title: bool,
    #[serde(rename = "exactPhraseMatch")]
    pub exact_phrase_match: bool,
    pub snippet: String,
}

/// Shared shape for `--search` and `--prefixsearch` responses; exactly
/// one of `query`/`prefix` is present depending on the mode.
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub count: usize,
    pub total_results: usize,
    pub total_pages: usize,
    pub page: usize,
    pub results_per_page: usize,
    pub mode: &'static str,
    pub time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_page: Option<usize>,
    pub results: Vec<ResultItem>,
}

#[derive(Debug, Serialize)]
pub struct AutocompleteOutput {
    pub prefix: String,
    pub count: usize,
    pub time_ms: u64,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub error: String,
}

/// Enumerate the indexable `.txt` files directly under `dir` and read
/// their bytes, smallest file first. Unreadable and oversized files are
/// skipped with a diagnostic; a missing or non-directory path is an error.
pub fn scan_data_dir(dir: &Path) -> Result<Vec<SourceFile>> {
    ensure!(dir.is_dir(), "Data directory not found: {}", dir.display());

    let mut entries: Vec<(PathBuf, u64)> = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if metadata.len() > MAX_SCAN_FILE_BYTES {
            warn!(path = %path.display(), size = metadata.len(), "skipping oversized file");
            continue;
        }
        entries.push((path.to_path_buf(), metadata.len()));
    }
    entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let mut files = Vec::with_capacity(entries.len());
    for (path, _) in entries {
        match fs::read(&path) {
            Ok(bytes) => files.push(SourceFile {
                filename: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                filepath: path.to_string_lossy().into_owned(),
                bytes,
            }),
            Err(err) => warn!(path = %path.display(), %err, "skipping unreadable file"),
        }
    }
    Ok(files)
}

/// Scan `dir` and build a ready-to-query engine from it.
pub fn build_engine(dir: &Path) -> Result<SearchEngine> {
    let files = scan_data_dir(dir)?;
    let mut engine = SearchEngine::new();
    engine.build_from_files(files);
    Ok(engine)
}

pub fn run_status(engine: &SearchEngine, data_dir: &str) -> StatusOutput {
    StatusOutput {
        status: "ready",
        documents: engine.document_count(),
        unique_terms: engine.unique_term_count(),
        data_directory: data_dir.to_string(),
        total_words_indexed: engine.total_words_indexed(),
    }
}

pub fn run_search(
    engine: &mut SearchEngine,
    query: &str,
    page: usize,
    results_per_page: usize,
) -> SearchOutput {
    let page = page.max(1);
    let results_per_page = results_per_page.max(1);
    let started = Instant::now();
    let results = engine.search_with_pagination(query, page, results_per_page);
    let total_results = engine.get_total_results_count(query);
    let elapsed = started.elapsed();
    let query_terms = tokenize(&query.to_ascii_lowercase());
    paginated_output(
        engine,
        Some(query.to_string()),
        None,
        "search",
        results,
        total_results,
        page,
        results_per_page,
        &query_terms,
        elapsed,
    )
}

pub fn run_prefix_search(
    engine: &mut SearchEngine,
    prefix: &str,
    expand_limit: usize,
    page: usize,
    results_per_page: usize,
) -> SearchOutput {
    let page = page.max(1);
    let results_per_page = results_per_page.max(1);
    let started = Instant::now();
    let results = engine.prefix_search_with_pagination(prefix, expand_limit, page, results_per_page);
    let total_results = engine.get_prefix_total_results_count(prefix, expand_limit);
    let elapsed = started.elapsed();
    // Snippets for prefix mode window the prefix itself, not the
    // expanded terms.
    let query_terms = vec![prefix.to_string()];
    paginated_output(
        engine,
        None,
        Some(prefix.to_string()),
        "prefix_search",
        results,
        total_results,
        page,
        results_per_page,
        &query_terms,
        elapsed,
    )
}

pub fn run_autocomplete(
    engine: &mut SearchEngine,
    prefix: &str,
    limit: usize,
) -> AutocompleteOutput {
    let started = Instant::now();
    let suggestions = engine.autocomplete(prefix, limit);
    AutocompleteOutput {
        prefix: prefix.to_string(),
        count: suggestions.len(),
        time_ms: started.elapsed().as_millis() as u64,
        suggestions,
    }
}

#[allow(clippy::too_many_arguments)]
fn paginated_output(
    engine: &SearchEngine,
    query: Option<String>,
    prefix: Option<String>,
    mode: &'static str,
    results: Vec<RankedDoc>,
    total_results: usize,
    page: usize,
    results_per_page: usize,
    query_terms: &[String],
    elapsed: Duration,
) -> SearchOutput {
    let total_pages = total_results.div_ceil(results_per_page).max(1);
    let start_rank = (page - 1).saturating_mul(results_per_page) + 1;
    let items = results
        .iter()
        .enumerate()
        .map(|(i, ranked)| {
            let doc = engine.document(ranked.doc_id);
            ResultItem {
                rank: start_rank + i,
                filename: doc.map(|d| d.filename.clone()).unwrap_or_default(),
                filepath: doc.map(|d| d.filepath.clone()).unwrap_or_default(),
                score: ranked.score,
                total_occurrences: ranked.total_occurrences,
                in_title: ranked.in_title,
                exact_phrase_match: ranked.exact_phrase_match,
                snippet: engine.snippet_for_doc(query_terms, ranked.doc_id),
            }
        })
        .collect::<Vec<ResultItem>>();

    SearchOutput {
        query,
        prefix,
        count: items.len(),
        total_results,
        total_pages,
        page,
        results_per_page,
        mode,
        time_ms: elapsed.as_millis() as u64,
        next_page: (page < total_pages).then(|| page + 1),
        prev_page: (page > 1).then(|| page - 1),
        results: items,
    }
}
