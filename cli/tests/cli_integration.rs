use scour_cli::{
    build_engine, run_autocomplete, run_prefix_search, run_search, run_status, scan_data_dir,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_corpus(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

#[test]
fn scan_rejects_missing_directory() {
    let err = scan_data_dir(Path::new("/definitely/not/here")).unwrap_err();
    assert!(err.to_string().contains("Data directory not found"));
}

#[test]
fn scan_keeps_only_txt_files_sorted_by_size() {
    let dir = tempdir().unwrap();
    write_corpus(
        dir.path(),
        &[
            ("big.txt", "a much longer file body with many more bytes in it"),
            ("small.txt", "tiny"),
            ("skipped.md", "not a text file by extension"),
        ],
    );
    let files = scan_data_dir(dir.path()).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["small.txt", "big.txt"]);
}

#[test]
fn scan_of_empty_directory_is_empty_not_an_error() {
    let dir = tempdir().unwrap();
    assert!(scan_data_dir(dir.path()).unwrap().is_empty());
}

#[test]
fn status_reports_corpus_statistics() {
    let dir = tempdir().unwrap();
    write_corpus(
        dir.path(),
        &[("a.txt", "alpha beta gamma"), ("b.txt", "beta delta")],
    );
    let engine = build_engine(dir.path()).unwrap();
    let status = run_status(&engine, "corpus-dir");
    assert_eq!(status.status, "ready");
    assert_eq!(status.documents, 2);
    assert_eq!(status.unique_terms, 4);
    assert_eq!(status.total_words_indexed, 5);
    assert_eq!(status.data_directory, "corpus-dir");

    let json = serde_json::to_value(&status).unwrap();
    for field in [
        "status",
        "documents",
        "unique_terms",
        "data_directory",
        "total_words_indexed",
    ] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
}

#[test]
fn search_output_shape_and_rank_numbering() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path(), &[("hello.txt", "hello world")]);
    let mut engine = build_engine(dir.path()).unwrap();
    let output = run_search(&mut engine, "hello", 1, 10);

    assert_eq!(output.mode, "search");
    assert_eq!(output.query.as_deref(), Some("hello"));
    assert!(output.prefix.is_none());
    assert_eq!(output.count, 1);
    assert_eq!(output.total_results, 1);
    assert_eq!(output.total_pages, 1);
    assert_eq!(output.next_page, None);
    assert_eq!(output.prev_page, None);

    let hit = &output.results[0];
    assert_eq!(hit.rank, 1);
    assert_eq!(hit.filename, "hello.txt");
    assert!(hit.in_title);
    assert!(!hit.exact_phrase_match);
    assert!(hit.snippet.contains("hello"));

    let json = serde_json::to_value(&output).unwrap();
    let item = &json["results"][0];
    for field in [
        "rank",
        "filename",
        "filepath",
        "score",
        "totalOccurrences",
        "inTitle",
        "exactPhraseMatch",
        "snippet",
    ] {
        assert!(item.get(field).is_some(), "missing result field {field}");
    }
    assert!(json.get("query").is_some());
    assert!(json.get("prefix").is_none(), "prefix omitted in search mode");
    assert!(json.get("next_page").is_none(), "next_page omitted on last page");
}

#[test]
fn pagination_metadata_on_a_middle_page() {
    let dir = tempdir().unwrap();
    let files: Vec<(String, String)> = (0..25)
        .map(|i| {
            (
                format!("doc{i:02}.txt"),
                format!("zebra {}", format!("pad{i} ").repeat(i + 1)),
            )
        })
        .collect();
    for (name, content) in &files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    let mut engine = build_engine(dir.path()).unwrap();
    let output = run_search(&mut engine, "zebra", 2, 10);

    assert_eq!(output.page, 2);
    assert_eq!(output.results_per_page, 10);
    assert_eq!(output.count, 10);
    assert_eq!(output.total_results, 25);
    assert_eq!(output.total_pages, 3);
    assert_eq!(output.next_page, Some(3));
    assert_eq!(output.prev_page, Some(1));
    let ranks: Vec<usize> = output.results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, (11..=20).collect::<Vec<usize>>());
}

#[test]
fn autocomplete_output_shape() {
    let dir = tempdir().unwrap();
    write_corpus(
        dir.path(),
        &[("vocab.txt", "program programming programmer pragma")],
    );
    let mut engine = build_engine(dir.path()).unwrap();
    let output = run_autocomplete(&mut engine, "prog", 2);
    assert_eq!(output.prefix, "prog");
    assert_eq!(output.count, 2);
    assert_eq!(output.suggestions.len(), 2);
    assert!(output.suggestions.iter().all(|s| s.starts_with("prog")));

    let json = serde_json::to_value(&output).unwrap();
    for field in ["prefix", "count", "time_ms", "suggestions"] {
        assert!(json.get(field).is_some(), "missing field {field}");
    }
}

#[test]
fn prefix_search_output_shape() {
    let dir = tempdir().unwrap();
    write_corpus(
        dir.path(),
        &[
            ("guide.txt", "programming guide for programmers"),
            ("other.txt", "unrelated prose entirely"),
        ],
    );
    let mut engine = build_engine(dir.path()).unwrap();
    let output = run_prefix_search(&mut engine, "program", 100, 1, 10);

    assert_eq!(output.mode, "prefix_search");
    assert_eq!(output.prefix.as_deref(), Some("program"));
    assert!(output.query.is_none());
    assert!(output.count >= 1);
    assert_eq!(output.results[0].filename, "guide.txt");
    assert_eq!(output.results[0].rank, 1);

    let json = serde_json::to_value(&output).unwrap();
    assert!(json.get("prefix").is_some());
    assert!(json.get("query").is_none(), "query omitted in prefix mode");
}

#[test]
fn unmatched_query_reports_a_single_empty_page() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path(), &[("a.txt", "ordinary content")]);
    let mut engine = build_engine(dir.path()).unwrap();
    let output = run_search(&mut engine, "nonexistentterm", 1, 10);
    assert_eq!(output.count, 0);
    assert_eq!(output.total_results, 0);
    assert_eq!(output.total_pages, 1);
    assert!(output.results.is_empty());
}
