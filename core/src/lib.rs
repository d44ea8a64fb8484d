//! In-memory full-text search over a set of plain-text documents.
//!
//! The pipeline: raw file bytes go through the [`tokenizer`] into a
//! positional [`index`], the vocabulary is mirrored into a [`trie`] for
//! autocomplete, and queries are scored by [`rank`] and windowed into
//! snippets by [`snippet`]. [`engine::SearchEngine`] composes the pieces
//! and adds result caching and pagination.
//!
//! The engine is single-threaded. The index is immutable after
//! [`engine::SearchEngine::build_from_files`]; the only state touched on
//! the query path is the two FIFO caches, which is why query entry points
//! take `&mut self`.

pub mod cache;
pub mod engine;
pub mod index;
pub mod rank;
pub mod snippet;
pub mod tokenizer;
pub mod trie;

pub use engine::SearchEngine;
pub use index::{DocId, Document, InvertedIndex, Posting, SourceFile};
pub use rank::RankedDoc;
