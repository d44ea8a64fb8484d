//! Prefix trie over the indexed vocabulary, for autocomplete.
//!
//! A 26-ary tree over lowercase ASCII letters. Prefix enumeration is
//! breadth-first with alphabetical child order, so shorter completions
//! come before longer ones. Results are memoized in a FIFO cache keyed by
//! `"<prefix>|<limit>"`.

use crate::cache::FifoCache;
use std::collections::VecDeque;

pub const MAX_WORD_LEN: usize = 25;
const ALPHABET_LEN: usize = 26;
const PREFIX_CACHE_CAPACITY: usize = 1000;

#[derive(Default)]
struct Node {
    children: [Option<Box<Node>>; ALPHABET_LEN],
    is_end: bool,
}

pub struct Trie {
    root: Node,
    cache: FifoCache<Vec<String>>,
}

impl Trie {
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            cache: FifoCache::new(PREFIX_CACHE_CAPACITY),
        }
    }

    /// Insert `word`. Empty words, words longer than [`MAX_WORD_LEN`], and
    /// words containing anything but lowercase ASCII letters are ignored.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() || word.len() > MAX_WORD_LEN {
            return;
        }
        let Some(indices) = word
            .bytes()
            .map(letter_index)
            .collect::<Option<Vec<usize>>>()
        else {
            return;
        };
        let mut node = &mut self.root;
        for idx in indices {
            node = node.children[idx].get_or_insert_with(Box::default);
        }
        node.is_end = true;
    }

    /// Up to `limit` indexed words starting with `prefix`. An empty prefix
    /// yields nothing.
    pub fn starts_with(&mut self, prefix: &str, limit: usize) -> Vec<String> {
        let cache_key = format!("{prefix}|{limit}");
        if let Some(hit) = self.cache.get(&cache_key) {
            return hit.clone();
        }
        let results = self.enumerate(prefix, limit);
        self.cache.insert(cache_key, results.clone());
        results
    }

    fn enumerate(&self, prefix: &str, limit: usize) -> Vec<String> {
        let mut results = Vec::new();
        if prefix.is_empty() || limit == 0 {
            return results;
        }
        let mut node = &self.root;
        for byte in prefix.bytes() {
            let Some(idx) = letter_index(byte) else {
                return results;
            };
            match &node.children[idx] {
                Some(child) => node = child,
                None => return results,
            }
        }
        let mut queue: VecDeque<(&Node, String)> = VecDeque::new();
        queue.push_back((node, prefix.to_string()));
        while let Some((node, word)) = queue.pop_front() {
            if results.len() >= limit {
                break;
            }
            if node.is_end {
                results.push(word.clone());
            }
            for (i, child) in node.children.iter().enumerate() {
                if results.len() >= limit {
                    break;
                }
                if let Some(child) = child {
                    let mut next = word.clone();
                    next.push((b'a' + i as u8) as char);
                    queue.push_back((child, next));
                }
            }
        }
        results
    }

    /// Drop every word and flush the prefix cache.
    pub fn clear(&mut self) {
        self.root = Node::default();
        self.cache.clear();
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

fn letter_index(byte: u8) -> Option<usize> {
    byte.is_ascii_lowercase().then(|| (byte - b'a') as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trie_with(words: &[&str]) -> Trie {
        let mut trie = Trie::new();
        for word in words {
            trie.insert(word);
        }
        trie
    }

    #[test]
    fn suggestions_share_the_prefix() {
        let mut trie = trie_with(&["program", "programming", "programmer", "pragma"]);
        let results = trie.starts_with("prog", 10);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|w| w.starts_with("prog")));
        assert!(!results.contains(&"pragma".to_string()));
    }

    #[test]
    fn limit_caps_results() {
        let mut trie = trie_with(&["program", "programming", "programmer", "pragma"]);
        let results = trie.starts_with("prog", 2);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|w| w.starts_with("prog")));
    }

    #[test]
    fn breadth_first_shortest_completions_first() {
        let mut trie = trie_with(&["car", "card", "cart", "carpet"]);
        let results = trie.starts_with("car", 10);
        assert_eq!(results, vec!["car", "card", "cart", "carpet"]);
    }

    #[test]
    fn missing_prefix_and_empty_prefix_yield_nothing() {
        let mut trie = trie_with(&["apple"]);
        assert!(trie.starts_with("b", 10).is_empty());
        assert!(trie.starts_with("", 10).is_empty());
    }

    #[test]
    fn exact_word_is_its_own_completion() {
        let mut trie = trie_with(&["apple"]);
        assert_eq!(trie.starts_with("apple", 10), vec!["apple"]);
    }

    #[test]
    fn rejects_invalid_words() {
        let mut trie = Trie::new();
        trie.insert("");
        trie.insert("abc123");
        trie.insert("Upper");
        trie.insert(&"x".repeat(26));
        assert!(trie.starts_with("a", 10).is_empty());
        assert!(trie.starts_with("u", 10).is_empty());
        assert!(trie.starts_with("x", 10).is_empty());
    }

    #[test]
    fn cached_result_is_stable_across_calls() {
        let mut trie = trie_with(&["alpha", "alphabet"]);
        let first = trie.starts_with("alp", 10);
        let second = trie.starts_with("alp", 10);
        assert_eq!(first, second);
    }

    #[test]
    fn clear_drops_words() {
        let mut trie = trie_with(&["alpha"]);
        assert!(!trie.starts_with("al", 10).is_empty());
        trie.clear();
        assert!(trie.starts_with("al", 10).is_empty());
    }
}
