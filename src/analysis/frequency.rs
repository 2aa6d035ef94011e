//! Word counting over collections of texts
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::text_processing::preprocessing::is_stopword;

/// Word counts with first-seen ordering
///
/// `most_common` sorts by count descending and breaks ties by the order in
/// which words were first counted, so results are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencies {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

/// One word and its count in two corpora
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub word: String,
    pub count1: usize,
    pub count2: usize,
}

impl WordFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count whitespace-separated words across `texts`
    pub fn from_texts<S: AsRef<str>>(texts: &[S], remove_stopwords: bool) -> Self {
        let mut frequencies = Self::new();
        for text in texts {
            for word in text.as_ref().split_whitespace() {
                // Stopwords match in any case; counted words keep their case
                if remove_stopwords && is_stopword(&word.to_lowercase()) {
                    continue;
                }
                frequencies.add(word, 1);
            }
        }
        frequencies
    }

    pub fn add(&mut self, word: &str, count: usize) {
        match self.index.get(word) {
            Some(&i) => self.entries[i].1 += count,
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push((word.to_string(), count));
            }
        }
    }

    pub fn get(&self, word: &str) -> usize {
        self.index
            .get(word)
            .map(|&i| self.entries[i].1)
            .unwrap_or(0)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Words in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(word, count)| (word.as_str(), *count))
    }

    /// Top `n` words, highest count first
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut sorted = self.entries.clone();
        // stable sort keeps first-seen order among equal counts
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }

    /// Sum of both counters; words new to `self` are appended in `other`'s order
    pub fn merged(&self, other: &WordFrequencies) -> WordFrequencies {
        let mut merged = self.clone();
        for (word, count) in other.iter() {
            merged.add(word, count);
        }
        merged
    }
}

/// Top `top_n` words by combined count, with each corpus's count
///
/// Stopwords are excluded from both corpora.
pub fn compare<S: AsRef<str>>(texts1: &[S], texts2: &[S], top_n: usize) -> Vec<ComparisonRow> {
    let freq1 = WordFrequencies::from_texts(texts1, true);
    let freq2 = WordFrequencies::from_texts(texts2, true);

    freq1
        .merged(&freq2)
        .most_common(top_n)
        .into_iter()
        .map(|(word, _)| ComparisonRow {
            count1: freq1.get(&word),
            count2: freq2.get(&word),
            word,
        })
        .collect()
}
