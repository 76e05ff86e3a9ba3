//! # Word Segmentation
//!
//! Splits unsegmented text (typically Chinese) into words for word-level
//! vocabularies. The encoder only depends on the [`WordSegmenter`] trait, so
//! any external segmenter can be plugged in.

use std::collections::HashSet;

/// Splits text into an ordered sequence of words.
///
/// Implementations must cover the input: concatenating the returned words
/// gives back `text`.
pub trait WordSegmenter: Send + Sync {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Dictionary-driven forward maximum matching.
///
/// At each position the longest dictionary word starting there is taken;
/// characters that start no dictionary word become single-character words.
#[derive(Debug, Clone, Default)]
pub struct MaxMatchSegmenter {
    words: HashSet<String>,
    /// Longest dictionary word, in chars.
    max_chars: usize,
}

impl MaxMatchSegmenter {
    /// Create a segmenter over the given dictionary.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|w| !w.is_empty())
            .collect();
        let max_chars = words.iter().map(|w| w.chars().count()).max().unwrap_or(1);
        Self { words, max_chars }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSegmenter for MaxMatchSegmenter {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut words = Vec::new();
        let mut rest = text;

        while let Some(first) = rest.chars().next() {
            // Byte offsets of candidate word ends, shortest first.
            let ends: Vec<usize> = rest
                .char_indices()
                .skip(1)
                .map(|(i, _)| i)
                .chain(std::iter::once(rest.len()))
                .take(self.max_chars)
                .collect();

            let end = ends
                .iter()
                .rev()
                .find(|&&end| self.words.contains(&rest[..end]))
                .copied()
                .unwrap_or(first.len_utf8());

            words.push(&rest[..end]);
            rest = &rest[end..];
        }

        words
    }
}
