//! # Token Vocabulary
//!
//! Maps characters or words to dense integer ids read from a plain-text
//! vocabulary file, one token per line. Id 0 is reserved for padding, so the
//! token on line *k* receives id *k*.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{read_file, Result, SeqtagError};

/// Padding id for vocabulary-encoded input.
pub const PAD_ID: u32 = 0;

/// Token every out-of-vocabulary unit maps to.
pub const UNK_TOKEN: &str = "[UNK]";

/// Immutable token → id table.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    token_to_id: HashMap<String, u32>,
    /// `id_to_token[id - 1]` is the token on line `id`.
    id_to_token: Vec<String>,
    unk_id: u32,
}

impl Vocabulary {
    /// Load a vocabulary file.
    ///
    /// Each line is trimmed; a token listed twice keeps the id of its last
    /// occurrence. Fails if the file is missing or has no `[UNK]` line.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_file(path)?;
        let vocab = Self::from_lines(content.lines()).map_err(|_| {
            SeqtagError::MissingUnknownToken {
                path: Some(path.to_path_buf()),
            }
        })?;

        debug!(path = %path.display(), tokens = vocab.len(), "loaded vocabulary");
        Ok(vocab)
    }

    /// Build a vocabulary from lines in id order.
    ///
    /// Fails with [`SeqtagError::MissingUnknownToken`] when no line is `[UNK]`.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut token_to_id = HashMap::new();
        let mut id_to_token = Vec::new();

        for (index, line) in lines.into_iter().enumerate() {
            let token = line.as_ref().trim().to_string();
            let id = index as u32 + 1;
            if let Some(previous) = token_to_id.insert(token.clone(), id) {
                warn!(token = %token, previous, id, "duplicate vocabulary token");
            }
            id_to_token.push(token);
        }

        let unk_id = *token_to_id
            .get(UNK_TOKEN)
            .ok_or(SeqtagError::MissingUnknownToken { path: None })?;
        Ok(Self {
            token_to_id,
            id_to_token,
            unk_id,
        })
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.token_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_to_id.is_empty()
    }

    /// Id of `[UNK]`.
    pub fn unk_id(&self) -> u32 {
        self.unk_id
    }

    /// Id of `token`, falling back to `[UNK]`.
    pub fn id(&self, token: &str) -> u32 {
        self.token_to_id.get(token).copied().unwrap_or(self.unk_id)
    }

    /// Whether `token` has its own entry.
    pub fn contains(&self, token: &str) -> bool {
        self.token_to_id.contains_key(token)
    }

    /// Token on line `id`, or `None` for padding and out-of-range ids.
    pub fn token(&self, id: u32) -> Option<&str> {
        let index = (id as usize).checked_sub(1)?;
        self.id_to_token.get(index).map(String::as_str)
    }

    /// Look up an already-split token list without padding.
    pub fn encode_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens.iter().map(|t| self.id(t.as_ref())).collect()
    }

    /// All tokens, in id order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.id_to_token.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> Vocabulary {
        Vocabulary::from_lines(["[UNK]", "我", "爱"]).unwrap()
    }

    #[test]
    fn test_ids_follow_line_order() {
        let vocab = sample();
        assert_eq!(vocab.id("[UNK]"), 1);
        assert_eq!(vocab.id("我"), 2);
        assert_eq!(vocab.id("爱"), 3);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn test_unknown_token_maps_to_unk_not_padding() {
        let vocab = sample();
        assert_eq!(vocab.id("你"), vocab.unk_id());
        assert_ne!(vocab.id("你"), PAD_ID);
        assert!(!vocab.contains("你"));
    }

    #[test]
    fn test_inverse_lookup() {
        let vocab = sample();
        assert_eq!(vocab.token(2), Some("我"));
        assert_eq!(vocab.token(PAD_ID), None);
        assert_eq!(vocab.token(4), None);
    }

    #[test]
    fn test_duplicate_keeps_last_id() {
        let vocab = Vocabulary::from_lines(["[UNK]", "a", "b", "a"]).unwrap();
        assert_eq!(vocab.id("a"), 4);
        assert_eq!(vocab.len(), 3);
        // the orphaned line still decodes
        assert_eq!(vocab.token(2), Some("a"));
    }

    #[test]
    fn test_lines_are_trimmed() {
        let vocab = Vocabulary::from_lines(["[UNK]\r", "  x  "]).unwrap();
        assert_eq!(vocab.id("x"), 2);
        assert_eq!(vocab.unk_id(), 1);
    }

    #[test]
    fn test_missing_unk_is_rejected() {
        let err = Vocabulary::from_lines(["a", "b"]).unwrap_err();
        assert!(matches!(err, SeqtagError::MissingUnknownToken { path: None }));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "a\nb").unwrap();
        let err = Vocabulary::from_file(file.path()).unwrap_err();
        assert!(matches!(err, SeqtagError::MissingUnknownToken { path: Some(_) }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[UNK]\n我\n爱\n").unwrap();
        let vocab = Vocabulary::from_file(file.path()).unwrap();
        assert_eq!(vocab.encode_tokens(&["我", "爱", "你"]), vec![2, 3, 1]);
    }

    #[test]
    fn test_missing_file() {
        let err = Vocabulary::from_file("/no/such/chars.txt").unwrap_err();
        assert!(matches!(err, SeqtagError::MissingFile { .. }));
    }
}
