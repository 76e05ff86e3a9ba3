//! # Subword Tokenization
//!
//! Wraps a pretrained HuggingFace tokenizer so that pre-split token lists are
//! encoded into fixed-length id sequences.

use std::path::{Path, PathBuf};

use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer as HfTokenizer, TruncationParams};
use tracing::debug;

use crate::error::{Result, SeqtagError};

/// File name looked up when a tokenizer directory is configured.
pub const TOKENIZER_FILE: &str = "tokenizer.json";

/// Encodes an already-split token list into exactly `max_length` ids.
pub trait SubwordTokenizer: Send + Sync {
    fn encode_pretokenized(&self, tokens: &[&str]) -> Result<Vec<u32>>;

    /// Length every returned sequence has.
    fn max_length(&self) -> usize;
}

/// [`SubwordTokenizer`] backed by a `tokenizer.json` file.
pub struct HfSubwordTokenizer {
    inner: HfTokenizer,
    max_length: usize,
    add_special_tokens: bool,
}

impl HfSubwordTokenizer {
    /// Load a tokenizer from a `tokenizer.json` file or a directory holding
    /// one, configured to pad and truncate to `max_length`.
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        max_length: usize,
        add_special_tokens: bool,
    ) -> Result<Self> {
        let file = resolve_tokenizer_file(path.as_ref());
        if !file.exists() {
            return Err(SeqtagError::MissingFile { path: file });
        }

        let inner =
            HfTokenizer::from_file(&file).map_err(|e| SeqtagError::Tokenizer(e.to_string()))?;
        let tokenizer = Self::new(inner, max_length, add_special_tokens)?;

        debug!(path = %file.display(), max_length, "loaded subword tokenizer");
        Ok(tokenizer)
    }

    /// Configure an in-memory tokenizer for fixed-length output.
    pub fn new(mut inner: HfTokenizer, max_length: usize, add_special_tokens: bool) -> Result<Self> {
        let (pad_id, pad_token) = match inner.get_padding() {
            Some(params) => (params.pad_id, params.pad_token.clone()),
            None => {
                let pad_token = "[PAD]".to_string();
                (inner.token_to_id(&pad_token).unwrap_or(0), pad_token)
            }
        };

        inner.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::Fixed(max_length),
            pad_id,
            pad_token,
            ..Default::default()
        }));
        inner
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| SeqtagError::Tokenizer(e.to_string()))?;

        Ok(Self {
            inner,
            max_length,
            add_special_tokens,
        })
    }

    /// Subword vocabulary size, including added tokens.
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }
}

impl SubwordTokenizer for HfSubwordTokenizer {
    fn encode_pretokenized(&self, tokens: &[&str]) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(tokens.to_vec(), self.add_special_tokens)
            .map_err(|e| SeqtagError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn max_length(&self) -> usize {
        self.max_length
    }
}

fn resolve_tokenizer_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(TOKENIZER_FILE)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Word-level tokenizer without special tokens; `[PAD]` is id 0.
    pub(crate) const WORD_LEVEL_JSON: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": null,
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"[PAD]": 0, "[UNK]": 1, "我": 2, "爱": 3, "北京": 4},
            "unk_token": "[UNK]"
        }
    }"#;

    pub(crate) fn tokenizer_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(TOKENIZER_FILE), WORD_LEVEL_JSON).unwrap();
        dir
    }

    #[test]
    fn test_pads_to_max_length() {
        let dir = tokenizer_dir();
        let tokenizer = HfSubwordTokenizer::from_path(dir.path(), 5, true).unwrap();
        let ids = tokenizer.encode_pretokenized(&["我", "爱", "北京"]).unwrap();
        assert_eq!(ids, vec![2, 3, 4, 0, 0]);
        assert_eq!(tokenizer.max_length(), 5);
    }

    #[test]
    fn test_truncates_beyond_max_length() {
        let dir = tokenizer_dir();
        let tokenizer = HfSubwordTokenizer::from_path(dir.path(), 2, true).unwrap();
        let ids = tokenizer.encode_pretokenized(&["我", "爱", "北京"]).unwrap();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_unknown_word() {
        let dir = tokenizer_dir();
        let file = dir.path().join(TOKENIZER_FILE);
        let tokenizer = HfSubwordTokenizer::from_path(&file, 3, false).unwrap();
        let ids = tokenizer.encode_pretokenized(&["上海"]).unwrap();
        assert_eq!(ids, vec![1, 0, 0]);
    }

    #[test]
    fn test_empty_input_is_all_padding() {
        let dir = tokenizer_dir();
        let tokenizer = HfSubwordTokenizer::from_path(dir.path(), 4, true).unwrap();
        assert_eq!(tokenizer.encode_pretokenized(&[]).unwrap(), vec![0; 4]);
    }

    #[test]
    fn test_missing_tokenizer() {
        let dir = tempfile::tempdir().unwrap();
        let err = HfSubwordTokenizer::from_path(dir.path(), 4, true).err().unwrap();
        assert!(matches!(err, SeqtagError::MissingFile { .. }));
    }
}
