//! # Loader Configuration
//!
//! Paths and sizes needed to build a dataset, plus the resolution of which
//! encoding mode they imply.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{read_file, Result, SeqtagError};

/// Which model family the data is prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Pretrained transformer fed by a subword tokenizer.
    Bert,
    /// Model with its own embedding table fed by vocabulary ids.
    #[default]
    Lstm,
}

/// Unit of vocabulary lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segmentation {
    Char,
    Word,
}

/// How input ids are produced, resolved once from [`LoaderConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingMode {
    /// Pre-split tokens go through the subword tokenizer.
    Subword,
    /// Each data-line token is a vocabulary lookup.
    Char,
    /// The sentence is segmented into words, each a vocabulary lookup.
    Word,
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingMode::Subword => write!(f, "subword"),
            EncodingMode::Char => write!(f, "char"),
            EncodingMode::Word => write!(f, "word"),
        }
    }
}

/// Vocabulary file names that imply a segmentation.
const WORD_VOCAB_FILE: &str = "words.txt";
const CHAR_VOCAB_FILE: &str = "chars.txt";

/// Configuration for loading a labeled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub model_type: ModelType,
    /// Character or word vocabulary, one token per line.
    pub vocab_path: PathBuf,
    /// JSON label schema.
    pub schema_path: PathBuf,
    /// `tokenizer.json`, or the directory containing it.
    pub pretrain_model_path: Option<PathBuf>,
    /// Overrides segmentation inferred from the vocabulary file name.
    pub segmentation: Option<Segmentation>,
    /// Fixed length of every encoded sequence.
    pub max_length: usize,
    pub batch_size: usize,
    /// Whether the subword tokenizer adds its special tokens.
    pub add_special_tokens: bool,
    /// Seed for shuffled batch order.
    pub shuffle_seed: Option<u64>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            model_type: ModelType::default(),
            vocab_path: PathBuf::from(CHAR_VOCAB_FILE),
            schema_path: PathBuf::from("schema.json"),
            pretrain_model_path: None,
            segmentation: None,
            max_length: 100,
            batch_size: 16,
            add_special_tokens: true,
            shuffle_seed: None,
        }
    }
}

impl LoaderConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON configuration file. Relative paths inside it stay as
    /// written (relative to the working directory).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = serde_json::from_str(&read_file(path.as_ref())?)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_model_type(mut self, model_type: ModelType) -> Self {
        self.model_type = model_type;
        self
    }

    pub fn with_vocab_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.vocab_path = path.into();
        self
    }

    pub fn with_schema_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.schema_path = path.into();
        self
    }

    pub fn with_pretrain_model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.pretrain_model_path = Some(path.into());
        self
    }

    pub fn with_segmentation(mut self, segmentation: Segmentation) -> Self {
        self.segmentation = Some(segmentation);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_special_tokens(mut self, enabled: bool) -> Self {
        self.add_special_tokens = enabled;
        self
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Check sizes and mode-specific requirements.
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(SeqtagError::Config("max_length must be positive".into()));
        }
        if self.batch_size == 0 {
            return Err(SeqtagError::Config("batch_size must be positive".into()));
        }
        self.encoding_mode().map(|_| ())
    }

    /// Resolve the encoding mode.
    ///
    /// BERT models always use the subword tokenizer. Otherwise an explicit
    /// `segmentation` wins, then the vocabulary file name decides:
    /// `words.txt` is word-level, `chars.txt` is character-level, and any
    /// other name is ambiguous.
    pub fn encoding_mode(&self) -> Result<EncodingMode> {
        match (self.model_type, self.segmentation) {
            (ModelType::Bert, _) => {
                if self.pretrain_model_path.is_none() {
                    return Err(SeqtagError::Config(
                        "model_type \"bert\" requires pretrain_model_path".into(),
                    ));
                }
                Ok(EncodingMode::Subword)
            }
            (ModelType::Lstm, Some(Segmentation::Char)) => Ok(EncodingMode::Char),
            (ModelType::Lstm, Some(Segmentation::Word)) => Ok(EncodingMode::Word),
            (ModelType::Lstm, None) => {
                let file_name = self.vocab_path.file_name().and_then(|n| n.to_str());
                match file_name {
                    Some(WORD_VOCAB_FILE) => Ok(EncodingMode::Word),
                    Some(CHAR_VOCAB_FILE) => Ok(EncodingMode::Char),
                    _ => Err(SeqtagError::Config(format!(
                        "cannot infer segmentation from vocabulary {}; set \"segmentation\" to \"char\" or \"word\"",
                        self.vocab_path.display()
                    ))),
                }
            }
        }
    }
}
