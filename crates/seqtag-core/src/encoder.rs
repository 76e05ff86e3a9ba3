//! # Sequence Encoder
//!
//! Turns one labeled example into a fixed-length `(input_ids, label_ids)`
//! pair. Inputs come either from a subword tokenizer or from vocabulary
//! lookups over characters or segmented words; labels are schema class ids
//! padded with [`IGNORE_LABEL`].

use std::fmt;

use tracing::debug;

use crate::config::{EncodingMode, LoaderConfig};
use crate::error::{Result, SeqtagError};
use crate::schema::{LabelSchema, IGNORE_LABEL};
use crate::segment::{MaxMatchSegmenter, WordSegmenter};
use crate::subword::{HfSubwordTokenizer, SubwordTokenizer};
use crate::vocab::{Vocabulary, PAD_ID, UNK_TOKEN};

/// One example ready for batching. Both sequences have the encoder's
/// `max_length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedExample {
    pub input_ids: Vec<u32>,
    pub label_ids: Vec<i64>,
}

/// Truncate `seq` to `max_length` and right-pad it with `pad`.
pub fn pad_to<T: Clone>(mut seq: Vec<T>, max_length: usize, pad: T) -> Vec<T> {
    seq.truncate(max_length);
    seq.resize(max_length, pad);
    seq
}

/// Source of input ids, fixed at construction.
enum InputEncoder {
    Subword(Box<dyn SubwordTokenizer>),
    Char(Vocabulary),
    Word {
        vocab: Vocabulary,
        segmenter: Box<dyn WordSegmenter>,
    },
}

/// Stateless per-example encoder over an immutable vocabulary and schema.
pub struct SequenceEncoder {
    inputs: InputEncoder,
    schema: LabelSchema,
    max_length: usize,
}

impl fmt::Debug for SequenceEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceEncoder")
            .field("mode", &self.mode())
            .field("max_length", &self.max_length)
            .field("labels", &self.schema.len())
            .finish()
    }
}

impl SequenceEncoder {
    /// Character-level vocabulary encoder.
    pub fn chars(vocab: Vocabulary, schema: LabelSchema, max_length: usize) -> Self {
        Self {
            inputs: InputEncoder::Char(vocab),
            schema,
            max_length,
        }
    }

    /// Word-level vocabulary encoder; sentences are split by `segmenter`.
    pub fn words<S>(vocab: Vocabulary, segmenter: S, schema: LabelSchema, max_length: usize) -> Self
    where
        S: WordSegmenter + 'static,
    {
        Self {
            inputs: InputEncoder::Word {
                vocab,
                segmenter: Box::new(segmenter),
            },
            schema,
            max_length,
        }
    }

    /// Subword encoder; `max_length` is taken from the tokenizer.
    pub fn subword<T>(tokenizer: T, schema: LabelSchema) -> Self
    where
        T: SubwordTokenizer + 'static,
    {
        let max_length = tokenizer.max_length();
        Self {
            inputs: InputEncoder::Subword(Box::new(tokenizer)),
            schema,
            max_length,
        }
    }

    /// Load the schema plus the vocabulary or tokenizer the configuration
    /// selects. Word mode segments with a [`MaxMatchSegmenter`] over the
    /// word vocabulary.
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        config.validate()?;
        let mode = config.encoding_mode()?;
        let schema = LabelSchema::from_file(&config.schema_path)?;

        let encoder = match mode {
            EncodingMode::Subword => {
                let path = config.pretrain_model_path.as_ref().ok_or_else(|| {
                    SeqtagError::Config("subword mode requires pretrain_model_path".into())
                })?;
                let tokenizer =
                    HfSubwordTokenizer::from_path(path, config.max_length, config.add_special_tokens)?;
                Self::subword(tokenizer, schema)
            }
            EncodingMode::Char => {
                let vocab = Vocabulary::from_file(&config.vocab_path)?;
                Self::chars(vocab, schema, config.max_length)
            }
            EncodingMode::Word => {
                let vocab = Vocabulary::from_file(&config.vocab_path)?;
                let segmenter =
                    MaxMatchSegmenter::new(vocab.tokens().filter(|t| *t != UNK_TOKEN));
                Self::words(vocab, segmenter, schema, config.max_length)
            }
        };

        debug!(mode = %mode, max_length = config.max_length, "built sequence encoder");
        Ok(encoder)
    }

    pub fn mode(&self) -> EncodingMode {
        match self.inputs {
            InputEncoder::Subword(_) => EncodingMode::Subword,
            InputEncoder::Char(_) => EncodingMode::Char,
            InputEncoder::Word { .. } => EncodingMode::Word,
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn schema(&self) -> &LabelSchema {
        &self.schema
    }

    /// The lookup vocabulary; `None` in subword mode.
    pub fn vocab(&self) -> Option<&Vocabulary> {
        match &self.inputs {
            InputEncoder::Subword(_) => None,
            InputEncoder::Char(vocab) | InputEncoder::Word { vocab, .. } => Some(vocab),
        }
    }

    /// Encode one example: `tokens` and `labels` (schema class ids) are
    /// aligned and of equal length.
    pub fn encode<S: AsRef<str>>(&self, tokens: &[S], labels: &[i64]) -> Result<EncodedExample> {
        let input_ids = match &self.inputs {
            InputEncoder::Subword(tokenizer) => {
                let tokens: Vec<&str> = tokens.iter().map(|t| t.as_ref()).collect();
                tokenizer.encode_pretokenized(&tokens)?
            }
            // One id per data line, so inputs stay aligned with labels.
            InputEncoder::Char(vocab) => pad_to(vocab.encode_tokens(tokens), self.max_length, PAD_ID),
            InputEncoder::Word { .. } => {
                let sentence = tokens.iter().map(|t| t.as_ref()).collect::<Vec<&str>>().concat();
                self.encode_text(&sentence, true)?
            }
        };

        Ok(EncodedExample {
            input_ids,
            label_ids: self.encode_labels(labels),
        })
    }

    /// Truncate and pad class ids with [`IGNORE_LABEL`].
    pub fn encode_labels(&self, labels: &[i64]) -> Vec<i64> {
        pad_to(labels.to_vec(), self.max_length, IGNORE_LABEL)
    }

    /// Encode free text by vocabulary lookup, padded to `max_length` when
    /// `pad` is set. Char mode looks up each `char`; word mode segments
    /// first. Unavailable in subword mode.
    pub fn encode_text(&self, text: &str, pad: bool) -> Result<Vec<u32>> {
        let ids: Vec<u32> = match &self.inputs {
            InputEncoder::Char(vocab) => {
                let mut buf = [0u8; 4];
                text.chars()
                    .map(|c| vocab.id(c.encode_utf8(&mut buf)))
                    .collect()
            }
            InputEncoder::Word { vocab, segmenter } => segmenter
                .segment(text)
                .into_iter()
                .map(|word| vocab.id(word))
                .collect(),
            InputEncoder::Subword(_) => {
                return Err(SeqtagError::Config(
                    "free-text encoding needs a vocabulary; subword mode has none".into(),
                ));
            }
        };

        Ok(if pad {
            pad_to(ids, self.max_length, PAD_ID)
        } else {
            ids
        })
    }

    /// Map vocabulary ids back to tokens, skipping padding and `[UNK]`.
    /// Subword mode decodes to nothing.
    pub fn decode(&self, ids: &[u32]) -> Vec<&str> {
        let Some(vocab) = self.vocab() else {
            return Vec::new();
        };
        ids.iter()
            .filter(|&&id| id != PAD_ID && id != vocab.unk_id())
            .filter_map(|&id| vocab.token(id))
            .collect()
    }
}
