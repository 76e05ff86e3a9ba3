//! Data loading for character-labeled NER files.
//!
//! The format is one `<token> <label>` pair per line, with examples
//! separated by empty lines:
//!
//! ```text
//! 我 O
//! 爱 O
//! 北 B-LOC
//! 京 I-LOC
//!
//! 你 O
//! ```

use std::ops::Index;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::LoaderConfig;
use crate::encoder::{EncodedExample, SequenceEncoder};
use crate::error::{read_file, Result, SeqtagError};
use crate::schema::LabelSchema;

/// Path reported for datasets built from in-memory text.
const MEMORY_SOURCE: &str = "<memory>";

/// A single raw example: aligned tokens and schema class ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Example {
    pub tokens: Vec<String>,
    pub labels: Vec<i64>,
}

impl Example {
    pub fn new(tokens: Vec<String>, labels: Vec<i64>) -> Self {
        Self { tokens, labels }
    }

    /// The tokens concatenated back into running text.
    pub fn sentence(&self) -> String {
        self.tokens.concat()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Parse labeled text into examples, mapping labels through `schema`.
///
/// Empty lines end an example; whitespace-only lines are skipped. Runs of
/// empty lines never produce empty examples. `path` is only used in errors.
pub fn parse_examples(text: &str, path: &Path, schema: &LabelSchema) -> Result<Vec<Example>> {
    let mut examples = Vec::new();
    let mut current = Example::default();

    for (index, line) in text.lines().enumerate() {
        if line.is_empty() {
            if !current.is_empty() {
                examples.push(std::mem::take(&mut current));
            }
            continue;
        }

        let mut fields = line.split_whitespace();
        let (token, label) = match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => continue,
            (Some(token), Some(label), None) => (token, label),
            _ => {
                return Err(SeqtagError::Format {
                    path: path.to_path_buf(),
                    line: index + 1,
                    content: line.to_string(),
                });
            }
        };

        let label_id = schema.id(label).ok_or_else(|| SeqtagError::UnknownLabel {
            path: path.to_path_buf(),
            line: index + 1,
            label: label.to_string(),
        })?;

        current.tokens.push(token.to_string());
        current.labels.push(label_id);
    }

    // Don't forget the last example
    if !current.is_empty() {
        examples.push(current);
    }

    Ok(examples)
}

/// Ordered, indexable collection of encoded examples.
///
/// Everything is read and encoded at construction; entries are never
/// modified afterwards.
#[derive(Debug)]
pub struct NerDataset {
    encoder: SequenceEncoder,
    examples: Vec<EncodedExample>,
    sentences: Vec<String>,
}

impl NerDataset {
    /// Build the encoder described by `config` and load `path` with it.
    pub fn load<P: AsRef<Path>>(path: P, config: &LoaderConfig) -> Result<Self> {
        let encoder = SequenceEncoder::from_config(config)?;
        Self::from_file(path, encoder)
    }

    /// Load and encode a data file.
    pub fn from_file<P: AsRef<Path>>(path: P, encoder: SequenceEncoder) -> Result<Self> {
        let path = path.as_ref();
        let text = read_file(path)?;
        Self::build(&text, path, encoder)
    }

    /// Parse and encode in-memory text.
    pub fn from_text(text: &str, encoder: SequenceEncoder) -> Result<Self> {
        Self::build(text, &PathBuf::from(MEMORY_SOURCE), encoder)
    }

    fn build(text: &str, path: &Path, encoder: SequenceEncoder) -> Result<Self> {
        let raw = parse_examples(text, path, encoder.schema())?;

        let mut examples = Vec::with_capacity(raw.len());
        let mut sentences = Vec::with_capacity(raw.len());
        let mut truncated = 0usize;

        for example in &raw {
            if example.len() > encoder.max_length() {
                truncated += 1;
            }
            examples.push(encoder.encode(example.tokens.as_slice(), &example.labels)?);
            sentences.push(example.sentence());
        }

        info!(
            path = %path.display(),
            examples = examples.len(),
            truncated,
            mode = %encoder.mode(),
            max_length = encoder.max_length(),
            "loaded dataset"
        );

        Ok(Self {
            encoder,
            examples,
            sentences,
        })
    }

    /// Number of examples.
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EncodedExample> {
        self.examples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EncodedExample> {
        self.examples.iter()
    }

    /// Raw text of each example, in dataset order.
    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn encoder(&self) -> &SequenceEncoder {
        &self.encoder
    }

    /// Number of distinct vocabulary tokens, for sizing an embedding table.
    /// `None` in subword mode.
    pub fn vocab_size(&self) -> Option<usize> {
        self.encoder.vocab().map(|v| v.len())
    }
}

impl Index<usize> for NerDataset {
    type Output = EncodedExample;

    fn index(&self, index: usize) -> &Self::Output {
        &self.examples[index]
    }
}

impl<'a> IntoIterator for &'a NerDataset {
    type Item = &'a EncodedExample;
    type IntoIter = std::slice::Iter<'a, EncodedExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}
