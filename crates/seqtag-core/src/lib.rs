//! # Seqtag Core
//!
//! Prepares character-labeled NER data for training: loads a vocabulary and
//! a label schema, encodes every example into fixed-length input and label id
//! sequences, and serves them in batches.
//!
//! ## Quick Start
//!
//! ```rust
//! use seqtag_core::{LabelSchema, NerDataset, SequenceEncoder, Vocabulary};
//!
//! let vocab = Vocabulary::from_lines(["[UNK]", "我", "爱"]).unwrap();
//! let schema = LabelSchema::from_json(r#"{"O": 0, "B-LOC": 1}"#).unwrap();
//! let encoder = SequenceEncoder::chars(vocab, schema, 5);
//!
//! let dataset = NerDataset::from_text("我 O\n爱 O\n", encoder).unwrap();
//! assert_eq!(dataset[0].input_ids, vec![2, 3, 0, 0, 0]);
//! assert_eq!(dataset[0].label_ids, vec![0, 0, -1, -1, -1]);
//! ```
pub mod config;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod loader;
pub mod schema;
pub mod segment;
pub mod subword;
pub mod vocab;

// Re-export primary API
pub use config::{EncodingMode, LoaderConfig, ModelType, Segmentation};
pub use dataset::{parse_examples, Example, NerDataset};
pub use encoder::{pad_to, EncodedExample, SequenceEncoder};
pub use error::{Result, SeqtagError};
pub use loader::{load_data, Batch, Batches, DataLoader};
pub use schema::{LabelSchema, IGNORE_LABEL};
pub use segment::{MaxMatchSegmenter, WordSegmenter};
pub use subword::{HfSubwordTokenizer, SubwordTokenizer};
pub use vocab::{Vocabulary, PAD_ID, UNK_TOKEN};
