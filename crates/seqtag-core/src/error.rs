use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while building a labeled dataset.
#[derive(Debug, Error)]
pub enum SeqtagError {
    /// A data line did not split into exactly a token and a label.
    #[error("{path}:{line}: expected `<token> <label>`, got {content:?}")]
    Format {
        /// The data file being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// A data line used a label that the schema does not define.
    #[error("{path}:{line}: label {label:?} is not defined in the schema")]
    UnknownLabel {
        /// The data file being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The label as written in the file.
        label: String,
    },

    /// A vocabulary, schema, tokenizer or data file does not exist.
    #[error("file not found: {path}")]
    MissingFile {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The configuration is inconsistent or ambiguous.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The vocabulary has no `[UNK]` entry to fall back on.
    #[error("vocabulary {} has no [UNK] token", origin(.path))]
    MissingUnknownToken {
        /// The vocabulary file, `None` for in-memory vocabularies.
        path: Option<PathBuf>,
    },

    /// The label schema is not a bijection onto non-negative ids.
    #[error("invalid label schema: {0}")]
    InvalidSchema(String),

    /// The subword tokenizer failed to load or encode.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Candle tensor construction failed.
    #[error("tensor error: {0}")]
    Candle(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for seqtag operations.
pub type Result<T> = std::result::Result<T, SeqtagError>;

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map_or_else(|| "<memory>".to_string(), |p| p.display().to_string())
}

/// Read a whole file, reporting a missing file as [`SeqtagError::MissingFile`].
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SeqtagError::MissingFile {
            path: path.to_path_buf(),
        },
        _ => SeqtagError::Io(e),
    })
}
