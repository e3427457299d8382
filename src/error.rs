//! Error types for corpus loading, training and evaluation.

use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The corpus, or the training split carved out of it, has no documents.
    #[error("empty corpus: {0}")]
    EmptyCorpus(String),

    /// The test split has no documents, so no statistics can be derived.
    #[error("test split is empty; lower the training fraction or add documents")]
    EmptyTestSet,

    /// A category has no training documents and its prior would be zero.
    #[error("category '{category}' has no training documents")]
    DegenerateCategory { category: String },

    /// Every category was excluded, nothing is left to classify against.
    #[error("no category with a non-zero prior is available")]
    NoCandidateCategories,

    /// A row of the corpus file could not be turned into a document.
    #[error("malformed corpus row at line {line}: {message}")]
    CorpusFormat { line: u64, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
