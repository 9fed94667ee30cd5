use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Entry key must be non-empty")]
    EmptyKey,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Embedding batch size mismatch: expected {expected} vectors, got {actual}")]
    BatchMismatch { expected: usize, actual: usize },

    #[error("Unknown distance metric '{0}' (expected 'pearson' or 'cosine')")]
    UnknownMetric(String),
}
