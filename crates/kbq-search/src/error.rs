use kbq_embeddings::EmbeddingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("embedding failed during index build or query: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("dense artifact dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
