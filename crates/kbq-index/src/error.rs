use kbq_embeddings::EmbeddingError;
use kbq_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("failed to (de)serialize an index artifact: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no published index version exists for this project")]
    NoSnapshot,
}
