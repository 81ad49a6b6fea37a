use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("model initialization failed: {0}")]
    InitFailed(String),

    #[error("embedding generation failed: {0}")]
    EmbedFailed(String),

    #[error("embedding model returned no vectors for a non-empty input")]
    EmptyResult,
}
