use kbq_extract::ExtractError;
use kbq_index::IndexError;
use kbq_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("project {0:?} not found or inactive")]
    ProjectNotFound(String),
}
