use kbq_index::IndexError;
use kbq_search::SearchError;
use kbq_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompleterError {
    #[error("completer timed out")]
    Timeout,

    #[error("completer upstream error: {0}")]
    Upstream(String),
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("project {0:?} not found or inactive")]
    ProjectNotFound(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
