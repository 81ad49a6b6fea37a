use thiserror::Error;

/// Errors from a `Storage` backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{entity_type} '{id}' not found in project '{project_id}'")]
    NotFound {
        project_id: String,
        entity_type: &'static str,
        id: String,
    },

    #[error("project '{0}' not found")]
    ProjectNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
