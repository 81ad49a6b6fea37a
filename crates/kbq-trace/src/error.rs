use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("no trace found with id {0:?}")]
    NotFound(String),
}
