use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("no tool registered under the name {0:?}")]
    NotFound(String),
}
