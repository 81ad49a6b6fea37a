//! Cross-cutting error types.
//!
//! `CoreError` is the error kind every request-handling layer ultimately
//! converts into — it mirrors the disposition table in the service design
//! (`NotFound`, `Unauthenticated`, `Forbidden`, ...). Crate-local error
//! enums (`StorageError`, `SearchError`, ...) convert into it at crate
//! boundaries via `From` impls defined alongside those enums.

use thiserror::Error;

/// Errors that can be raised by any crate in this workspace and surfaced to
/// a caller.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unsupported mime type: {0}")]
    UnsupportedMime(String),

    #[error("empty content")]
    EmptyContent,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Stable short tag for logging/tracing (`error.kind` field).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden(_) => "forbidden",
            Self::BadRequest(_) => "bad_request",
            Self::UnsupportedMime(_) => "unsupported_mime",
            Self::EmptyContent => "empty_content",
            Self::Conflict(_) => "conflict",
            Self::Timeout(_) => "timeout",
            Self::Other(_) => "internal",
        }
    }
}
