use thiserror::Error;

/// Every variant maps to one of the source spec's four failure modes;
/// `MissingCredential`, `InvalidCredential`, and `Expired` are all
/// "unauthenticated", `InsufficientScope` is "forbidden" — the distinction
/// is left to the caller mapping this onto transport-level status codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credential presented")]
    MissingCredential,

    #[error("credential malformed or unverifiable: {0}")]
    InvalidCredential(String),

    #[error("credential expired")]
    Expired,

    #[error("session lacks required scope: {0}")]
    InsufficientScope(String),
}
