use thiserror::Error;

/// Errors raised while assembling a [`crate::KbqConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}
