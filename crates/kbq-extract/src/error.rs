use thiserror::Error;

/// Errors from document extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported MIME type '{0}'")]
    UnsupportedMime(String),

    #[error("extracted text was empty")]
    EmptyContent,

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),
}
