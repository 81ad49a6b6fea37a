//! # kbq-extract
//!
//! Converts uploaded bytes + MIME type into ordered, chunked text via the
//! [`Extractor`] trait. `PlainTextExtractor` always ships; `PdfExtractor`
//! and `DocxExtractor` are gated behind the `pdf`/`docx` features and are
//! simply absent — not erroring — when those features aren't compiled in,
//! so an upload of that MIME type fails with `UnsupportedMime` exactly as
//! it would with no extractor registered at all.

pub mod chunk;
mod error;
mod extractors;
mod registry;

pub use error::ExtractError;
pub use extractors::PlainTextExtractor;
#[cfg(feature = "docx")]
pub use extractors::DocxExtractor;
#[cfg(feature = "pdf")]
pub use extractors::PdfExtractor;
pub use registry::ExtractorRegistry;

use async_trait::async_trait;

/// One chunk of extracted text, ready for `kbq-core::identity::mint`-based
/// KB record id assignment at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedChunk {
    pub chunk_index: u32,
    pub text: String,
}

/// Metadata accompanying a successful extraction, independent of chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractedMeta {
    pub page_count: Option<u32>,
    pub word_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub chunks: Vec<ExtractedChunk>,
    pub meta: ExtractedMeta,
}

/// Converts raw bytes of a declared MIME type into normalized text chunks.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Whether this extractor handles the given MIME type.
    fn can_handle(&self, mime: &str) -> bool;

    /// Extracts and chunks `bytes`. `desired_title` is metadata only — it
    /// does not affect chunk boundaries.
    async fn extract(
        &self,
        bytes: &[u8],
        mime: &str,
        desired_title: &str,
    ) -> Result<ExtractedDocument, ExtractError>;
}
