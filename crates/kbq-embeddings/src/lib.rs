//! # kbq-embeddings
//!
//! Pluggable text-to-vector embedding behind the [`Embedder`] trait.
//! `kbq-search::index`'s `DenseProvider` only exists when an `Embedder` is
//! configured; its absence is not an error anywhere in this workspace —
//! dense search is simply skipped and the retriever falls back to sparse
//! and basic matching.

mod error;
#[cfg(feature = "fastembed")]
mod fast;

pub use error::EmbeddingError;
#[cfg(feature = "fastembed")]
pub use fast::FastEmbedder;

use async_trait::async_trait;

/// Converts text into fixed-dimension vectors for cosine-similarity search.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a batch of texts, preserving input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimensionality of vectors this embedder produces.
    fn dimensions(&self) -> usize;
}
