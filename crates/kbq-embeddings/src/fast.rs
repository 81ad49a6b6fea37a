use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use crate::{Embedder, EmbeddingError};

const DIMENSIONS: usize = 384;

fn cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".kbq")
        .join("cache")
        .join("fastembed")
}

/// `Embedder` backed by `fastembed`'s local ONNX runtime — no external API
/// key, configured via `EMBEDDER_MODEL` (opaque to `kbq-core`, interpreted
/// here as a `fastembed::EmbeddingModel` name).
///
/// `fastembed`'s `embed` call is synchronous and `&mut self`; it's wrapped in
/// an `Arc<Mutex<_>>` and run via `spawn_blocking` so `Embedder::embed` stays
/// async without blocking the executor.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Loads the default model (`AllMiniLML6V2`, 384-dim).
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::InitFailed` if the model cannot be loaded or
    /// downloaded.
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::with_model(EmbeddingModel::AllMiniLML6V2)
    }

    /// Loads a specific `fastembed` model, cached under `~/.kbq/cache/fastembed`.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::InitFailed` if the model cannot be loaded or
    /// downloaded.
    pub fn with_model(model: EmbeddingModel) -> Result<Self, EmbeddingError> {
        let options = TextInitOptions::new(model)
            .with_cache_dir(cache_dir())
            .with_show_download_progress(false);
        let text_embedding = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;
        Ok(Self {
            model: Arc::new(Mutex::new(text_embedding)),
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let texts = texts.to_vec();
        let model = Arc::clone(&self.model);
        let embeddings = tokio::task::spawn_blocking(move || {
            let mut guard = model.lock().expect("embedding model lock poisoned");
            guard.embed(texts, None)
        })
        .await
        .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))?
        .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))?;

        if embeddings.is_empty() {
            return Err(EmbeddingError::EmptyResult);
        }

        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }
}
