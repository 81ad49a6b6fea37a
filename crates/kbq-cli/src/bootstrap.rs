use std::sync::Arc;

use kbq_auth::{AuthGate, InMemorySessionStore};
use kbq_config::{KbqConfig, StorageType};
use kbq_content::ContentAPI;
use kbq_embeddings::Embedder;
use kbq_extract::ExtractorRegistry;
use kbq_index::IndexManager;
use kbq_orchestrator::QueryOrchestrator;
use kbq_storage::{LocalFsStorage, Storage};
use kbq_trace::TraceRing;
use tracing::{info, warn};

use crate::services::Services;

/// Builds the concrete `Storage` backend for `config.storage.storage_type`.
///
/// Only the local filesystem backend is implemented in this workspace;
/// `fileshare`/`blob`/`doc_db` fall back to it with a warning rather than
/// failing startup, the same fallback-ladder posture the rest of this
/// service takes toward optional backends.
fn build_storage(config: &KbqConfig) -> Arc<dyn Storage> {
    match config.storage.storage_type {
        StorageType::File => {}
        other => warn!(?other, "storage backend not implemented in this build, using local filesystem"),
    }
    Arc::new(LocalFsStorage::new(config.storage.root.clone()))
}

#[cfg_attr(not(feature = "fastembed"), allow(unused_variables))]
fn build_embedder(config: &KbqConfig) -> anyhow::Result<Option<Arc<dyn Embedder>>> {
    #[cfg(feature = "fastembed")]
    {
        if config.embedder_model.is_empty() {
            info!("no EMBEDDER_MODEL configured, dense search disabled");
            return Ok(None);
        }
        info!(model = %config.embedder_model, "loading fastembed model (custom model names beyond the default are not yet mapped)");
        let embedder = kbq_embeddings::FastEmbedder::new()?;
        Ok(Some(Arc::new(embedder) as Arc<dyn Embedder>))
    }
    #[cfg(not(feature = "fastembed"))]
    {
        Ok(None)
    }
}

/// Wires every process-wide singleton from resolved configuration.
///
/// # Errors
///
/// Returns an error if the embedder fails to initialize (only possible with
/// the `fastembed` feature enabled).
pub async fn build_services(config: &KbqConfig) -> anyhow::Result<Services> {
    let storage = build_storage(config);
    let embedder = build_embedder(config)?;

    let index = IndexManager::new(storage.clone(), embedder.clone());
    let sessions = Arc::new(InMemorySessionStore::default());
    let auth = AuthGate::new(config.auth.signing_key.clone(), config.auth.api_key.clone(), sessions);
    let extractors = ExtractorRegistry::with_defaults();
    let content = ContentAPI::new(storage.clone(), extractors, index.clone());
    let tools = kbq_tools::ToolRegistry::with_defaults();
    let model_name =
        if config.completer_model.is_empty() { None } else { Some(config.completer_model.clone()) };
    let orchestrator = QueryOrchestrator::new(storage.clone(), index.clone(), tools, embedder, None, model_name);
    let trace = Arc::new(TraceRing::new(
        config.limits.trace_max_records,
        i64::try_from(config.limits.trace_max_age_seconds).unwrap_or(i64::MAX),
    ));

    Ok(Services { storage, index, auth, content, orchestrator, trace })
}
