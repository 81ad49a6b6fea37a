use chrono::Utc;
use kbq_core::entities::{ArtifactKind, BuildAttempt, BuildOutcome, BuildState, IndexVersion};
use kbq_embeddings::Embedder;
use kbq_search::index::{build_basic, build_dense, build_sparse, record_fingerprint, IndexableRecord};
use kbq_storage::Storage;
use tracing::{info, warn};

use crate::error::IndexError;

/// Denormalizes a project's current FAQ and KB records into the flat
/// representation the indexer and retriever share.
pub(crate) async fn load_records(
    storage: &dyn Storage,
    pid: &str,
) -> Result<Vec<IndexableRecord>, IndexError> {
    let faqs = storage.list_faqs(pid).await?;
    let kb = storage.list_kb(pid).await?;
    let mut records: Vec<IndexableRecord> = faqs.iter().map(IndexableRecord::from).collect();
    records.extend(kb.iter().map(IndexableRecord::from));
    Ok(records)
}

enum Outcome {
    Published,
    Skipped,
}

async fn run(
    storage: &dyn Storage,
    embedder: Option<&dyn Embedder>,
    pid: &str,
    current_version: u64,
) -> Result<Outcome, IndexError> {
    let records = load_records(storage, pid).await?;
    let fingerprint = record_fingerprint(&records);

    if let Some(published) = storage.get_index_version(pid).await? {
        if published.record_fingerprint == fingerprint && published.version == current_version {
            return Ok(Outcome::Skipped);
        }
    }

    let dense = match embedder {
        Some(embedder) if !records.is_empty() => Some(build_dense(&records, embedder).await?),
        _ => None,
    };
    let sparse = build_sparse(&records);
    let basic = build_basic(&records);

    let version = current_version + 1;
    if let Some(dense) = &dense {
        storage
            .put_index_artifact(pid, version, ArtifactKind::Dense, serde_json::to_vec(dense)?)
            .await?;
    }
    storage
        .put_index_artifact(pid, version, ArtifactKind::Sparse, serde_json::to_vec(&sparse)?)
        .await?;
    storage
        .put_index_artifact(pid, version, ArtifactKind::Basic, serde_json::to_vec(&basic)?)
        .await?;

    let mut index_version = IndexVersion::new(pid, version, fingerprint);
    index_version.dense_artifact = dense.is_some();
    index_version.sparse_artifact = true;
    storage
        .put_index_artifact(
            pid,
            version,
            ArtifactKind::Meta,
            serde_json::to_vec(&index_version)?,
        )
        .await?;
    storage.put_index_version(pid, index_version).await?;

    Ok(Outcome::Published)
}

/// Runs one build attempt and folds its result into `state`, ready to be
/// persisted by the caller.
///
/// A build is skipped (not an error) when the current record fingerprint
/// matches the one already published at `state.current_version` — the
/// Indexer is pure, so nothing would change.
pub(crate) async fn build_once(
    storage: &dyn Storage,
    embedder: Option<&dyn Embedder>,
    pid: &str,
    mut state: BuildState,
) -> BuildState {
    let started_at = Utc::now();
    state.building = true;
    state.started_at = Some(started_at);

    let attempt_version = state.current_version + 1;
    let outcome = run(storage, embedder, pid, state.current_version).await;

    state.building = false;
    match outcome {
        Ok(Outcome::Published) => {
            state.current_version = attempt_version;
            state.last_error = None;
            state.push_history(BuildAttempt {
                version: attempt_version,
                started_at,
                finished_at: Utc::now(),
                outcome: BuildOutcome::Published,
            });
            info!(project_id = pid, version = attempt_version, "published index version");
        }
        Ok(Outcome::Skipped) => {
            state.last_error = None;
            state.push_history(BuildAttempt {
                version: state.current_version,
                started_at,
                finished_at: Utc::now(),
                outcome: BuildOutcome::Skipped,
            });
        }
        Err(err) => {
            let message = err.to_string();
            warn!(project_id = pid, error = %message, "index build failed");
            state.last_error = Some(message.clone());
            state.push_history(BuildAttempt {
                version: attempt_version,
                started_at,
                finished_at: Utc::now(),
                outcome: BuildOutcome::Failed { error: message },
            });
        }
    }
    state
}
