use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use kbq_core::entities::{ArtifactKind, BuildState};
use kbq_embeddings::Embedder;
use kbq_search::index::{build_basic, BasicArtifact, DenseArtifact, IndexableRecord, SparseArtifact};
use kbq_storage::Storage;
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::debug;

use crate::build::{build_once, load_records};
use crate::error::IndexError;
use crate::snapshot::Snapshot;

struct ProjectSlot {
    /// Held for the duration of a single build loop; `try_lock_owned`
    /// failing means a build is already in flight for this project.
    build_lock: Arc<AsyncMutex<()>>,
    cached: RwLock<Option<Arc<Snapshot>>>,
}

impl ProjectSlot {
    fn new() -> Self {
        Self {
            build_lock: Arc::new(AsyncMutex::new(())),
            cached: RwLock::new(None),
        }
    }
}

/// Tracks per-project `BuildState`, single-flights rebuilds, and publishes
/// new index versions atomically.
///
/// Cheaply `Clone`: every field is an `Arc`, so a clone shares the same
/// project slots and can be moved into a spawned build task.
#[derive(Clone)]
pub struct IndexManager {
    storage: Arc<dyn Storage>,
    embedder: Option<Arc<dyn Embedder>>,
    slots: Arc<StdMutex<HashMap<String, Arc<ProjectSlot>>>>,
}

impl IndexManager {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, embedder: Option<Arc<dyn Embedder>>) -> Self {
        Self {
            storage,
            embedder,
            slots: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    fn slot_for(&self, pid: &str) -> Arc<ProjectSlot> {
        let mut slots = self.slots.lock().expect("index slot map lock poisoned");
        slots
            .entry(pid.to_string())
            .or_insert_with(|| Arc::new(ProjectSlot::new()))
            .clone()
    }

    /// Marks a project's index stale and schedules a rebuild if one isn't
    /// already running. If a build is in flight, it will notice the new
    /// target on its next loop iteration and rebuild once more — concurrent
    /// `mark_dirty` calls during a build coalesce into a single follow-up.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Storage`] if the build state can't be read or
    /// written.
    pub async fn mark_dirty(&self, pid: &str) -> Result<(), IndexError> {
        let mut state = self.storage.get_build_state(pid).await?;
        state.target_version += 1;
        self.storage.put_build_state(pid, state).await?;

        let slot = self.slot_for(pid);
        if let Ok(permit) = slot.build_lock.clone().try_lock_owned() {
            let manager = self.clone();
            let pid = pid.to_string();
            tokio::spawn(async move {
                manager.run_build_loop(&pid, permit).await;
            });
        } else {
            debug!(project_id = pid, "build already in flight, dirty mark will be picked up");
        }
        Ok(())
    }

    async fn run_build_loop(&self, pid: &str, _permit: tokio::sync::OwnedMutexGuard<()>) {
        loop {
            let Ok(state) = self.storage.get_build_state(pid).await else {
                return;
            };
            if state.current_version >= state.target_version {
                return;
            }
            let mut state = build_once(self.storage.as_ref(), self.embedder.as_deref(), pid, state).await;
            // A concurrent `mark_dirty` may have bumped `target_version`
            // again while this build ran; fold it in so that increment is
            // never silently lost, and the loop's re-check below sees it.
            if let Ok(latest) = self.storage.get_build_state(pid).await {
                state.target_version = state.target_version.max(latest.target_version);
            }
            if self.storage.put_build_state(pid, state).await.is_err() {
                return;
            }
            // Invalidate any cached snapshot so the next `snapshot` call
            // reloads the freshly published artifacts.
            let slot = self.slot_for(pid);
            *slot.cached.write().await = None;
        }
    }

    /// Returns `BuildState` for a project, defaulting to an untouched one.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Storage`] on a storage read failure.
    pub async fn status(&self, pid: &str) -> Result<BuildState, IndexError> {
        Ok(self.storage.get_build_state(pid).await?)
    }

    /// Synchronous equivalent of `mark_dirty` followed by waiting for the
    /// scheduled (or already in-flight) build to finish.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Storage`] on a storage failure.
    pub async fn rebuild_now(&self, pid: &str) -> Result<BuildState, IndexError> {
        self.mark_dirty(pid).await?;
        let slot = self.slot_for(pid);
        // Acquiring the lock blocks until whichever task is running (the one
        // just scheduled, or one already in flight) releases it.
        let _ = slot.build_lock.lock().await;
        self.status(pid).await
    }

    /// Returns a handle to the artifacts of the currently published version,
    /// or `None` if no build has ever completed for this project.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError`] if a published version exists but its
    /// artifacts can't be read or deserialized.
    pub async fn snapshot(&self, pid: &str) -> Result<Option<Arc<Snapshot>>, IndexError> {
        let slot = self.slot_for(pid);
        if let Some(cached) = slot.cached.read().await.as_ref() {
            return Ok(Some(cached.clone()));
        }

        let Some(version) = self.storage.get_index_version(pid).await? else {
            return Ok(None);
        };

        let records = load_records(self.storage.as_ref(), pid).await?;

        let dense = if version.dense_artifact {
            self.storage
                .get_index_artifact(pid, version.version, ArtifactKind::Dense)
                .await?
                .map(|bytes| serde_json::from_slice::<DenseArtifact>(&bytes))
                .transpose()?
        } else {
            None
        };
        let sparse = if version.sparse_artifact {
            self.storage
                .get_index_artifact(pid, version.version, ArtifactKind::Sparse)
                .await?
                .map(|bytes| serde_json::from_slice::<SparseArtifact>(&bytes))
                .transpose()?
        } else {
            None
        };
        let basic = self
            .storage
            .get_index_artifact(pid, version.version, ArtifactKind::Basic)
            .await?
            .map(|bytes| serde_json::from_slice::<BasicArtifact>(&bytes))
            .transpose()?
            .unwrap_or_else(|| build_basic(&records));

        let snapshot = Arc::new(Snapshot { version, records, dense, sparse, basic });
        *slot.cached.write().await = Some(snapshot.clone());
        Ok(Some(snapshot))
    }

    /// Builds a transient basic-only artifact directly from a project's
    /// current records, for callers that need something to search against
    /// before any index version has ever been published.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Storage`] on a storage read failure.
    pub async fn ad_hoc_basic(
        &self,
        pid: &str,
    ) -> Result<(Vec<IndexableRecord>, BasicArtifact), IndexError> {
        let records = load_records(self.storage.as_ref(), pid).await?;
        let basic = build_basic(&records);
        Ok((records, basic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbq_core::entities::{BuildOutcome, FaqRecord, RecordSource};
    use kbq_storage::InMemoryStorage;
    use pretty_assertions::assert_eq;

    fn manager() -> IndexManager {
        IndexManager::new(Arc::new(InMemoryStorage::default()), None)
    }

    #[tokio::test]
    async fn snapshot_is_none_before_any_build() {
        let manager = manager();
        assert!(manager.snapshot("p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rebuild_now_publishes_a_snapshot() {
        let manager = manager();
        manager
            .storage
            .put_faq("p1", FaqRecord::new("p1", "q", "a", RecordSource::Manual))
            .await
            .unwrap();

        let state = manager.rebuild_now("p1").await.unwrap();
        assert_eq!(state.current_version, 1);
        assert!(state.last_error.is_none());

        let snapshot = manager.snapshot("p1").await.unwrap().unwrap();
        assert_eq!(snapshot.version.version, 1);
        assert_eq!(snapshot.records.len(), 1);
    }

    #[tokio::test]
    async fn unchanged_fingerprint_is_skipped_on_second_rebuild() {
        let manager = manager();
        manager
            .storage
            .put_faq("p1", FaqRecord::new("p1", "q", "a", RecordSource::Manual))
            .await
            .unwrap();
        manager.rebuild_now("p1").await.unwrap();

        let state = manager.rebuild_now("p1").await.unwrap();
        assert_eq!(state.current_version, 1, "no new records, nothing to rebuild");
        assert_eq!(state.history[0].outcome, BuildOutcome::Skipped);
    }

    #[tokio::test]
    async fn concurrent_mark_dirty_calls_coalesce_into_one_follow_up_build() {
        let manager = manager();
        manager
            .storage
            .put_faq("p1", FaqRecord::new("p1", "q1", "a1", RecordSource::Manual))
            .await
            .unwrap();

        manager.mark_dirty("p1").await.unwrap();
        manager.mark_dirty("p1").await.unwrap();
        manager.mark_dirty("p1").await.unwrap();

        let state = manager.rebuild_now("p1").await.unwrap();
        assert!(state.current_version >= 1);
        assert!(state.target_version <= state.current_version + 1);
    }
}
