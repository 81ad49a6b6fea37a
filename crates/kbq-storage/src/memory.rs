//! Ephemeral, fully in-process `Storage` — the demo/test backend.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use kbq_core::entities::{
    Attachment, ArtifactKind, BuildState, FaqRecord, IndexVersion, KbRecord, Project,
};

use crate::error::StorageError;
use crate::storage::Storage;

#[derive(Default)]
struct ProjectState {
    project: Option<Project>,
    faqs: Vec<FaqRecord>,
    kb: Vec<KbRecord>,
    attachments: HashMap<String, Attachment>,
    artifacts: HashMap<(u64, ArtifactKind), Vec<u8>>,
    build_state: BuildState,
    index_version: Option<IndexVersion>,
}

/// A `Storage` backend that keeps everything in a `RwLock<HashMap>`. Nothing
/// is persisted across process restarts; suited to tests and ephemeral demo
/// deployments.
#[derive(Default)]
pub struct InMemoryStorage {
    projects: RwLock<HashMap<String, ProjectState>>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(pid: &str) -> StorageError {
    StorageError::ProjectNotFound(pid.to_string())
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_or_update_project(&self, project: Project) -> Result<(), StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        let entry = projects.entry(project.id.clone()).or_default();
        entry.project = Some(project);
        Ok(())
    }

    async fn get_project(&self, pid: &str) -> Result<Option<Project>, StorageError> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(projects.get(pid).and_then(|s| s.project.clone()))
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(projects.values().filter_map(|s| s.project.clone()).collect())
    }

    async fn deactivate_project(&self, pid: &str) -> Result<(), StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        let state = projects.get_mut(pid).ok_or_else(|| not_found(pid))?;
        let project = state.project.as_mut().ok_or_else(|| not_found(pid))?;
        project.active = false;
        Ok(())
    }

    async fn list_faqs(&self, pid: &str) -> Result<Vec<FaqRecord>, StorageError> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(projects.get(pid).map(|s| s.faqs.clone()).unwrap_or_default())
    }

    async fn put_faq(&self, pid: &str, faq: FaqRecord) -> Result<Option<FaqRecord>, StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        let state = projects.entry(pid.to_string()).or_default();
        let prior = state.faqs.iter().position(|f| f.id == faq.id).map(|idx| {
            let prior = state.faqs[idx].clone();
            state.faqs[idx] = faq.clone();
            prior
        });
        if prior.is_none() {
            state.faqs.push(faq);
        }
        Ok(prior)
    }

    async fn delete_faq(&self, pid: &str, id: &str) -> Result<bool, StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        let Some(state) = projects.get_mut(pid) else {
            return Ok(false);
        };
        let before = state.faqs.len();
        state.faqs.retain(|f| f.id != id);
        Ok(state.faqs.len() != before)
    }

    async fn list_kb(&self, pid: &str) -> Result<Vec<KbRecord>, StorageError> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(projects.get(pid).map(|s| s.kb.clone()).unwrap_or_default())
    }

    async fn put_kb(&self, pid: &str, kb: KbRecord) -> Result<Option<KbRecord>, StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        let state = projects.entry(pid.to_string()).or_default();
        let prior = state.kb.iter().position(|k| k.id == kb.id).map(|idx| {
            let prior = state.kb[idx].clone();
            state.kb[idx] = kb.clone();
            prior
        });
        if prior.is_none() {
            state.kb.push(kb);
        }
        Ok(prior)
    }

    async fn delete_kb(&self, pid: &str, id: &str) -> Result<bool, StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        let Some(state) = projects.get_mut(pid) else {
            return Ok(false);
        };
        let Some(idx) = state.kb.iter().position(|k| k.id == id) else {
            return Ok(false);
        };
        let removed = state.kb.remove(idx);
        if let Some(att_id) = removed.attachment_id {
            let still_referenced = state.kb.iter().any(|k| k.attachment_id.as_deref() == Some(att_id.as_str()));
            if !still_referenced {
                state.attachments.remove(&att_id);
            }
        }
        Ok(true)
    }

    async fn put_attachment(
        &self,
        pid: &str,
        attachment: Attachment,
    ) -> Result<String, StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        let state = projects.entry(pid.to_string()).or_default();
        let id = attachment.id.clone();
        state.attachments.insert(id.clone(), attachment);
        Ok(id)
    }

    async fn get_attachment(
        &self,
        pid: &str,
        id: &str,
    ) -> Result<Option<Attachment>, StorageError> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(projects
            .get(pid)
            .and_then(|s| s.attachments.get(id))
            .cloned())
    }

    async fn put_index_artifact(
        &self,
        pid: &str,
        version: u64,
        kind: ArtifactKind,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        let state = projects.entry(pid.to_string()).or_default();
        state.artifacts.insert((version, kind), bytes);
        Ok(())
    }

    async fn get_index_artifact(
        &self,
        pid: &str,
        version: u64,
        kind: ArtifactKind,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(projects
            .get(pid)
            .and_then(|s| s.artifacts.get(&(version, kind)))
            .cloned())
    }

    async fn get_build_state(&self, pid: &str) -> Result<BuildState, StorageError> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(projects
            .get(pid)
            .map(|s| s.build_state.clone())
            .unwrap_or_default())
    }

    async fn put_build_state(&self, pid: &str, state: BuildState) -> Result<(), StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        projects.entry(pid.to_string()).or_default().build_state = state;
        Ok(())
    }

    async fn get_index_version(&self, pid: &str) -> Result<Option<IndexVersion>, StorageError> {
        let projects = self.projects.read().expect("lock poisoned");
        Ok(projects.get(pid).and_then(|s| s.index_version.clone()))
    }

    async fn put_index_version(
        &self,
        pid: &str,
        version: IndexVersion,
    ) -> Result<(), StorageError> {
        let mut projects = self.projects.write().expect("lock poisoned");
        projects.entry(pid.to_string()).or_default().index_version = Some(version);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbq_core::entities::RecordSource;

    #[tokio::test]
    async fn faq_put_returns_prior_on_upsert() {
        let storage = InMemoryStorage::new();
        let faq = FaqRecord::new("p1", "What?", "This.", RecordSource::Manual);
        let prior = storage.put_faq("p1", faq.clone()).await.unwrap();
        assert!(prior.is_none());

        let mut updated = faq.clone();
        updated.answer = "That.".to_string();
        let prior = storage.put_faq("p1", updated).await.unwrap();
        assert_eq!(prior.unwrap().answer, "This.");
    }

    #[tokio::test]
    async fn delete_kb_reclaims_orphaned_attachment() {
        let storage = InMemoryStorage::new();
        let attachment = Attachment {
            id: "att-1".into(),
            project_id: "p1".into(),
            mime: "application/pdf".into(),
            original_name: "doc.pdf".into(),
            bytes: vec![1, 2, 3],
        };
        storage.put_attachment("p1", attachment).await.unwrap();

        let chunk = KbRecord::upload_chunk("p1", "Doc", "chunk text", 0, "doc-1", "att-1");
        storage.put_kb("p1", chunk.clone()).await.unwrap();

        let removed = storage.delete_kb("p1", &chunk.id).await.unwrap();
        assert!(removed);
        assert!(storage.get_attachment("p1", "att-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_kb_keeps_attachment_with_other_referrers() {
        let storage = InMemoryStorage::new();
        let attachment = Attachment {
            id: "att-1".into(),
            project_id: "p1".into(),
            mime: "application/pdf".into(),
            original_name: "doc.pdf".into(),
            bytes: vec![1, 2, 3],
        };
        storage.put_attachment("p1", attachment).await.unwrap();

        let chunk0 = KbRecord::upload_chunk("p1", "Doc", "chunk 0", 0, "doc-1", "att-1");
        let chunk1 = KbRecord::upload_chunk("p1", "Doc", "chunk 1", 1, "doc-1", "att-1");
        storage.put_kb("p1", chunk0.clone()).await.unwrap();
        storage.put_kb("p1", chunk1).await.unwrap();

        storage.delete_kb("p1", &chunk0.id).await.unwrap();
        assert!(storage.get_attachment("p1", "att-1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deactivate_unknown_project_is_not_found() {
        let storage = InMemoryStorage::new();
        let result = storage.deactivate_project("ghost").await;
        assert!(matches!(result, Err(StorageError::ProjectNotFound(_))));
    }
}
