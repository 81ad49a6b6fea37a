//! Filesystem-backed `Storage`, laid out as
//! `<root>/projects/<pid>/{faqs.json,kb.json,meta.json,attachments/,index/}`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kbq_core::entities::{
    Attachment, ArtifactKind, BuildState, FaqRecord, IndexVersion, KbRecord, Project,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock as AsyncRwLock;

use crate::error::StorageError;
use crate::storage::Storage;

#[derive(Default, Serialize, Deserialize)]
struct ProjectMeta {
    project: Option<Project>,
    build_state: BuildState,
    index_version: Option<IndexVersion>,
}

/// `Storage` backend persisting each project under its own directory on
/// local disk. A per-project `tokio::sync::RwLock` serializes writes while
/// letting reads proceed concurrently, per the "reads concurrent, writes
/// serialized" guarantee.
pub struct LocalFsStorage {
    root: PathBuf,
    locks: Mutex<HashMap<String, Arc<AsyncRwLock<()>>>>,
}

impl LocalFsStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn project_dir(&self, pid: &str) -> PathBuf {
        self.root.join("projects").join(pid)
    }

    fn faqs_path(&self, pid: &str) -> PathBuf {
        self.project_dir(pid).join("faqs.json")
    }

    fn kb_path(&self, pid: &str) -> PathBuf {
        self.project_dir(pid).join("kb.json")
    }

    fn meta_path(&self, pid: &str) -> PathBuf {
        self.project_dir(pid).join("meta.json")
    }

    fn attachments_dir(&self, pid: &str) -> PathBuf {
        self.project_dir(pid).join("attachments")
    }

    fn attachment_path(&self, pid: &str, id: &str) -> PathBuf {
        self.attachments_dir(pid).join(format!("{id}.bin"))
    }

    fn index_artifact_path(&self, pid: &str, version: u64, kind: ArtifactKind) -> PathBuf {
        self.project_dir(pid)
            .join("index")
            .join(format!("v{version}"))
            .join(kind.as_str())
    }

    fn lock_for(&self, pid: &str) -> Arc<AsyncRwLock<()>> {
        let mut locks = self.locks.lock().expect("lock map poisoned");
        locks
            .entry(pid.to_string())
            .or_insert_with(|| Arc::new(AsyncRwLock::new(())))
            .clone()
    }

    async fn read_json<T: Default + for<'de> Deserialize<'de>>(
        path: &Path,
    ) -> Result<T, StorageError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_json<T: Serialize + Sync>(path: &Path, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn read_meta(&self, pid: &str) -> Result<ProjectMeta, StorageError> {
        Self::read_json(&self.meta_path(pid)).await
    }

    async fn write_meta(&self, pid: &str, meta: &ProjectMeta) -> Result<(), StorageError> {
        Self::write_json(&self.meta_path(pid), meta).await
    }
}

fn not_found(pid: &str) -> StorageError {
    StorageError::ProjectNotFound(pid.to_string())
}

#[async_trait]
impl Storage for LocalFsStorage {
    async fn create_or_update_project(&self, project: Project) -> Result<(), StorageError> {
        let pid = project.id.clone();
        let lock = self.lock_for(&pid);
        let _guard = lock.write().await;
        let mut meta = self.read_meta(&pid).await?;
        meta.project = Some(project);
        self.write_meta(&pid, &meta).await
    }

    async fn get_project(&self, pid: &str) -> Result<Option<Project>, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.read().await;
        Ok(self.read_meta(pid).await?.project)
    }

    async fn list_projects(&self) -> Result<Vec<Project>, StorageError> {
        let projects_dir = self.root.join("projects");
        let mut out = Vec::new();
        let mut entries = match tokio::fs::read_dir(&projects_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(out),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if let Some(pid) = entry.file_name().to_str() {
                if let Some(project) = self.get_project(pid).await? {
                    out.push(project);
                }
            }
        }
        Ok(out)
    }

    async fn deactivate_project(&self, pid: &str) -> Result<(), StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let mut meta = self.read_meta(pid).await?;
        let project = meta.project.as_mut().ok_or_else(|| not_found(pid))?;
        project.active = false;
        self.write_meta(pid, &meta).await
    }

    async fn list_faqs(&self, pid: &str) -> Result<Vec<FaqRecord>, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.read().await;
        Self::read_json(&self.faqs_path(pid)).await
    }

    async fn put_faq(&self, pid: &str, faq: FaqRecord) -> Result<Option<FaqRecord>, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let mut faqs: Vec<FaqRecord> = Self::read_json(&self.faqs_path(pid)).await?;
        let prior = faqs.iter().position(|f| f.id == faq.id).map(|idx| {
            let prior = faqs[idx].clone();
            faqs[idx] = faq.clone();
            prior
        });
        if prior.is_none() {
            faqs.push(faq);
        }
        Self::write_json(&self.faqs_path(pid), &faqs).await?;
        Ok(prior)
    }

    async fn delete_faq(&self, pid: &str, id: &str) -> Result<bool, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let mut faqs: Vec<FaqRecord> = Self::read_json(&self.faqs_path(pid)).await?;
        let before = faqs.len();
        faqs.retain(|f| f.id != id);
        let removed = faqs.len() != before;
        if removed {
            Self::write_json(&self.faqs_path(pid), &faqs).await?;
        }
        Ok(removed)
    }

    async fn list_kb(&self, pid: &str) -> Result<Vec<KbRecord>, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.read().await;
        Self::read_json(&self.kb_path(pid)).await
    }

    async fn put_kb(&self, pid: &str, kb: KbRecord) -> Result<Option<KbRecord>, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let mut records: Vec<KbRecord> = Self::read_json(&self.kb_path(pid)).await?;
        let prior = records.iter().position(|k| k.id == kb.id).map(|idx| {
            let prior = records[idx].clone();
            records[idx] = kb.clone();
            prior
        });
        if prior.is_none() {
            records.push(kb);
        }
        Self::write_json(&self.kb_path(pid), &records).await?;
        Ok(prior)
    }

    async fn delete_kb(&self, pid: &str, id: &str) -> Result<bool, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let mut records: Vec<KbRecord> = Self::read_json(&self.kb_path(pid)).await?;
        let Some(idx) = records.iter().position(|k| k.id == id) else {
            return Ok(false);
        };
        let removed = records.remove(idx);
        Self::write_json(&self.kb_path(pid), &records).await?;

        if let Some(att_id) = removed.attachment_id {
            let still_referenced = records
                .iter()
                .any(|k| k.attachment_id.as_deref() == Some(att_id.as_str()));
            if !still_referenced {
                let path = self.attachment_path(pid, &att_id);
                let _ = tokio::fs::remove_file(&path).await;
            }
        }
        Ok(true)
    }

    async fn put_attachment(
        &self,
        pid: &str,
        attachment: Attachment,
    ) -> Result<String, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let id = attachment.id.clone();
        Self::write_json(&self.attachment_path(pid, &id), &attachment).await?;
        Ok(id)
    }

    async fn get_attachment(
        &self,
        pid: &str,
        id: &str,
    ) -> Result<Option<Attachment>, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.read().await;
        match tokio::fs::read(self.attachment_path(pid, id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_index_artifact(
        &self,
        pid: &str,
        version: u64,
        kind: ArtifactKind,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let path = self.index_artifact_path(pid, version, kind);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn get_index_artifact(
        &self,
        pid: &str,
        version: u64,
        kind: ArtifactKind,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.read().await;
        match tokio::fs::read(self.index_artifact_path(pid, version, kind)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_build_state(&self, pid: &str) -> Result<BuildState, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.read().await;
        Ok(self.read_meta(pid).await?.build_state)
    }

    async fn put_build_state(&self, pid: &str, state: BuildState) -> Result<(), StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let mut meta = self.read_meta(pid).await?;
        meta.build_state = state;
        self.write_meta(pid, &meta).await
    }

    async fn get_index_version(&self, pid: &str) -> Result<Option<IndexVersion>, StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.read().await;
        Ok(self.read_meta(pid).await?.index_version)
    }

    async fn put_index_version(
        &self,
        pid: &str,
        version: IndexVersion,
    ) -> Result<(), StorageError> {
        let lock = self.lock_for(pid);
        let _guard = lock.write().await;
        let mut meta = self.read_meta(pid).await?;
        meta.index_version = Some(version);
        self.write_meta(pid, &meta).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbq_core::entities::RecordSource;
    use tempfile::tempdir;

    #[tokio::test]
    async fn faq_roundtrips_through_disk() {
        let dir = tempdir().unwrap();
        let storage = LocalFsStorage::new(dir.path());
        let faq = FaqRecord::new("p1", "What?", "This.", RecordSource::Manual);
        storage.put_faq("p1", faq.clone()).await.unwrap();

        let loaded = storage.list_faqs("p1").await.unwrap();
        assert_eq!(loaded, vec![faq]);
    }

    #[tokio::test]
    async fn attachment_reclaimed_when_last_kb_chunk_deleted() {
        let dir = tempdir().unwrap();
        let storage = LocalFsStorage::new(dir.path());
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

        storage.delete_kb("p1", &chunk.id).await.unwrap();

        assert!(storage.get_attachment("p1", "att-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn build_state_persists_across_calls() {
        let dir = tempdir().unwrap();
        let storage = LocalFsStorage::new(dir.path());
        let state = BuildState {
            current_version: 3,
            ..BuildState::default()
        };
        storage.put_build_state("p1", state.clone()).await.unwrap();

        let loaded = storage.get_build_state("p1").await.unwrap();
        assert_eq!(loaded.current_version, 3);
    }
}
