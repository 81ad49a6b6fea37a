use async_trait::async_trait;
use kbq_core::entities::{Attachment, ArtifactKind, BuildState, FaqRecord, IndexVersion, KbRecord, Project};

use crate::error::StorageError;

/// Per-project persistence of FAQ/KB records, attachments, index artifacts,
/// and the per-project build/version metadata that `kbq-index` mutates.
///
/// Every method is scoped to one `project_id`; there is no cross-project
/// visibility. Implementations must serialize writes within a project
/// (readers observe either the pre- or post-write state of a record, never a
/// partial one) while allowing reads to proceed concurrently with each
/// other.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_or_update_project(&self, project: Project) -> Result<(), StorageError>;

    async fn get_project(&self, pid: &str) -> Result<Option<Project>, StorageError>;

    async fn list_projects(&self) -> Result<Vec<Project>, StorageError>;

    /// Sets `active = false`. Idempotent; no error if already inactive.
    async fn deactivate_project(&self, pid: &str) -> Result<(), StorageError>;

    /// Insertion order.
    async fn list_faqs(&self, pid: &str) -> Result<Vec<FaqRecord>, StorageError>;

    /// Upsert by id. Returns the prior record, if one existed.
    async fn put_faq(&self, pid: &str, faq: FaqRecord) -> Result<Option<FaqRecord>, StorageError>;

    /// Returns whether a record was removed.
    async fn delete_faq(&self, pid: &str, id: &str) -> Result<bool, StorageError>;

    /// Insertion order.
    async fn list_kb(&self, pid: &str) -> Result<Vec<KbRecord>, StorageError>;

    /// Upsert by id. Returns the prior record, if one existed.
    async fn put_kb(&self, pid: &str, kb: KbRecord) -> Result<Option<KbRecord>, StorageError>;

    /// Removes the record if present. If its `attachment_id` has no other KB
    /// record referring to it afterward, the attachment is deleted too.
    /// Returns whether a KB record was removed.
    async fn delete_kb(&self, pid: &str, id: &str) -> Result<bool, StorageError>;

    /// Stores `bytes` under a fresh attachment id and returns it.
    async fn put_attachment(
        &self,
        pid: &str,
        attachment: Attachment,
    ) -> Result<String, StorageError>;

    async fn get_attachment(
        &self,
        pid: &str,
        id: &str,
    ) -> Result<Option<Attachment>, StorageError>;

    async fn put_index_artifact(
        &self,
        pid: &str,
        version: u64,
        kind: ArtifactKind,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError>;

    async fn get_index_artifact(
        &self,
        pid: &str,
        version: u64,
        kind: ArtifactKind,
    ) -> Result<Option<Vec<u8>>, StorageError>;

    /// Current `BuildState`, creating a fresh default one on first access.
    async fn get_build_state(&self, pid: &str) -> Result<BuildState, StorageError>;

    async fn put_build_state(&self, pid: &str, state: BuildState) -> Result<(), StorageError>;

    /// The published `IndexVersion` meta record, if any build has completed.
    async fn get_index_version(&self, pid: &str) -> Result<Option<IndexVersion>, StorageError>;

    async fn put_index_version(&self, pid: &str, version: IndexVersion)
    -> Result<(), StorageError>;
}
