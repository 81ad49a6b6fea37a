use std::sync::Arc;

use chrono::Utc;
use kbq_core::entities::{Attachment, FaqRecord, KbRecord, Project, RecordSource};
use kbq_core::identity::mint;
use kbq_extract::ExtractorRegistry;
use kbq_index::IndexManager;
use kbq_storage::Storage;
use tracing::instrument;
use uuid::Uuid;

use crate::error::ContentError;

/// Either the KB record itself, or — when it wraps an uploaded document
/// chunk — the original uploaded bytes and their declared MIME type.
#[derive(Debug, Clone, PartialEq)]
pub enum KbContent {
    Record(KbRecord),
    Attachment(Attachment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub document_id: String,
    pub chunk_ids: Vec<String>,
    pub index_build_started: bool,
}

/// Public CRUD surface over (project, FAQ, KB, document), composing
/// `Storage` writes with `IndexManager::mark_dirty` so every mutation that
/// changes indexable content schedules a rebuild.
pub struct ContentAPI {
    storage: Arc<dyn Storage>,
    extractors: ExtractorRegistry,
    index: IndexManager,
}

impl ContentAPI {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, extractors: ExtractorRegistry, index: IndexManager) -> Self {
        Self { storage, extractors, index }
    }

    pub async fn create_or_update_project(&self, project: Project) -> Result<(), ContentError> {
        Ok(self.storage.create_or_update_project(project).await?)
    }

    pub async fn get_project(&self, pid: &str) -> Result<Option<Project>, ContentError> {
        Ok(self.storage.get_project(pid).await?)
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, ContentError> {
        Ok(self.storage.list_projects().await?)
    }

    pub async fn deactivate_project(&self, pid: &str) -> Result<(), ContentError> {
        Ok(self.storage.deactivate_project(pid).await?)
    }

    pub async fn list_faqs(&self, pid: &str) -> Result<Vec<FaqRecord>, ContentError> {
        Ok(self.storage.list_faqs(pid).await?)
    }

    #[instrument(skip(self, answer))]
    pub async fn add_faq(
        &self,
        pid: &str,
        question: &str,
        answer: &str,
    ) -> Result<FaqRecord, ContentError> {
        let faq = FaqRecord::new(pid, question, answer, RecordSource::Manual);
        self.storage.put_faq(pid, faq.clone()).await?;
        self.index.mark_dirty(pid).await?;
        Ok(faq)
    }

    /// Applies every `(question, answer)` pair as an upsert, firing
    /// `mark_dirty` once after the whole batch lands rather than once per
    /// record. `Storage` has no multi-write transaction, so a failure
    /// partway through leaves prior upserts in this batch applied — see
    /// the note in DESIGN.md.
    pub async fn batch_add_faqs(
        &self,
        pid: &str,
        pairs: &[(String, String)],
    ) -> Result<Vec<FaqRecord>, ContentError> {
        let mut faqs = Vec::with_capacity(pairs.len());
        for (question, answer) in pairs {
            let faq = FaqRecord::new(pid, question, answer, RecordSource::Manual);
            self.storage.put_faq(pid, faq.clone()).await?;
            faqs.push(faq);
        }
        if !faqs.is_empty() {
            self.index.mark_dirty(pid).await?;
        }
        Ok(faqs)
    }

    pub async fn delete_faq(&self, pid: &str, id: &str) -> Result<bool, ContentError> {
        let removed = self.storage.delete_faq(pid, id).await?;
        if removed {
            self.index.mark_dirty(pid).await?;
        }
        Ok(removed)
    }

    pub async fn list_kb(&self, pid: &str) -> Result<Vec<KbRecord>, ContentError> {
        Ok(self.storage.list_kb(pid).await?)
    }

    pub async fn add_kb(
        &self,
        pid: &str,
        article_title: &str,
        content: &str,
    ) -> Result<KbRecord, ContentError> {
        let kb = KbRecord::manual(pid, article_title, content);
        self.storage.put_kb(pid, kb.clone()).await?;
        self.index.mark_dirty(pid).await?;
        Ok(kb)
    }

    pub async fn delete_kb(&self, pid: &str, id: &str) -> Result<bool, ContentError> {
        let removed = self.storage.delete_kb(pid, id).await?;
        if removed {
            self.index.mark_dirty(pid).await?;
        }
        Ok(removed)
    }

    /// Extracts `bytes` into chunks, replacing any prior chunks from a
    /// previous upload under the same `(project, title)` so re-uploading a
    /// document doesn't leak orphaned attachments or stale chunks.
    #[instrument(skip(self, bytes))]
    pub async fn upload_document(
        &self,
        pid: &str,
        bytes: &[u8],
        mime: &str,
        title: &str,
    ) -> Result<UploadResult, ContentError> {
        let document_id = mint("document", &[pid, title]).to_string();

        for existing in self.storage.list_kb(pid).await? {
            if existing.parent_document_id.as_deref() == Some(document_id.as_str()) {
                self.storage.delete_kb(pid, &existing.id).await?;
            }
        }

        let extracted = self.extractors.extract(bytes, mime, title).await?;

        let attachment_id = Uuid::new_v4().to_string();
        self.storage
            .put_attachment(
                pid,
                Attachment {
                    id: attachment_id.clone(),
                    project_id: pid.to_string(),
                    mime: mime.to_string(),
                    original_name: title.to_string(),
                    bytes: bytes.to_vec(),
                },
            )
            .await?;

        let mut chunk_ids = Vec::with_capacity(extracted.chunks.len());
        for chunk in &extracted.chunks {
            let kb = KbRecord::upload_chunk(
                pid,
                title,
                chunk.text.clone(),
                chunk.chunk_index,
                document_id.clone(),
                attachment_id.clone(),
            );
            self.storage.put_kb(pid, kb.clone()).await?;
            chunk_ids.push(kb.id);
        }

        self.index.mark_dirty(pid).await?;

        Ok(UploadResult { document_id, chunk_ids, index_build_started: true })
    }

    /// If the KB record wraps an uploaded document, returns its original
    /// attachment bytes and MIME type; otherwise returns the record itself.
    pub async fn get_kb(&self, pid: &str, id: &str) -> Result<Option<KbContent>, ContentError> {
        let Some(kb) = self.storage.list_kb(pid).await?.into_iter().find(|kb| kb.id == id) else {
            return Ok(None);
        };
        if let Some(attachment_id) = &kb.attachment_id {
            if let Some(attachment) = self.storage.get_attachment(pid, attachment_id).await? {
                return Ok(Some(KbContent::Attachment(attachment)));
            }
        }
        Ok(Some(KbContent::Record(kb)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbq_embeddings::Embedder;
    use kbq_storage::InMemoryStorage;
    use pretty_assertions::assert_eq;

    fn api() -> ContentAPI {
        let storage: Arc<dyn Storage> = Arc::new(InMemoryStorage::default());
        let index = IndexManager::new(storage.clone(), None::<Arc<dyn Embedder>>);
        ContentAPI::new(storage, ExtractorRegistry::with_defaults(), index)
    }

    #[tokio::test]
    async fn add_faq_marks_the_project_dirty() {
        let api = api();
        api.create_or_update_project(Project::new("p1", "Project One")).await.unwrap();
        api.add_faq("p1", "What is this?", "A test project.").await.unwrap();

        let state = api.index.status("p1").await.unwrap();
        assert!(state.target_version >= 1);
    }

    #[tokio::test]
    async fn delete_faq_reports_whether_anything_was_removed() {
        let api = api();
        let faq = api.add_faq("p1", "q", "a").await.unwrap();
        assert!(api.delete_faq("p1", &faq.id).await.unwrap());
        assert!(!api.delete_faq("p1", &faq.id).await.unwrap());
    }

    #[tokio::test]
    async fn upload_document_yields_one_attachment_backed_chunk() {
        let api = api();
        let result = api
            .upload_document("p1", b"hello world", "text/plain", "Greeting")
            .await
            .unwrap();
        assert_eq!(result.chunk_ids.len(), 1);
        assert!(result.index_build_started);

        let content = api.get_kb("p1", &result.chunk_ids[0]).await.unwrap().unwrap();
        match content {
            KbContent::Attachment(attachment) => assert_eq!(attachment.bytes, b"hello world"),
            KbContent::Record(_) => panic!("expected attachment-backed content"),
        }
    }

    #[tokio::test]
    async fn reuploading_the_same_title_replaces_prior_chunks() {
        let api = api();
        let first = api.upload_document("p1", b"version one", "text/plain", "Doc").await.unwrap();
        let second = api.upload_document("p1", b"version two", "text/plain", "Doc").await.unwrap();

        assert_eq!(first.document_id, second.document_id);
        assert!(api.get_kb("p1", &first.chunk_ids[0]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_kb_returns_plain_record_when_there_is_no_attachment() {
        let api = api();
        let kb = api.add_kb("p1", "Manual Article", "content").await.unwrap();
        let content = api.get_kb("p1", &kb.id).await.unwrap().unwrap();
        assert!(matches!(content, KbContent::Record(_)));
    }

    #[tokio::test]
    async fn batch_add_faqs_marks_dirty_once_for_the_whole_batch() {
        let api = api();
        let pairs = vec![("q1".to_string(), "a1".to_string()), ("q2".to_string(), "a2".to_string())];
        let faqs = api.batch_add_faqs("p1", &pairs).await.unwrap();
        assert_eq!(faqs.len(), 2);
    }
}
