use kbq_core::entities::{FaqRecord, KbRecord};
use serde::{Deserialize, Serialize};

/// Which record type a [`IndexableRecord`] was denormalized from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Faq,
    Kb,
}

/// A flattened, provider-agnostic view of a FAQ or KB record, built once per
/// build cycle and shared by all three index providers and the retriever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexableRecord {
    pub id: String,
    pub project_id: String,
    pub kind: SourceKind,
    pub title: String,
    pub body: String,
    pub parent_document_id: String,
    pub chunk_index: u32,
    pub attachment_id: Option<String>,
}

impl IndexableRecord {
    /// Text embedded and tokenized: `title + "\n" + body`.
    #[must_use]
    pub fn indexable_text(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }
}

impl From<&FaqRecord> for IndexableRecord {
    fn from(faq: &FaqRecord) -> Self {
        Self {
            id: faq.id.clone(),
            project_id: faq.project_id.clone(),
            kind: SourceKind::Faq,
            title: faq.question.clone(),
            body: faq.answer.clone(),
            parent_document_id: faq.id.clone(),
            chunk_index: 0,
            attachment_id: None,
        }
    }
}

impl From<&KbRecord> for IndexableRecord {
    fn from(kb: &KbRecord) -> Self {
        Self {
            id: kb.id.clone(),
            project_id: kb.project_id.clone(),
            kind: SourceKind::Kb,
            title: kb.article_title.clone(),
            body: kb.content.clone(),
            parent_document_id: kb.parent_document_id.clone().unwrap_or_else(|| kb.id.clone()),
            chunk_index: kb.chunk_index.unwrap_or(0),
            attachment_id: kb.attachment_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kbq_core::entities::RecordSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn faq_record_is_its_own_parent_document() {
        let faq = FaqRecord::new("p1", "q", "a", RecordSource::Manual);
        let record = IndexableRecord::from(&faq);
        assert_eq!(record.parent_document_id, record.id);
        assert_eq!(record.kind, SourceKind::Faq);
    }

    #[test]
    fn kb_chunk_keeps_shared_parent_document_id() {
        let kb = KbRecord::upload_chunk("p1", "Doc", "chunk text", 2, "doc-1", "att-1");
        let record = IndexableRecord::from(&kb);
        assert_eq!(record.parent_document_id, "doc-1");
        assert_eq!(record.chunk_index, 2);
        assert_eq!(record.attachment_id.as_deref(), Some("att-1"));
    }
}
