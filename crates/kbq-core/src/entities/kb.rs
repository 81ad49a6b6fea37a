use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::RecordSource;
use crate::identity::mint;

/// A titled text fragment; may be one of many chunks of an uploaded
/// document sharing `parent_document_id` and `attachment_id`.
///
/// `id = mint("kb", [project_id, article_title, chunk_index])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct KbRecord {
    pub id: String,
    pub project_id: String,
    pub article_title: String,
    pub content: String,
    pub source: RecordSource,
    #[serde(default)]
    pub chunk_index: Option<u32>,
    #[serde(default)]
    pub parent_document_id: Option<String>,
    #[serde(default)]
    pub attachment_id: Option<String>,
}

impl KbRecord {
    /// A single-chunk KB record created directly via `ContentAPI::add_kb`.
    #[must_use]
    pub fn manual(
        project_id: impl Into<String>,
        article_title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let project_id = project_id.into();
        let article_title = article_title.into();
        let id = mint("kb", &[&project_id, &article_title, "0"]);
        Self {
            id: id.to_string(),
            project_id,
            article_title,
            content: content.into(),
            source: RecordSource::Manual,
            chunk_index: Some(0),
            parent_document_id: None,
            attachment_id: None,
        }
    }

    /// One chunk of an uploaded document.
    #[must_use]
    pub fn upload_chunk(
        project_id: impl Into<String>,
        article_title: impl Into<String>,
        content: impl Into<String>,
        chunk_index: u32,
        parent_document_id: impl Into<String>,
        attachment_id: impl Into<String>,
    ) -> Self {
        let project_id = project_id.into();
        let article_title = article_title.into();
        let id = mint(
            "kb",
            &[&project_id, &article_title, &chunk_index.to_string()],
        );
        Self {
            id: id.to_string(),
            project_id,
            article_title,
            content: content.into(),
            source: RecordSource::Upload,
            chunk_index: Some(chunk_index),
            parent_document_id: Some(parent_document_id.into()),
            attachment_id: Some(attachment_id.into()),
        }
    }

    /// The text indexed for this record: `title + "\n" + content`.
    #[must_use]
    pub fn indexable_text(&self) -> String {
        format!("{}\n{}", self.article_title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn manual_record_has_chunk_index_zero() {
        let kb = KbRecord::manual("p1", "Title", "Content");
        assert_eq!(kb.chunk_index, Some(0));
        assert!(kb.parent_document_id.is_none());
    }

    #[test]
    fn chunk_ids_differ_by_index() {
        let a = KbRecord::upload_chunk("p1", "Doc", "a", 0, "doc1", "att1");
        let b = KbRecord::upload_chunk("p1", "Doc", "b", 1, "doc1", "att1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.parent_document_id, b.parent_document_id);
        assert_eq!(a.attachment_id, b.attachment_id);
    }
}
