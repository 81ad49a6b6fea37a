use async_trait::async_trait;

use crate::{ExtractError, ExtractedChunk, ExtractedDocument, ExtractedMeta, Extractor};

/// Handles any `text/*` MIME type: the bytes are decoded as UTF-8 and kept
/// as a single chunk, with no format-specific parsing and no windowing —
/// `text/*` bodies are small enough that the document chunker (used for the
/// PDF/DOCX paths) would only fragment them for no benefit.
#[derive(Debug, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl Extractor for PlainTextExtractor {
    fn can_handle(&self, mime: &str) -> bool {
        mime.starts_with("text/")
    }

    async fn extract(
        &self,
        bytes: &[u8],
        mime: &str,
        _desired_title: &str,
    ) -> Result<ExtractedDocument, ExtractError> {
        if !self.can_handle(mime) {
            return Err(ExtractError::UnsupportedMime(mime.to_string()));
        }

        let text = String::from_utf8_lossy(bytes).trim().to_string();
        if text.is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        Ok(ExtractedDocument {
            chunks: vec![ExtractedChunk { chunk_index: 0, text: text.clone() }],
            meta: ExtractedMeta {
                page_count: None,
                word_count: text.split_whitespace().count(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_unsupported_mime() {
        let extractor = PlainTextExtractor;
        let result = extractor.extract(b"hi", "application/pdf", "t").await;
        assert!(matches!(result, Err(ExtractError::UnsupportedMime(_))));
    }

    #[tokio::test]
    async fn rejects_empty_content() {
        let extractor = PlainTextExtractor;
        let result = extractor.extract(b"   ", "text/plain", "t").await;
        assert!(matches!(result, Err(ExtractError::EmptyContent)));
    }

    #[tokio::test]
    async fn extracts_single_chunk_for_short_text() {
        let extractor = PlainTextExtractor;
        let doc = extractor
            .extract(b"hello world", "text/plain", "t")
            .await
            .unwrap();
        assert_eq!(doc.chunks.len(), 1);
        assert_eq!(doc.chunks[0].text, "hello world");
        assert_eq!(doc.meta.word_count, 2);
    }

    #[tokio::test]
    async fn long_multi_paragraph_text_still_yields_a_single_chunk() {
        let paragraph = "word ".repeat(500);
        let body = format!("{paragraph}\n\n{paragraph}\n\n{paragraph}");
        let extractor = PlainTextExtractor;
        let doc = extractor.extract(body.as_bytes(), "text/plain", "t").await.unwrap();
        assert_eq!(doc.chunks.len(), 1);
        assert_eq!(doc.chunks[0].chunk_index, 0);
        assert_eq!(doc.chunks[0].text, body.trim());
    }
}
