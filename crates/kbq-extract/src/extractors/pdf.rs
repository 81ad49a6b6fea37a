use async_trait::async_trait;

use crate::chunk::chunk_text;
use crate::{ExtractError, ExtractedChunk, ExtractedDocument, ExtractedMeta, Extractor};

const PDF_MIME: &str = "application/pdf";

/// Extracts plain text from PDF bytes via `pdf-extract`, preserving
/// paragraph order as reported by the library, then chunks it with the same
/// rules as every other extractor.
#[derive(Debug, Default)]
pub struct PdfExtractor;

#[async_trait]
impl Extractor for PdfExtractor {
    fn can_handle(&self, mime: &str) -> bool {
        mime == PDF_MIME
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

        let bytes = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ExtractError::Pdf(e.to_string()))?
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ExtractError::EmptyContent);
        }

        let chunks = chunk_text(&text)
            .into_iter()
            .enumerate()
            .map(|(idx, text)| ExtractedChunk {
                chunk_index: u32::try_from(idx).unwrap_or(u32::MAX),
                text,
            })
            .collect();

        Ok(ExtractedDocument {
            chunks,
            meta: ExtractedMeta {
                page_count: None,
                word_count: text.split_whitespace().count(),
            },
        })
    }
}
