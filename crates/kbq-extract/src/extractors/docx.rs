use async_trait::async_trait;
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use crate::chunk::chunk_text;
use crate::{ExtractError, ExtractedChunk, ExtractedDocument, ExtractedMeta, Extractor};

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Extracts plain text from DOCX bytes via `docx-rs`, joining each
/// paragraph's runs and preserving paragraph order as one blank-line
/// separated document before handing off to the shared chunker.
#[derive(Debug, Default)]
pub struct DocxExtractor;

#[async_trait]
impl Extractor for DocxExtractor {
    fn can_handle(&self, mime: &str) -> bool {
        mime == DOCX_MIME
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

        let docx = read_docx(bytes).map_err(|e| ExtractError::Docx(e.to_string()))?;

        let mut paragraphs = Vec::new();
        for child in &docx.document.children {
            if let DocumentChild::Paragraph(paragraph) = child {
                let mut text = String::new();
                for run_child in &paragraph.children {
                    if let ParagraphChild::Run(run) = run_child {
                        for piece in &run.children {
                            if let RunChild::Text(t) = piece {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
                let text = text.trim();
                if !text.is_empty() {
                    paragraphs.push(text.to_string());
                }
            }
        }

        let text = paragraphs.join("\n\n");
        if text.trim().is_empty() {
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
