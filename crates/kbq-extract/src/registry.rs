use crate::{ExtractError, ExtractedDocument, Extractor};

/// Tries each registered [`Extractor`] in order and dispatches to the first
/// that claims a MIME type. Unknown MIME types fail with `UnsupportedMime`
/// — the same failure an absent optional extraction feature produces, since
/// a gated extractor simply isn't in the list.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn Extractor>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// The default registry: `PlainTextExtractor` always, plus
    /// `PdfExtractor`/`DocxExtractor` when their features are compiled in.
    #[must_use]
    pub fn with_defaults() -> Self {
        let registry = Self::new().with(crate::PlainTextExtractor);

        #[cfg(feature = "pdf")]
        let registry = registry.with(crate::PdfExtractor);

        #[cfg(feature = "docx")]
        let registry = registry.with(crate::DocxExtractor);

        registry
    }

    pub async fn extract(
        &self,
        bytes: &[u8],
        mime: &str,
        desired_title: &str,
    ) -> Result<ExtractedDocument, ExtractError> {
        for extractor in &self.extractors {
            if extractor.can_handle(mime) {
                return extractor.extract(bytes, mime, desired_title).await;
            }
        }
        Err(ExtractError::UnsupportedMime(mime.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn falls_through_to_unsupported_mime() {
        let registry = ExtractorRegistry::with_defaults();
        let result = registry.extract(b"bytes", "application/x-unknown", "t").await;
        assert!(matches!(result, Err(ExtractError::UnsupportedMime(_))));
    }

    #[tokio::test]
    async fn dispatches_text_mime_to_plain_text_extractor() {
        let registry = ExtractorRegistry::with_defaults();
        let doc = registry.extract(b"hello", "text/markdown", "t").await.unwrap();
        assert_eq!(doc.chunks.len(), 1);
    }
}
