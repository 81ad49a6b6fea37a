mod plain_text;
pub use plain_text::PlainTextExtractor;

#[cfg(feature = "pdf")]
mod pdf;
#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "docx")]
mod docx;
#[cfg(feature = "docx")]
pub use docx::DocxExtractor;
