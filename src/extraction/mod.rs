//! PDF text extraction.
//!
//! The extractor turns raw upload bytes into a single page-ordered string. Pages without a
//! usable text layer (scanned images, undecodable fonts) are skipped; only a document whose
//! pages collectively yield nothing but whitespace is rejected.

use lopdf::Document;
use thiserror::Error;

/// Errors raised while turning PDF bytes into text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The bytes are not a parseable PDF container.
    #[error("Failed to parse PDF: {0}")]
    Parse(String),
    /// The document parsed but contains no readable text.
    #[error("No readable text in PDF")]
    NoReadableText,
}

/// Text pulled from a document: every non-empty page followed by a line break, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    pages_with_text: usize,
}

impl ExtractedText {
    /// Borrow the concatenated text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of pages that contributed text.
    pub fn pages_with_text(&self) -> usize {
        self.pages_with_text
    }

    /// Consume the wrapper and return the owned text.
    pub fn into_string(self) -> String {
        self.text
    }
}

/// Interface implemented by PDF text extraction backends.
pub trait TextExtractor: Send + Sync {
    /// Extract page-ordered text from raw PDF bytes.
    fn extract(&self, document: &[u8]) -> Result<ExtractedText, ExtractionError>;
}

/// Concatenate page texts, skipping pages that produced nothing.
///
/// Fails with [`ExtractionError::NoReadableText`] when the result is blank.
pub fn assemble_pages<I>(pages: I) -> Result<ExtractedText, ExtractionError>
where
    I: IntoIterator<Item = String>,
{
    let mut text = String::new();
    let mut pages_with_text = 0;
    for page in pages {
        if page.is_empty() {
            continue;
        }
        text.push_str(&page);
        text.push('\n');
        pages_with_text += 1;
    }

    if text.trim().is_empty() {
        return Err(ExtractionError::NoReadableText);
    }

    Ok(ExtractedText {
        text,
        pages_with_text,
    })
}

/// Extractor backed by `lopdf`'s per-page text decoding.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl LopdfExtractor {
    /// Construct a new extractor.
    pub const fn new() -> Self {
        Self
    }
}

impl TextExtractor for LopdfExtractor {
    fn extract(&self, document: &[u8]) -> Result<ExtractedText, ExtractionError> {
        let pdf =
            Document::load_mem(document).map_err(|error| ExtractionError::Parse(error.to_string()))?;
        let pages = pdf.get_pages();
        tracing::debug!(pages = pages.len(), bytes = document.len(), "Parsed PDF");

        // `get_pages` is keyed by page number, so iteration follows document order.
        let texts = pages.into_keys().map(|page_number| {
            match pdf.extract_text(&[page_number]) {
                Ok(text) => text,
                Err(error) => {
                    tracing::debug!(page = page_number, error = %error, "Skipping page without text");
                    String::new()
                }
            }
        });

        assemble_pages(texts)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn assemble_pages_appends_newline_per_page() {
        let text = assemble_pages(vec!["first".to_string(), "second".to_string()])
            .expect("text assembled");
        assert_eq!(text.as_str(), "first\nsecond\n");
        assert_eq!(text.pages_with_text(), 2);
    }

    #[test]
    fn assemble_pages_skips_empty_pages() {
        let text = assemble_pages(vec![
            String::new(),
            "body".to_string(),
            String::new(),
        ])
        .expect("text assembled");
        assert_eq!(text.into_string(), "body\n");
    }

    #[test]
    fn assemble_pages_rejects_whitespace_only_documents() {
        let error = assemble_pages(vec!["   ".to_string(), "\n\t".to_string()])
            .expect_err("blank text rejected");
        assert!(matches!(error, ExtractionError::NoReadableText));

        let error = assemble_pages(Vec::<String>::new()).expect_err("no pages rejected");
        assert!(matches!(error, ExtractionError::NoReadableText));
    }

    #[test]
    fn extracts_text_in_page_order() {
        let bytes = pdf_with_pages(&[Some("Alpha page"), None, Some("Omega page")]);
        let text = LopdfExtractor::new().extract(&bytes).expect("text extracted");
        let body = text.as_str();

        let alpha = body.find("Alpha").expect("first page text present");
        let omega = body.find("Omega").expect("last page text present");
        assert!(alpha < omega);
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn textless_document_is_rejected() {
        let bytes = pdf_with_pages(&[None, None]);
        let error = LopdfExtractor::new()
            .extract(&bytes)
            .expect_err("no text layer");
        assert!(matches!(error, ExtractionError::NoReadableText));
    }

    #[test]
    fn empty_buffer_is_a_parse_error() {
        let error = LopdfExtractor::new().extract(&[]).expect_err("empty input");
        match error {
            ExtractionError::Parse(message) => assert!(!message.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn random_bytes_are_a_parse_error() {
        let noise: Vec<u8> = (0..512u32).map(|i| (i * 37 % 251) as u8).collect();
        let error = LopdfExtractor::new().extract(&noise).expect_err("noise input");
        assert!(matches!(error, ExtractionError::Parse(_)));
    }
}
