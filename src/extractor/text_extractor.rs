use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::extractor::{docx, pdf, plain_text, tabular, DocumentFormat, SourceDocument};

/// Turns a document into the ordered text blocks that get analyzed.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    keep_blank_lines: bool,
}

impl TextExtractor {
    pub fn new() -> Self {
        Self {
            keep_blank_lines: true,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_keep_blank_lines(config.keep_blank_lines)
    }

    pub fn with_keep_blank_lines(mut self, keep: bool) -> Self {
        self.keep_blank_lines = keep;
        self
    }

    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub fn extract(&self, bytes: &[u8], format: DocumentFormat) -> Result<Vec<String>> {
        let blocks = match format {
            DocumentFormat::PlainText => plain_text::extract_lines(bytes, self.keep_blank_lines)?,
            DocumentFormat::Pdf => pdf::extract_pages(bytes)?,
            DocumentFormat::WordDocument => docx::extract_paragraphs(bytes)?,
            DocumentFormat::Tabular => tabular::extract_column(bytes, tabular::REVIEW_COLUMN)?,
        };

        tracing::info!(blocks = blocks.len(), "Text extraction complete");
        Ok(blocks)
    }

    /// Detects the format from the file name suffix, then extracts.
    pub fn extract_named(&self, bytes: &[u8], file_name: &str) -> Result<Vec<String>> {
        let format = DocumentFormat::detect(file_name)?;
        self.extract(bytes, format)
    }

    pub fn extract_document(&self, document: &SourceDocument) -> Result<Vec<String>> {
        self.extract(&document.bytes, document.format)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;

    #[test]
    fn test_dispatch_by_file_name() {
        let extractor = TextExtractor::new();

        let lines = extractor.extract_named(b"one\n\ntwo", "notes.txt").unwrap();
        assert_eq!(lines, vec!["one", "", "two"]);

        let cells = extractor
            .extract_named(b"review\nSolid build\n", "reviews.csv")
            .unwrap();
        assert_eq!(cells, vec!["Solid build"]);
    }

    #[test]
    fn test_docx_dispatch() {
        let xml = docx::tests::document_xml(
            &[docx::tests::paragraph("First"), docx::tests::paragraph("Second")].concat(),
        );
        let bytes = docx::tests::build_docx(&xml);

        let blocks = TextExtractor::new()
            .extract(&bytes, DocumentFormat::WordDocument)
            .unwrap();

        assert_eq!(blocks, vec!["First", "Second"]);
    }

    #[test]
    fn test_pdf_dispatch() {
        let bytes = pdf::tests::build_pdf(&[Some("Only page")]);

        let blocks = TextExtractor::new()
            .extract_named(&bytes, "scan.pdf")
            .unwrap();

        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_unsupported_file_name_yields_no_blocks() {
        let result = TextExtractor::new().extract_named(b"irrelevant", "deck.pptx");
        assert!(matches!(result, Err(AnalyzerError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_missing_review_column_yields_no_blocks() {
        let result = TextExtractor::new().extract(b"text\nhello\n", DocumentFormat::Tabular);
        assert!(matches!(result, Err(AnalyzerError::MissingColumn { .. })));
    }

    #[test]
    fn test_blank_line_policy_from_config() {
        let config = ExtractionConfig {
            keep_blank_lines: false,
        };
        let blocks = TextExtractor::from_config(&config)
            .extract(b"a\n\nb\n", DocumentFormat::PlainText)
            .unwrap();
        assert_eq!(blocks, vec!["a", "b"]);
    }
}
