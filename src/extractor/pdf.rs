use crate::error::{AnalyzerError, Result};
use std::panic::{self, AssertUnwindSafe};

/// Extracts one block per page, dropping pages without extractable text.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>> {
    // The PDF parser can panic on malformed content streams.
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| extraction_error("the PDF parser aborted on malformed content".to_string()))?
    .map_err(|e| extraction_error(format!("failed to parse PDF: {}", e)))?;

    let page_count = pages.len();
    let blocks: Vec<String> = pages
        .into_iter()
        .map(|page| page.trim().to_string())
        .filter(|page| !page.is_empty())
        .collect();

    tracing::debug!(
        page_count,
        pages_with_text = blocks.len(),
        "PDF text extraction complete"
    );

    Ok(blocks)
}

fn extraction_error(message: String) -> AnalyzerError {
    AnalyzerError::Extraction {
        format: "PDF".to_string(),
        message,
    }
}
