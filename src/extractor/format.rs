use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Document formats accepted for bulk analysis, keyed by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    WordDocument,
    Tabular,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 4] = [
        DocumentFormat::PlainText,
        DocumentFormat::Pdf,
        DocumentFormat::WordDocument,
        DocumentFormat::Tabular,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "txt",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::WordDocument => "docx",
            DocumentFormat::Tabular => "csv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentFormat::PlainText => "plain text",
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::WordDocument => "Word",
            DocumentFormat::Tabular => "CSV",
        }
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.trim_start_matches('.').to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.extension() == extension)
    }

    pub fn detect(file_name: &str) -> Result<Self> {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| AnalyzerError::UnsupportedFormat {
                file_name: file_name.to_string(),
            })
    }

    pub fn supported_extensions() -> Vec<&'static str> {
        Self::ALL.iter().map(|f| f.extension()).collect()
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_supported_suffixes() {
        assert_eq!(DocumentFormat::detect("notes.txt").unwrap(), DocumentFormat::PlainText);
        assert_eq!(DocumentFormat::detect("report.pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(
            DocumentFormat::detect("letter.docx").unwrap(),
            DocumentFormat::WordDocument
        );
        assert_eq!(DocumentFormat::detect("reviews.csv").unwrap(), DocumentFormat::Tabular);
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(DocumentFormat::detect("REVIEWS.CSV").unwrap(), DocumentFormat::Tabular);
        assert_eq!(DocumentFormat::detect("Scan.Pdf").unwrap(), DocumentFormat::Pdf);
    }

    #[test]
    fn test_detect_rejects_unknown_suffixes() {
        for name in ["legacy.doc", "sheet.xlsx", "README", "archive.tar.gz", "notes.txt.bak"] {
            let err = DocumentFormat::detect(name).unwrap_err();
            assert!(
                matches!(err, AnalyzerError::UnsupportedFormat { ref file_name } if file_name == name),
                "Should reject: {}",
                name
            );
        }
    }

    #[test]
    fn test_supported_extensions() {
        assert_eq!(
            DocumentFormat::supported_extensions(),
            vec!["txt", "pdf", "docx", "csv"]
        );
    }
}
