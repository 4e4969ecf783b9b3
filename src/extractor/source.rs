use crate::error::{AnalyzerError, Result};
use crate::extractor::DocumentFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// A file handed to the analyzer, read fully into memory.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub file_name: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    /// Reads `path` after checking that its suffix names a supported format.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let format = DocumentFormat::detect(&file_name)?;

        if !path.is_file() {
            return Err(AnalyzerError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("No such file: {}", path.display()),
            )));
        }

        let bytes = fs::read(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            format,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
