use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Unsupported file type: {file_name}")]
    UnsupportedFormat { file_name: String },

    #[error("CSV must contain a column named '{column}'")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("No text was provided for analysis")]
    EmptyInput,

    #[error(
        "Model output shape mismatch: {blocks} blocks, {summaries} summaries, \
         {labels} labels, {confidences} confidences"
    )]
    ShapeMismatch {
        blocks: usize,
        summaries: usize,
        labels: usize,
        confidences: usize,
    },

    #[error("No text blocks could be extracted from {file_name}")]
    NoTextExtracted { file_name: String },

    #[error("File is not valid UTF-8 text: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("Failed to extract text from {format} document: {message}")]
    Extraction { format: String, message: String },

    #[error("CSV operation failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Inference request to {backend} failed: {message}")]
    Inference { backend: String, message: String },

    #[error("Inference backend {backend} is rate limiting requests")]
    RateLimited { backend: String },

    #[error("Inference backend {backend} returned an invalid response: {message}")]
    InvalidResponse { backend: String, message: String },

    #[error("Operation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Operation was cancelled by user")]
    Cancelled,

    #[error("Output file already exists: {path}")]
    OutputFileExists { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for AnalyzerError {
    fn user_message(&self) -> String {
        match self {
            AnalyzerError::UnsupportedFormat { file_name } => {
                format!("Unsupported file type: {}", file_name)
            }
            AnalyzerError::MissingColumn { column, available } => {
                if available.is_empty() {
                    format!("CSV must contain a column named '{}'.", column)
                } else {
                    format!(
                        "CSV must contain a column named '{}' (found: {}).",
                        column,
                        available.join(", ")
                    )
                }
            }
            AnalyzerError::EmptyInput => "Please enter some text.".to_string(),
            AnalyzerError::NoTextExtracted { file_name } => {
                format!("No text blocks found in {}", file_name)
            }
            AnalyzerError::Decode(_) => {
                "The text file could not be decoded as UTF-8".to_string()
            }
            AnalyzerError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            AnalyzerError::RateLimited { backend } => {
                format!("The {} backend is rate limiting requests", backend)
            }
            AnalyzerError::Timeout { seconds } => {
                format!("Inference timed out after {} seconds", seconds)
            }
            AnalyzerError::OutputFileExists { path } => {
                format!("Output file already exists: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            AnalyzerError::UnsupportedFormat { .. } => Some(
                "Upload a .txt, .pdf, .docx, or .csv file.".to_string()
            ),
            AnalyzerError::MissingColumn { column, .. } => Some(format!(
                "Rename the column holding the reviews to '{}' (the name is case-sensitive).",
                column
            )),
            AnalyzerError::EmptyInput => Some(
                "Pass a non-blank paragraph with --text or provide a file to analyze.".to_string()
            ),
            AnalyzerError::NoTextExtracted { .. } => Some(
                "Scanned PDFs without a text layer cannot be analyzed. Check that the document contains selectable text.".to_string()
            ),
            AnalyzerError::Decode(_) => Some(
                "Re-save the file with UTF-8 encoding and try again.".to_string()
            ),
            AnalyzerError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            AnalyzerError::Inference { .. } => Some(
                "Check the inference endpoint and your network connection, or use --backend offline.".to_string()
            ),
            AnalyzerError::RateLimited { .. } => Some(
                "Wait a moment and try again, or set an API token in the configured environment variable.".to_string()
            ),
            AnalyzerError::Timeout { .. } => Some(
                "Large documents take longer to summarize. Increase inference.timeout in the configuration.".to_string()
            ),
            AnalyzerError::OutputFileExists { .. } => Some(
                "Choose a different path with --output, or use --force to overwrite.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for AnalyzerError {
    fn from(error: toml::de::Error) -> Self {
        AnalyzerError::Config {
            message: error.to_string(),
        }
    }
}

impl From<url::ParseError> for AnalyzerError {
    fn from(error: url::ParseError) -> Self {
        AnalyzerError::Config {
            message: format!("Invalid inference endpoint: {}", error),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
