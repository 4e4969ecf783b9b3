use crate::error::{AnalyzerError, Result};
use crate::report::EXPORT_FILE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Every section and field falls back to its default, so a file only needs
/// the settings it changes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub inference: InferenceConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Keep blank lines of plain-text files as (empty) blocks.
    pub keep_blank_lines: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub backend: BackendKind,
    pub summary_max_length: usize,
    pub summary_min_length: usize,
    pub summarization_model: String,
    pub sentiment_model: String,
    pub endpoint: String,
    pub api_token_env: String,
    pub timeout: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub file_name: String,
    pub overwrite: bool,
    pub write_json_report: bool,
    pub preview_width: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process extractive summarizer and lexicon classifier
    Offline,
    /// Hugging Face Inference API
    Huggingface,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Offline => write!(f, "offline"),
            BackendKind::Huggingface => write!(f, "huggingface"),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            keep_blank_lines: true,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Offline,
            summary_max_length: 150,
            summary_min_length: 30,
            summarization_model: "sshleifer/distilbart-cnn-12-6".to_string(),
            sentiment_model: "distilbert-base-uncased-finetuned-sst-2-english".to_string(),
            endpoint: "https://api-inference.huggingface.co".to_string(),
            api_token_env: "HF_TOKEN".to_string(),
            timeout: 120,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            file_name: EXPORT_FILE_NAME.to_string(),
            overwrite: false,
            write_json_report: false,
            preview_width: 48,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(AnalyzerError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| AnalyzerError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| AnalyzerError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["review-analyzer.toml", ".review-analyzer.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        tracing::debug!(path = default_path, "Using configuration file");
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(backend) = cli_args.backend {
            self.inference.backend = backend;
        }

        if let Some(max_length) = cli_args.max_length {
            self.inference.summary_max_length = max_length;
        }

        match (cli_args.max_length, cli_args.min_length) {
            (_, Some(min_length)) => self.inference.summary_min_length = min_length,
            (Some(max_length), None) if self.inference.summary_min_length > max_length => {
                tracing::debug!(
                    from = self.inference.summary_min_length,
                    to = max_length,
                    "Lowering summary min length to the requested max length"
                );
                self.inference.summary_min_length = max_length;
            }
            _ => {}
        }

        if let Some(ref output_path) = cli_args.output_path {
            if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                self.output.directory = parent.to_path_buf();
            }
            if let Some(file_name) = output_path.file_name() {
                self.output.file_name = file_name.to_string_lossy().to_string();
            }
        }

        if cli_args.force {
            self.output.overwrite = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| AnalyzerError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| AnalyzerError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.inference.summary_max_length == 0 {
            return Err(AnalyzerError::Config {
                message: "Summary max length must be greater than 0".to_string(),
            });
        }

        if self.inference.summary_min_length > self.inference.summary_max_length {
            return Err(AnalyzerError::Config {
                message: format!(
                    "Summary min length ({}) cannot exceed max length ({})",
                    self.inference.summary_min_length, self.inference.summary_max_length
                ),
            });
        }

        if self.inference.timeout == 0 {
            return Err(AnalyzerError::Config {
                message: "Inference timeout must be greater than 0".to_string(),
            });
        }

        if self.inference.backend == BackendKind::Huggingface {
            self.endpoint_url()?;

            if self.inference.summarization_model.trim().is_empty()
                || self.inference.sentiment_model.trim().is_empty()
            {
                return Err(AnalyzerError::Config {
                    message: "Model names cannot be empty".to_string(),
                });
            }
        }

        if self.output.file_name.trim().is_empty() {
            return Err(AnalyzerError::Config {
                message: "Output file name cannot be empty".to_string(),
            });
        }

        if self.output.directory.is_file() {
            return Err(AnalyzerError::Config {
                message: format!(
                    "Output directory is a file: {}",
                    self.output.directory.display()
                ),
            });
        }

        Ok(())
    }

    pub fn endpoint_url(&self) -> Result<Url> {
        let url = Url::parse(&self.inference.endpoint)?;

        match url.scheme() {
            "https" | "http" => Ok(url),
            scheme => Err(AnalyzerError::Config {
                message: format!("Unsupported endpoint scheme '{}': use http or https", scheme),
            }),
        }
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_secs(self.inference.timeout)
    }

    pub fn export_path(&self) -> PathBuf {
        self.output.directory.join(&self.output.file_name)
    }

    /// Defaults with a relative output directory, as written by `--generate-config`.
    pub fn sample() -> Self {
        let mut sample_config = Self::default();
        sample_config.output.directory = PathBuf::from(".");
        sample_config
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub backend: Option<BackendKind>,
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub output_path: Option<PathBuf>,
    pub force: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: Option<BackendKind>) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_min_length(mut self, min_length: Option<usize>) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_output_path(mut self, output_path: Option<PathBuf>) -> Self {
        self.output_path = output_path;
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}
