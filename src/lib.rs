pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod inference;
pub mod report;
pub mod ui;

// Public API re-exports
pub use cli::{Action, Cli, OutputFormat};
pub use config::{BackendKind, CliOverrides, Config, ExtractionConfig, InferenceConfig, OutputConfig};
pub use error::{AnalyzerError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{DocumentFormat, SourceDocument, TextExtractor};
pub use inference::{
    ModelHandle, Sentiment, SentimentClassifier, SentimentLabel, Summarizer, SummaryBounds,
};
pub use report::{
    aggregate, aggregate_sentiments, read_export, AnalysisReport, AnalysisResult, OutputManager,
    SourceInfo, TextAnalysis, EXPORT_FILE_NAME, EXPORT_MEDIA_TYPE,
};
pub use ui::{GracefulShutdown, OperationProgress, OutputFormatter, OutputMode, ProgressManager};

use chrono::Utc;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;

/// Blocks extracted from one file, before any model has seen them.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub source: SourceInfo,
    pub blocks: Vec<String>,
    pub duration: Duration,
}

/// Main library interface: extraction, inference and export for one run.
pub struct ReviewAnalyzer {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
    models: Arc<ModelHandle>,
    extractor: TextExtractor,
}

impl ReviewAnalyzer {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let shutdown = GracefulShutdown::new()?;
        Ok(Self::assemble(config, output_mode, verbose, quiet, shutdown))
    }

    /// Create an analyzer for testing (no signal handler, no progress output)
    #[cfg(test)]
    pub fn new_for_test(config: Config, models: Arc<ModelHandle>) -> Self {
        Self::assemble(
            config,
            OutputMode::Plain,
            0,
            true,
            GracefulShutdown::new_for_test(),
        )
        .with_models(models)
    }

    fn assemble(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet)
            .with_preview_width(config.output.preview_width);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let models = Arc::new(ModelHandle::new(config.inference.clone()));
        let extractor = TextExtractor::from_config(&config.extraction);

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
            models,
            extractor,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    /// Shares an existing model handle instead of the one built from configuration.
    pub fn with_models(mut self, models: Arc<ModelHandle>) -> Self {
        self.models = models;
        self
    }

    /// Summarizes and classifies a single passage. Nothing is exported.
    #[tracing::instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn analyze_text(&self, text: &str) -> Result<TextAnalysis> {
        if text.trim().is_empty() {
            return Err(AnalyzerError::EmptyInput);
        }
        self.shutdown.check_shutdown()?;

        let blocks = vec![text.to_string()];
        let started = Instant::now();

        let summaries = self.summarize_blocks(&blocks).await?;
        let sentiments = self.classify_blocks(&blocks).await?;

        let mut rows = aggregate_sentiments(&blocks, &summaries, &sentiments)?;
        let result = rows.pop().ok_or(AnalyzerError::ShapeMismatch {
            blocks: 1,
            summaries: summaries.len(),
            labels: sentiments.len(),
            confidences: sentiments.len(),
        })?;

        Ok(TextAnalysis {
            result,
            backend: self.models.backend().to_string(),
            inference_duration: started.elapsed(),
            analyzed_at: Utc::now(),
        })
    }

    /// Reads and extracts a file without running any model.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub async fn inspect_file(&self, path: &Path) -> Result<ExtractedDocument> {
        self.shutdown.check_shutdown()?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let format = DocumentFormat::detect(&file_name)?;

        self.output_formatter
            .start_operation(&format!("Extracting text from {}", file_name));
        let progress = OperationProgress::new(&self.progress_manager, "Extracting text", 0);

        let extractor = self.extractor.clone();
        let owned_path = path.to_path_buf();
        let extracted = task::spawn_blocking(move || {
            let document = SourceDocument::open(&owned_path)?;
            let blocks = extractor.extract_document(&document)?;
            Ok::<_, AnalyzerError>((document, blocks))
        })
        .await
        .map_err(|e| AnalyzerError::Extraction {
            format: format.label().to_string(),
            message: format!("Extraction task failed: {}", e),
        })?;

        let (document, blocks) = match extracted {
            Ok(extracted) => extracted,
            Err(e) => {
                progress.abandon_with_message("failed");
                return Err(e);
            }
        };

        progress.finish_with_message(&format!("{} text block(s) extracted", blocks.len()));
        self.shutdown.check_shutdown()?;

        Ok(ExtractedDocument {
            source: SourceInfo {
                file_name: document.file_name.clone(),
                format: document.format,
                size: document.size(),
            },
            blocks,
            duration: progress.elapsed(),
        })
    }

    /// Extracts, summarizes, classifies and exports every block of a file.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub async fn analyze_file(&self, path: &Path) -> Result<AnalysisReport> {
        let extracted = self.inspect_file(path).await?;

        if extracted.blocks.is_empty() {
            return Err(AnalyzerError::NoTextExtracted {
                file_name: extracted.source.file_name,
            });
        }

        self.output_formatter.info(&format!(
            "{} text block(s) extracted",
            extracted.blocks.len()
        ));
        self.warn_about_blank_blocks(&extracted.blocks);

        let output_manager = self.create_output_manager();
        output_manager.prepare()?;

        let inference_started = Instant::now();
        let summaries = self.summarize_blocks(&extracted.blocks).await?;
        let sentiments = self.classify_blocks(&extracted.blocks).await?;
        let inference_duration = inference_started.elapsed();

        let results = aggregate_sentiments(&extracted.blocks, &summaries, &sentiments)?;
        self.shutdown.check_shutdown()?;

        let export = output_manager.write_export(&results)?;

        output_manager.create_analysis_report(
            extracted.source,
            results,
            Some(export),
            &self.models.backend().to_string(),
            extracted.duration,
            inference_duration,
        )
    }

    fn create_output_manager(&self) -> OutputManager {
        OutputManager::new(self.config.export_path())
            .with_force_overwrite(self.config.output.overwrite)
            .with_json_report(self.config.output.write_json_report)
    }

    fn warn_about_blank_blocks(&self, blocks: &[String]) {
        let blank = blocks.iter().filter(|b| b.trim().is_empty()).count();
        if blank > 0 {
            tracing::warn!(blank, "Blank text blocks will be sent to inference");
            self.output_formatter.warning(&format!(
                "{} blank text block(s) will be analyzed; set extraction.keep_blank_lines = false to skip them",
                blank
            ));
        }
    }

    async fn summarize_blocks(&self, blocks: &[String]) -> Result<Vec<String>> {
        let summarizer = self.load_models(|models| models.summarizer())?;
        let bounds = self.models.bounds()?;

        let progress =
            OperationProgress::new(&self.progress_manager, "Summarizing", blocks.len() as u64);
        let summaries = self
            .guarded(summarizer.summarize(blocks, bounds))
            .await
            .inspect_err(|_| progress.abandon_with_message("failed"))?;
        progress.finish_success();

        tracing::debug!(summarizer = summarizer.name(), count = summaries.len(), "Summaries ready");
        Ok(summaries)
    }

    async fn classify_blocks(&self, blocks: &[String]) -> Result<Vec<Sentiment>> {
        let classifier = self.load_models(|models| models.classifier())?;

        let progress = OperationProgress::new(
            &self.progress_manager,
            "Classifying sentiment",
            blocks.len() as u64,
        );
        let sentiments = self
            .guarded(classifier.classify(blocks))
            .await
            .inspect_err(|_| progress.abandon_with_message("failed"))?;
        progress.finish_success();

        tracing::debug!(classifier = classifier.name(), count = sentiments.len(), "Sentiments ready");
        Ok(sentiments)
    }

    fn load_models<F, T>(&self, get: F) -> Result<T>
    where
        F: FnOnce(&ModelHandle) -> Result<T>,
    {
        if self.models.is_loaded() {
            return get(&self.models);
        }

        let spinner = self.progress_manager.create_spinner("Loading models...");
        let loaded = get(&self.models);
        spinner.finish_and_clear();
        loaded
    }

    /// Bounds an inference call by the configured timeout and by Ctrl+C.
    async fn guarded<F, R>(&self, operation: F) -> Result<R>
    where
        F: Future<Output = Result<R>>,
    {
        let timeout = self.config.inference_timeout();
        let bounded = async move {
            match tokio::time::timeout(timeout, operation).await {
                Ok(result) => result,
                Err(_) => Err(AnalyzerError::Timeout {
                    seconds: timeout.as_secs(),
                }),
            }
        };

        self.shutdown.run_cancellable(bounded).await
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::sample().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    pub fn models(&self) -> &Arc<ModelHandle> {
        &self.models
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &AnalyzerError) {
        self.progress_manager.clear();
        self.output_formatter.print_user_friendly_error(error);
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Review Analyzer {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}
