use crate::config::{BackendKind, CliOverrides, Config};
use crate::error::{AnalyzerError, Result};
use crate::extractor::DocumentFormat;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "review-analyzer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Summarize reviews and score their sentiment")]
#[command(
    long_about = "Review Analyzer extracts text blocks from a .txt, .pdf, .docx or .csv file \
                  (or takes a single paragraph), summarizes every block, classifies its \
                  sentiment and exports the results to analysis_output.csv."
)]
#[command(before_help = "📝 Review Analyzer - Summarization & Sentiment")]
#[command(after_help = "EXAMPLES:\n  \
    review-analyzer --text \"This product is amazing and works great.\"\n  \
    review-analyzer reviews.csv\n  \
    review-analyzer feedback.docx --output results/feedback.csv --force\n  \
    review-analyzer report.pdf --backend huggingface --max-length 80 --min-length 20\n  \
    review-analyzer notes.txt --dry-run")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// File to analyze (.txt, .pdf, .docx or .csv)
    #[arg(conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Analyze a single paragraph instead of a file
    #[arg(short, long)]
    pub text: Option<String>,

    /// Export path for the results CSV
    #[arg(short, long, help = "Export path (default: analysis_output.csv)")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Inference backend
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Upper bound for summary length
    #[arg(long, help = "Maximum summary length (default: 150)")]
    pub max_length: Option<usize>,

    /// Lower bound for summary length
    #[arg(long, help = "Minimum summary length (default: 30)")]
    pub min_length: Option<usize>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of an existing export
    #[arg(long, help = "Overwrite an existing export file")]
    pub force: bool,

    /// Dry run (extract and list blocks without running the models)
    #[arg(long, help = "Show the extracted text blocks without analyzing them")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

/// What the user asked the analyzer to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AnalyzeText(String),
    AnalyzeFile(PathBuf),
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_backend(self.backend)
            .with_max_length(self.max_length)
            .with_min_length(self.min_length)
            .with_output_path(self.output.clone())
            .with_force(self.force)
    }

    /// Exactly one of FILE or `--text` must be given.
    pub fn action(&self) -> Result<Action> {
        match (&self.input, &self.text) {
            (Some(path), None) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                DocumentFormat::detect(&file_name)?;
                Ok(Action::AnalyzeFile(path.clone()))
            }
            (None, Some(text)) => Ok(Action::AnalyzeText(text.clone())),
            (None, None) => Err(AnalyzerError::Config {
                message: "Provide a file to analyze or a paragraph with --text".to_string(),
            }),
            (Some(_), Some(_)) => Err(AnalyzerError::Config {
                message: "Provide either a file or --text, not both".to_string(),
            }),
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
