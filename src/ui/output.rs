use crate::error::{AnalyzerError, UserFriendlyError};
use crate::extractor::format_bytes;
use crate::inference::SentimentLabel;
use crate::report::output_manager::format_confidence;
use crate::report::{AnalysisReport, AnalysisResult, TextAnalysis};
use crate::ui::progress::format_duration;
use console::{pad_str, style, truncate_str, Alignment, Emoji, Term};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static SPARKLES: Emoji = Emoji("✨ ", "* ");

const SENTIMENT_WIDTH: usize = 9;
const CONFIDENCE_WIDTH: usize = 10;

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
    preview_width: usize,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
            preview_width: 48,
        }
    }

    pub fn with_preview_width(mut self, width: usize) -> Self {
        self.preview_width = width.max(8);
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    /// Warnings are shown even without `-v`; only `--quiet` hides them.
    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &AnalyzerError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_status(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_text_analysis(&self, analysis: &TextAnalysis) {
        let result = &analysis.result;

        match self.mode {
            OutputMode::Human => {
                self.print_header("Summary");
                println!("{}", result.summary);
                println!();
                println!(
                    "Sentiment: {} (Confidence: {})",
                    self.styled_label(result.sentiment),
                    format_percentage(result.confidence)
                );
            }
            OutputMode::Json => {
                let json_output = serde_json::to_string_pretty(analysis)
                    .unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => {
                println!("SUMMARY: {}", result.summary);
                println!("SENTIMENT: {}", result.sentiment);
                println!("CONFIDENCE: {}", format_confidence(result.confidence));
            }
        }
    }

    /// Lists extracted blocks without running any model.
    pub fn print_blocks(&self, file_name: &str, blocks: &[String]) {
        match self.mode {
            OutputMode::Human => {
                self.print_header(&format!("{} text block(s) extracted from {}", blocks.len(), file_name));
                for (index, block) in blocks.iter().enumerate() {
                    println!(
                        "{:>4}  {}",
                        index + 1,
                        preview(block, self.preview_width * 2)
                    );
                }
            }
            OutputMode::Json => {
                self.print_json_object(&serde_json::json!({
                    "type": "blocks",
                    "file_name": file_name,
                    "count": blocks.len(),
                    "blocks": blocks,
                }));
            }
            OutputMode::Plain => {
                println!("BLOCKS: {}", blocks.len());
                for block in blocks {
                    println!("{}", block.replace('\n', " "));
                }
            }
        }
    }

    pub fn print_analysis_report(&self, report: &AnalysisReport) {
        match self.mode {
            OutputMode::Human => self.print_human_report(report),
            OutputMode::Json => {
                let json_output =
                    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
                println!("{}", json_output);
            }
            OutputMode::Plain => self.print_plain_report(report),
        }
    }

    pub fn print_results_table(&self, results: &[AnalysisResult]) {
        for line in render_table(results, self.preview_width) {
            if self.use_colors && line.starts_with('-') {
                println!("{}", style(line).dim());
            } else {
                println!("{}", line);
            }
        }
    }

    pub fn print_header(&self, title: &str) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                println!();
                if self.use_colors {
                    println!("{} {}", SPARKLES, style(title).bold().cyan());
                } else {
                    println!("=== {} ===", title);
                }
                println!();
            }
            OutputMode::Json => {
                self.print_json_status(&serde_json::json!({
                    "type": "header",
                    "title": title
                }));
            }
            OutputMode::Plain => {
                println!("=== {} ===", title);
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn styled_label(&self, label: SentimentLabel) -> String {
        if !self.use_colors {
            return label.to_string();
        }

        match label {
            SentimentLabel::Positive => style(label).green().bold().to_string(),
            SentimentLabel::Negative => style(label).red().bold().to_string(),
            SentimentLabel::Neutral => style(label).yellow().bold().to_string(),
        }
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_status(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    /// Payload documents are the only thing written to stdout in JSON mode.
    fn print_json_object(&self, obj: &serde_json::Value) {
        println!("{}", json_line(obj));
    }

    /// Status lines go to stderr so stdout stays a single JSON document.
    fn print_json_status(&self, obj: &serde_json::Value) {
        eprintln!("{}", json_line(obj));
    }

    fn print_human_report(&self, report: &AnalysisReport) {
        self.print_header(&format!(
            "{} text block(s) extracted from {}",
            report.analysis_summary.total_blocks, report.source.file_name
        ));

        self.print_results_table(&report.results);
        println!();
        self.print_separator();

        println!(
            "  Source:      {} ({}, {})",
            report.source.file_name,
            report.source.format.label(),
            format_bytes(report.source.size)
        );
        println!("  Backend:     {}", report.backend);
        for (label, count) in &report.analysis_summary.sentiment_counts {
            println!(
                "  {}{}",
                pad_str(&format!("{}:", label), 13, Alignment::Left, None),
                count
            );
        }
        println!(
            "  Time taken:  {}",
            format_duration(
                report.analysis_summary.extraction_duration
                    + report.analysis_summary.inference_duration
            )
        );

        self.print_separator();

        if let Some(ref export) = report.export {
            self.success(&format!(
                "Results saved to {} ({} rows)",
                display_path(&export.path),
                export.rows
            ));
        }
    }

    fn print_plain_report(&self, report: &AnalysisReport) {
        println!("REPORT: Analysis completed");
        println!("File: {}", report.source.file_name);
        println!("Format: {}", report.source.format);
        println!("Blocks: {}", report.analysis_summary.total_blocks);
        println!("Backend: {}", report.backend);
        for result in &report.results {
            println!(
                "{}\t{}\t{}",
                result.sentiment,
                format_confidence(result.confidence),
                result.summary.replace('\n', " ")
            );
        }
        if let Some(ref export) = report.export {
            println!("Export: {}", export.path.display());
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn json_line(obj: &serde_json::Value) -> String {
    serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
}

fn format_percentage(confidence: f64) -> String {
    format!("{:.2}%", confidence * 100.0)
}

fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(|p| p.display().to_string()))
        .unwrap_or_else(|| path.display().to_string())
}

/// Single-line preview of a block, cut to `width` columns.
fn preview(text: &str, width: usize) -> String {
    let flattened = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_str(&flattened, width, "…").to_string()
}

fn render_table(results: &[AnalysisResult], preview_width: usize) -> Vec<String> {
    let index_width = results.len().to_string().len().max(1);
    let cell = |text: &str, width: usize| pad_str(text, width, Alignment::Left, None).to_string();

    let header = format!(
        "{}  {}  {}  {}  {}",
        cell("#", index_width),
        cell("Text", preview_width),
        cell("Summary", preview_width),
        cell("Sentiment", SENTIMENT_WIDTH),
        "Confidence"
    );
    let rule = "-".repeat(index_width + 2 * preview_width + SENTIMENT_WIDTH + CONFIDENCE_WIDTH + 8);

    let mut lines = vec![header, rule];
    for (index, result) in results.iter().enumerate() {
        lines.push(format!(
            "{}  {}  {}  {}  {}",
            pad_str(&(index + 1).to_string(), index_width, Alignment::Right, None),
            cell(&preview(&result.text, preview_width), preview_width),
            cell(&preview(&result.summary, preview_width), preview_width),
            cell(result.sentiment.as_str(), SENTIMENT_WIDTH),
            format_confidence(result.confidence)
        ));
    }

    lines
}
