use clap::Parser;
use review_analyzer::{
    Action, AnalyzerError, Cli, OutputFormatter, OutputMode, ReviewAnalyzer, UserFriendlyError,
};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    setup_logging(cli.verbosity_level(), cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let action = match cli.action() {
        Ok(action) => action,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    let analyzer = match ReviewAnalyzer::from_cli(&cli) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    tracing::debug!(backend = %analyzer.config().inference.backend, ?action, "Starting");

    let outcome = match action {
        Action::AnalyzeText(text) => analyzer.analyze_text(&text).await.map(|analysis| {
            analyzer.output_formatter().print_text_analysis(&analysis);
        }),
        Action::AnalyzeFile(path) if cli.dry_run => {
            analyzer.inspect_file(&path).await.map(|extracted| {
                let formatter = analyzer.output_formatter();
                formatter.print_blocks(&extracted.source.file_name, &extracted.blocks);
                formatter.info("Dry run: no models were run and nothing was exported");
            })
        }
        Action::AnalyzeFile(path) => analyzer.analyze_file(&path).await.map(|report| {
            analyzer.output_formatter().print_analysis_report(&report);
        }),
    };

    match outcome {
        Ok(()) => 0,
        Err(e) => {
            analyzer.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &AnalyzerError) -> i32 {
    match error {
        AnalyzerError::Cancelled => 130, // Interrupted (SIGINT)
        AnalyzerError::EmptyInput | AnalyzerError::UnsupportedFormat { .. } => 2,
        AnalyzerError::MissingColumn { .. } => 3,
        AnalyzerError::NoTextExtracted { .. } => 4,
        AnalyzerError::Inference { .. }
        | AnalyzerError::RateLimited { .. }
        | AnalyzerError::InvalidResponse { .. }
        | AnalyzerError::ShapeMismatch { .. } => 5,
        AnalyzerError::OutputFileExists { .. } => 6,
        AnalyzerError::Timeout { .. } => 7,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "review-analyzer.toml".to_string());

    match ReviewAnalyzer::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  review-analyzer <FILE> --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &AnalyzerError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

/// Logs go to stderr so JSON output on stdout stays parseable. `RUST_LOG`
/// takes precedence over the verbosity flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_directive = match (quiet, verbose) {
        (true, _) => "review_analyzer=error",
        (false, 0) => "review_analyzer=warn",
        (false, 1) => "review_analyzer=info",
        (false, 2) => "review_analyzer=debug",
        (false, _) => "review_analyzer=trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::parse_from([
            "review-analyzer",
            "--generate-config",
            "--config",
            config_path.to_str().unwrap(),
        ]);

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[inference]"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&AnalyzerError::EmptyInput), 2);
        assert_eq!(
            exit_code_for(&AnalyzerError::UnsupportedFormat {
                file_name: "a.pptx".to_string()
            }),
            2
        );
        assert_eq!(
            exit_code_for(&AnalyzerError::MissingColumn {
                column: "review".to_string(),
                available: vec![],
            }),
            3
        );
        assert_eq!(
            exit_code_for(&AnalyzerError::RateLimited {
                backend: "huggingface".to_string()
            }),
            5
        );
        assert_eq!(exit_code_for(&AnalyzerError::Timeout { seconds: 5 }), 7);
        assert_eq!(exit_code_for(&AnalyzerError::Cancelled), 130);
        assert_eq!(
            exit_code_for(&AnalyzerError::Config {
                message: "bad".to_string()
            }),
            1
        );
    }
}
