use crate::error::{AnalyzerError, Result};
use crate::extractor::DocumentFormat;
use crate::inference::SentimentLabel;
use crate::report::aggregator::{round_confidence, AnalysisResult};
use crate::report::{EXPORT_FILE_NAME, EXPORT_MEDIA_TYPE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const EXPORT_HEADERS: [&str; 4] = ["Text", "Summary", "Sentiment", "Confidence"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub source: SourceInfo,
    pub analysis_summary: AnalysisSummary,
    pub results: Vec<AnalysisResult>,
    pub export: Option<ExportInfo>,
    pub backend: String,
    pub analyzed_at: DateTime<Utc>,
}

/// Result of analyzing a single passage. Never exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub result: AnalysisResult,
    pub backend: String,
    pub inference_duration: Duration,
    pub analyzed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub file_name: String,
    pub format: DocumentFormat,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_blocks: usize,
    pub sentiment_counts: BTreeMap<SentimentLabel, usize>,
    pub average_confidence: f64,
    pub extraction_duration: Duration,
    pub inference_duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportInfo {
    pub path: PathBuf,
    pub media_type: String,
    pub rows: usize,
}

/// One row read back from an export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Summary")]
    pub summary: String,
    #[serde(rename = "Sentiment")]
    pub sentiment: SentimentLabel,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
}

pub struct OutputManager {
    export_path: PathBuf,
    force_overwrite: bool,
    write_json_report: bool,
}

impl OutputManager {
    pub fn new(export_path: PathBuf) -> Self {
        Self {
            export_path,
            force_overwrite: false,
            write_json_report: false,
        }
    }

    pub fn with_force_overwrite(mut self, force: bool) -> Self {
        self.force_overwrite = force;
        self
    }

    pub fn with_json_report(mut self, enabled: bool) -> Self {
        self.write_json_report = enabled;
        self
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    pub fn report_path(&self) -> PathBuf {
        self.export_path.with_extension("json")
    }

    /// Fails before any inference work if the export or the JSON report
    /// would clobber a file.
    pub fn prepare(&self) -> Result<()> {
        self.ensure_writable(&self.export_path)?;
        if self.write_json_report {
            self.ensure_writable(&self.report_path())?;
        }

        if let Some(parent) = self
            .export_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent)?;
        }

        Ok(())
    }

    fn ensure_writable(&self, path: &Path) -> Result<()> {
        if path.exists() && !self.force_overwrite {
            return Err(AnalyzerError::OutputFileExists {
                path: path.display().to_string(),
            });
        }
        Ok(())
    }

    pub fn write_export(&self, results: &[AnalysisResult]) -> Result<ExportInfo> {
        self.prepare()?;

        let bytes = to_csv_bytes(results)?;
        fs::write(&self.export_path, bytes)?;

        tracing::info!(
            path = %self.export_path.display(),
            rows = results.len(),
            "Export written"
        );

        Ok(ExportInfo {
            path: self.export_path.clone(),
            media_type: EXPORT_MEDIA_TYPE.to_string(),
            rows: results.len(),
        })
    }

    pub fn create_analysis_report(
        &self,
        source: SourceInfo,
        results: Vec<AnalysisResult>,
        export: Option<ExportInfo>,
        backend: &str,
        extraction_duration: Duration,
        inference_duration: Duration,
    ) -> Result<AnalysisReport> {
        let analysis_summary =
            summarize_results(&results, extraction_duration, inference_duration);

        let report = AnalysisReport {
            source,
            analysis_summary,
            results,
            export,
            backend: backend.to_string(),
            analyzed_at: Utc::now(),
        };

        if self.write_json_report {
            self.save_report_json(&report)?;
        }

        Ok(report)
    }

    fn save_report_json(&self, report: &AnalysisReport) -> Result<()> {
        let report_path = self.report_path();
        self.ensure_writable(&report_path)?;

        let json_content =
            serde_json::to_string_pretty(report).map_err(|e| AnalyzerError::Config {
                message: format!("Failed to serialize report to JSON: {}", e),
            })?;

        fs::write(&report_path, json_content)?;
        tracing::debug!(path = %report_path.display(), "Report written");

        Ok(())
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new(PathBuf::from(EXPORT_FILE_NAME))
    }
}

fn summarize_results(
    results: &[AnalysisResult],
    extraction_duration: Duration,
    inference_duration: Duration,
) -> AnalysisSummary {
    let mut sentiment_counts = BTreeMap::new();
    for result in results {
        *sentiment_counts.entry(result.sentiment).or_insert(0) += 1;
    }

    let average_confidence = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.confidence).sum::<f64>() / results.len() as f64
    };

    AnalysisSummary {
        total_blocks: results.len(),
        sentiment_counts,
        average_confidence,
        extraction_duration,
        inference_duration,
    }
}

/// Serializes rows as the `Text,Summary,Sentiment,Confidence` export.
pub fn to_csv_bytes(results: &[AnalysisResult]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;
    for result in results {
        let confidence = format_confidence(result.confidence);
        writer.write_record([
            result.text.as_str(),
            result.summary.as_str(),
            result.sentiment.as_str(),
            confidence.as_str(),
        ])?;
    }

    writer.into_inner().map_err(|e| AnalyzerError::Io(e.into_error()))
}

pub fn read_export<P: AsRef<Path>>(path: P) -> Result<Vec<ExportRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ExportRow>, csv::Error>>()?;
    Ok(rows)
}

/// Rounds to four decimals and always keeps a fractional part (`1.0`, `0.5`).
pub fn format_confidence(confidence: f64) -> String {
    let rounded = round_confidence(confidence);
    let text = rounded.to_string();
    if text.contains('.') || !rounded.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(text: &str, summary: &str, sentiment: SentimentLabel, confidence: f64) -> AnalysisResult {
        AnalysisResult {
            text: text.to_string(),
            summary: summary.to_string(),
            sentiment,
            confidence,
        }
    }

    fn sample_rows() -> Vec<AnalysisResult> {
        vec![
            row("Great phone, fast shipping.", "Great phone.", SentimentLabel::Positive, 0.99987),
            row("Broke after a week, \"never\" again", "Broke", SentimentLabel::Negative, 1.0),
            row("It arrived on Tuesday.", "It arrived.", SentimentLabel::Neutral, 0.5),
        ]
    }

    #[test]
    fn test_csv_layout() {
        let bytes = to_csv_bytes(&sample_rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let expected = "Text,Summary,Sentiment,Confidence\n\
                        \"Great phone, fast shipping.\",Great phone.,POSITIVE,0.9999\n\
                        \"Broke after a week, \"\"never\"\" again\",Broke,NEGATIVE,1.0\n\
                        It arrived on Tuesday.,It arrived.,NEUTRAL,0.5\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_header_only_for_no_rows() {
        let text = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text, "Text,Summary,Sentiment,Confidence\n");
    }

    #[test]
    fn test_export_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let manager = OutputManager::new(temp_dir.path().join(EXPORT_FILE_NAME));
        let rows = sample_rows();

        let info = manager.write_export(&rows).unwrap();
        assert_eq!(info.rows, 3);
        assert_eq!(info.media_type, "text/csv");

        let read_back = read_export(&info.path).unwrap();
        assert_eq!(read_back.len(), rows.len());
        for (original, exported) in rows.iter().zip(&read_back) {
            assert_eq!(exported.text, original.text);
            assert_eq!(exported.summary, original.summary);
            assert_eq!(exported.sentiment, original.sentiment);
            assert_eq!(exported.confidence, original.rounded_confidence());
        }
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(EXPORT_FILE_NAME);
        fs::write(&path, "existing").unwrap();

        let manager = OutputManager::new(path.clone());
        assert!(matches!(
            manager.write_export(&sample_rows()),
            Err(AnalyzerError::OutputFileExists { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "existing");

        let manager = manager.with_force_overwrite(true);
        manager.write_export(&sample_rows()).unwrap();
        assert!(fs::read_to_string(&path).unwrap().starts_with("Text,"));
    }

    #[test]
    fn test_prepare_checks_existing_json_report() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("analysis_output.json"), "{}").unwrap();

        let manager = OutputManager::new(temp_dir.path().join(EXPORT_FILE_NAME));
        assert!(manager.prepare().is_ok());

        let manager = manager.with_json_report(true);
        match manager.prepare() {
            Err(AnalyzerError::OutputFileExists { path }) => {
                assert!(path.ends_with("analysis_output.json"))
            }
            other => panic!("expected OutputFileExists, got {:?}", other),
        }
        assert!(!temp_dir.path().join(EXPORT_FILE_NAME).exists());

        assert!(manager.with_force_overwrite(true).prepare().is_ok());
    }

    #[test]
    fn test_creates_missing_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("out.csv");

        OutputManager::new(path.clone())
            .write_export(&sample_rows())
            .unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_json_report() {
        let temp_dir = TempDir::new().unwrap();
        let manager =
            OutputManager::new(temp_dir.path().join(EXPORT_FILE_NAME)).with_json_report(true);
        let rows = sample_rows();
        let export = manager.write_export(&rows).unwrap();

        let report = manager
            .create_analysis_report(
                SourceInfo {
                    file_name: "reviews.csv".to_string(),
                    format: DocumentFormat::Tabular,
                    size: 120,
                },
                rows,
                Some(export),
                "offline",
                Duration::from_millis(5),
                Duration::from_millis(20),
            )
            .unwrap();

        assert_eq!(report.analysis_summary.total_blocks, 3);
        assert_eq!(
            report.analysis_summary.sentiment_counts[&SentimentLabel::Positive],
            1
        );

        let json = fs::read_to_string(temp_dir.path().join("analysis_output.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"]["format"], "tabular");
        assert_eq!(value["results"][1]["sentiment"], "NEGATIVE");
    }

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(1.0), "1.0");
        assert_eq!(format_confidence(0.5), "0.5");
        assert_eq!(format_confidence(0.99987), "0.9999");
        assert_eq!(format_confidence(0.0), "0.0");
    }
}
