//! Turning model outputs into result rows and the CSV export.

pub mod aggregator;
pub mod output_manager;

pub use aggregator::{aggregate, aggregate_sentiments, AnalysisResult};
pub use output_manager::{
    read_export, AnalysisReport, AnalysisSummary, ExportInfo, ExportRow, OutputManager,
    SourceInfo, TextAnalysis,
};

pub const EXPORT_FILE_NAME: &str = "analysis_output.csv";
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";
