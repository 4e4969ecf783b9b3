use crate::error::{AnalyzerError, Result};
use crate::inference::{Sentiment, SentimentLabel};
use serde::{Deserialize, Serialize};

/// Decimal places kept when confidences are shown or exported.
pub const CONFIDENCE_DECIMALS: i32 = 4;

/// One analyzed text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub summary: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
}

impl AnalysisResult {
    pub fn rounded_confidence(&self) -> f64 {
        round_confidence(self.confidence)
    }
}

pub fn round_confidence(value: f64) -> f64 {
    let factor = 10f64.powi(CONFIDENCE_DECIMALS);
    (value * factor).round() / factor
}

/// Zips blocks with their model outputs, row `i` built only from index `i`
/// of every input.
pub fn aggregate(
    blocks: &[String],
    summaries: &[String],
    labels: &[SentimentLabel],
    confidences: &[f64],
) -> Result<Vec<AnalysisResult>> {
    let expected = blocks.len();
    if summaries.len() != expected || labels.len() != expected || confidences.len() != expected {
        return Err(AnalyzerError::ShapeMismatch {
            blocks: blocks.len(),
            summaries: summaries.len(),
            labels: labels.len(),
            confidences: confidences.len(),
        });
    }

    Ok(blocks
        .iter()
        .zip(summaries)
        .zip(labels)
        .zip(confidences)
        .map(|(((text, summary), label), confidence)| AnalysisResult {
            text: text.clone(),
            summary: summary.clone(),
            sentiment: *label,
            confidence: *confidence,
        })
        .collect())
}

pub fn aggregate_sentiments(
    blocks: &[String],
    summaries: &[String],
    sentiments: &[Sentiment],
) -> Result<Vec<AnalysisResult>> {
    let labels: Vec<SentimentLabel> = sentiments.iter().map(|s| s.label).collect();
    let confidences: Vec<f64> = sentiments.iter().map(|s| s.score).collect();
    aggregate(blocks, summaries, &labels, &confidences)
}
