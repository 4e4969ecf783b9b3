//! Summarization and sentiment backends.
//!
//! The analyzer only talks to the [`Summarizer`] and [`SentimentClassifier`]
//! traits. Backends are selected by configuration and built lazily through a
//! shared [`ModelHandle`].

pub mod extractive;
pub mod huggingface;
pub mod lexicon;
pub mod models;

pub use extractive::ExtractiveSummarizer;
pub use huggingface::HuggingFaceBackend;
pub use lexicon::LexiconClassifier;
pub use models::ModelHandle;

use crate::config::InferenceConfig;
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        }
    }

    /// Parses the label names used by hosted classification models.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "POSITIVE" | "POS" => Some(SentimentLabel::Positive),
            "NEGATIVE" | "NEG" => Some(SentimentLabel::Negative),
            "NEUTRAL" | "NEU" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub score: f64,
}

impl Sentiment {
    pub fn new(label: SentimentLabel, score: f64) -> Self {
        Self {
            label,
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// Length limits for generated summaries, in words for the offline backend
/// and in tokens for hosted models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBounds {
    pub max_length: usize,
    pub min_length: usize,
}

impl SummaryBounds {
    pub fn new(max_length: usize, min_length: usize) -> Result<Self> {
        if max_length == 0 || min_length > max_length {
            return Err(AnalyzerError::Config {
                message: format!(
                    "Invalid summary bounds: min {} / max {}",
                    min_length, max_length
                ),
            });
        }

        Ok(Self {
            max_length,
            min_length,
        })
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self> {
        Self::new(config.summary_max_length, config.summary_min_length)
    }
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self {
            max_length: 150,
            min_length: 30,
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    fn name(&self) -> &str;

    /// Returns one summary per input, in input order.
    async fn summarize(&self, texts: &[String], bounds: SummaryBounds) -> Result<Vec<String>>;
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Returns one sentiment per input, in input order.
    async fn classify(&self, texts: &[String]) -> Result<Vec<Sentiment>>;
}
