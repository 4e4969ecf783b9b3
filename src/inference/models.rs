use crate::config::{BackendKind, InferenceConfig};
use crate::error::Result;
use crate::inference::{
    ExtractiveSummarizer, HuggingFaceBackend, LexiconClassifier, SentimentClassifier, Summarizer,
    SummaryBounds,
};
use std::sync::{Arc, OnceLock};

/// Process-wide handle to the inference backends.
///
/// Created once at startup and shared by reference. Each backend is built
/// on first use and reused for every later call.
pub struct ModelHandle {
    config: InferenceConfig,
    summarizer: OnceLock<Arc<dyn Summarizer>>,
    classifier: OnceLock<Arc<dyn SentimentClassifier>>,
    remote: OnceLock<Arc<HuggingFaceBackend>>,
}

impl ModelHandle {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            config,
            summarizer: OnceLock::new(),
            classifier: OnceLock::new(),
            remote: OnceLock::new(),
        }
    }

    /// Uses the given backends instead of building them from configuration.
    pub fn with_backends(
        config: InferenceConfig,
        summarizer: Arc<dyn Summarizer>,
        classifier: Arc<dyn SentimentClassifier>,
    ) -> Self {
        let handle = Self::new(config);
        let _ = handle.summarizer.set(summarizer);
        let _ = handle.classifier.set(classifier);
        handle
    }

    pub fn backend(&self) -> BackendKind {
        self.config.backend
    }

    pub fn bounds(&self) -> Result<SummaryBounds> {
        SummaryBounds::from_config(&self.config)
    }

    pub fn is_loaded(&self) -> bool {
        self.summarizer.get().is_some() && self.classifier.get().is_some()
    }

    pub fn summarizer(&self) -> Result<Arc<dyn Summarizer>> {
        if let Some(summarizer) = self.summarizer.get() {
            return Ok(summarizer.clone());
        }

        let built: Arc<dyn Summarizer> = match self.config.backend {
            BackendKind::Offline => Arc::new(ExtractiveSummarizer::new()),
            BackendKind::Huggingface => self.remote()?,
        };
        tracing::info!(backend = %self.config.backend, summarizer = built.name(), "Summarizer ready");

        Ok(self.summarizer.get_or_init(|| built).clone())
    }

    pub fn classifier(&self) -> Result<Arc<dyn SentimentClassifier>> {
        if let Some(classifier) = self.classifier.get() {
            return Ok(classifier.clone());
        }

        let built: Arc<dyn SentimentClassifier> = match self.config.backend {
            BackendKind::Offline => Arc::new(LexiconClassifier::new()),
            BackendKind::Huggingface => self.remote()?,
        };
        tracing::info!(backend = %self.config.backend, classifier = built.name(), "Sentiment classifier ready");

        Ok(self.classifier.get_or_init(|| built).clone())
    }

    fn remote(&self) -> Result<Arc<HuggingFaceBackend>> {
        if let Some(remote) = self.remote.get() {
            return Ok(remote.clone());
        }

        let built = Arc::new(HuggingFaceBackend::new(&self.config)?);
        Ok(self.remote.get_or_init(|| built).clone())
    }
}
