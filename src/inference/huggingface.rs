use crate::config::InferenceConfig;
use crate::error::{AnalyzerError, Result};
use crate::inference::{Sentiment, SentimentClassifier, SentimentLabel, Summarizer, SummaryBounds};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const BACKEND_NAME: &str = "huggingface";

/// Client for the Hugging Face Inference API serving both pipelines.
pub struct HuggingFaceBackend {
    client: Client,
    endpoint: Url,
    api_token: Option<String>,
    summarization_model: String,
    sentiment_model: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct SummarizationRequest<'a> {
    inputs: &'a [String],
    parameters: SummarizationParameters,
    options: RequestOptions,
}

#[derive(Serialize)]
struct SummarizationParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a [String],
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

/// Batched inputs come back as one candidate list per input; some servers
/// return a flat list instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl HuggingFaceBackend {
    pub fn new(config: &InferenceConfig) -> Result<Self> {
        let mut endpoint = Url::parse(&config.endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        let timeout = Duration::from_secs(config.timeout);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("review-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalyzerError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let api_token = std::env::var(&config.api_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty());

        if api_token.is_none() {
            tracing::warn!(
                variable = %config.api_token_env,
                "No API token set; anonymous requests are heavily rate limited"
            );
        }

        Ok(Self {
            client,
            endpoint,
            api_token,
            summarization_model: config.summarization_model.clone(),
            sentiment_model: config.sentiment_model.clone(),
            timeout,
        })
    }

    pub fn model_url(&self, model: &str) -> Result<Url> {
        Ok(self.endpoint.join(&format!("models/{}", model))?)
    }

    async fn post<B: Serialize + ?Sized>(&self, model: &str, body: &B) -> Result<reqwest::Response> {
        let url = self.model_url(model)?;
        tracing::debug!(%url, "Sending inference request");

        let mut request = self.client.post(url).json(body);
        if let Some(ref token) = self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.request_error(e))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnalyzerError::RateLimited {
                backend: BACKEND_NAME.to_string(),
            });
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::Inference {
                backend: BACKEND_NAME.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        Ok(response)
    }

    fn request_error(&self, error: reqwest::Error) -> AnalyzerError {
        if error.is_timeout() {
            AnalyzerError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            AnalyzerError::Inference {
                backend: BACKEND_NAME.to_string(),
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl Summarizer for HuggingFaceBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    #[tracing::instrument(skip(self, texts), fields(model = %self.summarization_model, count = texts.len()))]
    async fn summarize(&self, texts: &[String], bounds: SummaryBounds) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = SummarizationRequest {
            inputs: texts,
            parameters: SummarizationParameters {
                max_length: bounds.max_length,
                min_length: bounds.min_length,
                do_sample: false,
            },
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let outputs: Vec<SummaryOutput> = self
            .post(&self.summarization_model, &request)
            .await?
            .json()
            .await
            .map_err(|e| invalid_response(e.to_string()))?;

        if outputs.len() != texts.len() {
            return Err(invalid_response(format!(
                "expected {} summaries, got {}",
                texts.len(),
                outputs.len()
            )));
        }

        Ok(outputs.into_iter().map(|o| o.summary_text).collect())
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    #[tracing::instrument(skip(self, texts), fields(model = %self.sentiment_model, count = texts.len()))]
    async fn classify(&self, texts: &[String]) -> Result<Vec<Sentiment>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = ClassificationRequest {
            inputs: texts,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let response: ClassificationResponse = self
            .post(&self.sentiment_model, &request)
            .await?
            .json()
            .await
            .map_err(|e| invalid_response(e.to_string()))?;

        parse_classification(response, texts.len())
    }
}

fn parse_classification(response: ClassificationResponse, expected: usize) -> Result<Vec<Sentiment>> {
    let candidates: Vec<Vec<LabelScore>> = match response {
        ClassificationResponse::Nested(lists) => lists,
        ClassificationResponse::Flat(list) if list.len() == expected => {
            list.into_iter().map(|item| vec![item]).collect()
        }
        ClassificationResponse::Flat(list) if expected == 1 => vec![list],
        ClassificationResponse::Flat(list) => {
            return Err(invalid_response(format!(
                "expected {} classifications, got {}",
                expected,
                list.len()
            )))
        }
    };

    if candidates.len() != expected {
        return Err(invalid_response(format!(
            "expected {} classifications, got {}",
            expected,
            candidates.len()
        )));
    }

    candidates.into_iter().map(top_sentiment).collect()
}

fn top_sentiment(candidates: Vec<LabelScore>) -> Result<Sentiment> {
    let best = candidates
        .into_iter()
        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
        .ok_or_else(|| invalid_response("empty label list".to_string()))?;

    let label = SentimentLabel::from_label(&best.label)
        .ok_or_else(|| invalid_response(format!("unknown sentiment label '{}'", best.label)))?;

    Ok(Sentiment::new(label, best.score))
}

fn invalid_response(message: String) -> AnalyzerError {
    AnalyzerError::InvalidResponse {
        backend: BACKEND_NAME.to_string(),
        message,
    }
}
