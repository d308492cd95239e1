use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Question;

use super::parse::{parse_question_reply, reject_repeat};
use super::prompt::build_prompt;
use super::{ProviderError, QuestionProvider};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GeminiConfig {
    /// Read the API settings from the environment.
    ///
    /// Returns `None` when `GEMINI_API_KEY` is unset or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("GEMINI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Some(Self {
            base_url,
            api_key: api_key.trim().to_string(),
            model,
        })
    }
}

#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    config: Option<GeminiConfig>,
}

impl GeminiProvider {
    #[must_use]
    pub fn new(config: Option<GeminiConfig>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default HTTP client");
                Client::new()
            });
        Self { client, config }
    }

    async fn generate(&self, prompt: String) -> Result<String, ProviderError> {
        let config = self.config.as_ref().ok_or_else(|| {
            ProviderError::Configuration("no API key set (GEMINI_API_KEY)".into())
        })?;

        let url = format!(
            "{}/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );
        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        tracing::debug!(model = %config.model, "calling question API");
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status, &headers, &body));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::MalformedResponse("empty reply".into()));
        }
        Ok(text)
    }
}

#[async_trait]
impl QuestionProvider for GeminiProvider {
    async fn fetch(&self, level: u8, history: &[String]) -> Result<Question, ProviderError> {
        let text = self.generate(build_prompt(level, history)).await?;
        let question = reject_repeat(parse_question_reply(level, &text)?, history)?;
        tracing::info!(level, "received generated question");
        Ok(question)
    }
}

/// Map a non-success HTTP reply onto the provider error taxonomy.
pub(crate) fn classify_failure(status: StatusCode, headers: &HeaderMap, body: &str) -> ProviderError {
    let error_body: Option<ErrorEnvelope> = serde_json::from_str(body).ok();
    let api_status = error_body
        .as_ref()
        .and_then(|envelope| envelope.error.status.as_deref());

    if status == StatusCode::TOO_MANY_REQUESTS || api_status == Some("RESOURCE_EXHAUSTED") {
        let retry_after_secs = error_body
            .as_ref()
            .and_then(|envelope| retry_delay_from_details(&envelope.error.details))
            .or_else(|| retry_after_header(headers));
        return ProviderError::RateLimited { retry_after_secs };
    }

    let message = error_body
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Configuration(message),
        _ => ProviderError::Network(format!("status {}: {}", status.as_u16(), message)),
    }
}

/// `RetryInfo.retryDelay` is a protobuf duration string such as `"37s"` or
/// `"12.5s"`; fractions round up.
fn retry_delay_from_details(details: &[Value]) -> Option<u64> {
    details
        .iter()
        .filter_map(|detail| detail.get("retryDelay")?.as_str())
        .find_map(|delay| {
            let seconds: f64 = delay.trim().strip_suffix('s')?.parse().ok()?;
            (seconds.is_finite() && seconds >= 0.0).then(|| seconds.ceil() as u64)
        })
}

fn retry_after_header(headers: &HeaderMap) -> Option<u64> {
    headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
    status: Option<String>,
    #[serde(default)]
    details: Vec<Value>,
}
