//! Client for the hosted text generation service.
//!
//! The client makes exactly one request per call and classifies the result.
//! Retries and fallback selection belong to the orchestrator.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::GenerationOutcome;
use crate::error::{Error, Result};

/// Default inference endpoint base URL
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Default model name
pub const DEFAULT_MODEL: &str = "gpt2";

/// Request timeout for a single generation call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Capability to turn a prompt into generated text.
///
/// Implementations never return an error: every failure is folded into a
/// [`GenerationOutcome`] variant.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> GenerationOutcome;
}

/// Fixed sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub max_length: u32,
    pub min_length: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 400,
            min_length: 150,
            temperature: 0.9,
            top_p: 0.9,
        }
    }
}

/// Connection settings for [`HuggingFaceClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub params: GenerationParams,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            params: GenerationParams::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    temperature: f32,
    top_p: f32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct InferenceItem {
    generated_text: Option<String>,
    summary_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Many(Vec<InferenceItem>),
    One(InferenceItem),
}

/// Text generation over the hosted inference HTTP API.
pub struct HuggingFaceClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    params: GenerationParams,
}

impl HuggingFaceClient {
    /// Build a client. The api key is sent as a bearer token.
    pub fn new(api_key: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|e| Error::HttpClient(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/{}",
            options.base_url.trim_end_matches('/'),
            options.model
        );

        Ok(Self {
            http,
            endpoint,
            api_key: api_key.into(),
            params: options.params,
        })
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body<'a>(&self, prompt: &'a str) -> InferenceRequest<'a> {
        InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_length: self.params.max_length,
                min_length: self.params.min_length,
                temperature: self.params.temperature,
                top_p: self.params.top_p,
                return_full_text: false,
            },
        }
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceClient {
    async fn generate(&self, prompt: &str) -> GenerationOutcome {
        debug!(endpoint = %self.endpoint, "Requesting generation");

        let resp = match self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                warn!(error = %e, "Generation request timed out");
                return GenerationOutcome::Failure(format!("request timed out: {}", e));
            }
            Err(e) => {
                warn!(error = %e, "Generation request failed");
                return GenerationOutcome::Failure(format!("HTTP request failed: {}", e));
            }
        };

        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => return GenerationOutcome::Failure(format!("Failed to read response: {}", e)),
        };

        interpret_response(status, &body, prompt)
    }
}

/// Classify a raw HTTP response from the inference API.
pub fn interpret_response(status: StatusCode, body: &str, prompt: &str) -> GenerationOutcome {
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return GenerationOutcome::ServiceDegraded;
    }

    if !status.is_success() {
        return GenerationOutcome::Failure(format!("HTTP {}: {}", status, body.trim()));
    }

    let text = match serde_json::from_str::<InferenceResponse>(body) {
        Ok(InferenceResponse::Many(items)) => items.into_iter().next().and_then(InferenceItem::text),
        Ok(InferenceResponse::One(item)) => item.text(),
        Err(_) => None,
    };

    match text {
        Some(text) => GenerationOutcome::success(text, prompt),
        None => GenerationOutcome::Failure("Invalid response from generation service".to_string()),
    }
}

impl InferenceItem {
    fn text(self) -> Option<String> {
        self.generated_text
            .or(self.summary_text)
            .filter(|t| !t.trim().is_empty())
    }
}
