//! # Gemini HTTP Client
//!
//! Production client for Google's Gemini `generateContent` API. Wraps a
//! `reqwest::Client` with the backend-specific base URL, API-key header,
//! and request/response mapping.
//!
//! ## Error Handling
//!
//! HTTP failures map to [`BackendError`] with diagnostic context including
//! the endpoint URL, HTTP status, and a response body excerpt.
//!
//! ## Timeout & Retry
//!
//! Each request uses a per-request timeout (configurable, default 30s).
//! Retries are NOT built into the client — a failed generation is surfaced
//! unchanged to the caller.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::{BackendHealth, CompletionBackend};
use crate::error::BackendError;

/// Prompt used by the connectivity probe.
const PROBE_PROMPT: &str = "Health check test";

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL of the API (e.g., `https://generativelanguage.googleapis.com`).
    pub base_url: String,
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Model name (default: `gemini-1.5-flash`).
    pub model: String,
    /// Sampling temperature. Kept very low for consistent formatting.
    pub temperature: f64,
    /// Completion token budget.
    pub max_output_tokens: u32,
    /// Request timeout in seconds (default: 30).
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create a configuration with default model and timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.1,
            max_output_tokens: 4000,
            timeout_secs: 30,
        }
    }
}

/// HTTP client for the Gemini `generateContent` API.
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// [`BackendError::InvalidConfig`] when the base URL does not parse or
    /// the API key contains characters invalid in an HTTP header.
    pub fn new(config: GeminiConfig) -> Result<Self, BackendError> {
        Url::parse(&config.base_url)
            .map_err(|e| BackendError::InvalidConfig(format!("invalid base URL: {e}")))?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            reqwest::header::HeaderValue::from_str(&config.api_key)
                .map_err(|_| BackendError::InvalidConfig("invalid API key characters".into()))?,
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| BackendError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let endpoint = self.endpoint();
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|source| BackendError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse =
            response
                .json()
                .await
                .map_err(|source| BackendError::Deserialization {
                    endpoint: endpoint.clone(),
                    source,
                })?;

        let text = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .concat()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(BackendError::EmptyCompletion);
        }

        tracing::debug!(endpoint = %endpoint, chars = text.len(), "completion received");
        Ok(text)
    }

    async fn probe(&self) -> BackendHealth {
        match self.generate(PROBE_PROMPT).await {
            Ok(_) => BackendHealth::Healthy,
            Err(err) => BackendHealth::Unavailable {
                reason: err.to_string(),
            },
        }
    }
}

// ── Wire types ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}
