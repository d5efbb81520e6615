//! Reqwest-backed Gemini generator.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::dto::{GenerateContentRequest, GenerateContentResponse};
use crate::domain::ports::{StoryGenerator, StoryGeneratorError};
use crate::outbound::http_support::status_message;

/// Public Gemini API root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for [`GeminiHttpGenerator`].
pub struct GeminiSettings {
    /// API root, e.g. [`DEFAULT_GEMINI_BASE_URL`].
    pub base_url: String,
    /// Model name, e.g. `gemini-2.5-pro`.
    pub model: String,
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: Zeroizing<String>,
    /// Whole-request timeout.
    pub timeout: Duration,
}

/// Gemini adapter implementing [`StoryGenerator`].
pub struct GeminiHttpGenerator {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

/// Errors raised while building the adapter.
#[derive(Debug, thiserror::Error)]
pub enum GeminiBuildError {
    /// The base URL and model did not form a valid URL.
    #[error("invalid gemini endpoint {endpoint}: {source}")]
    Endpoint {
        /// Offending URL text.
        endpoint: String,
        /// Parser error.
        source: url::ParseError,
    },
    /// reqwest could not build a client.
    #[error("failed to build gemini http client: {0}")]
    Client(#[from] reqwest::Error),
}

impl GeminiHttpGenerator {
    /// Build an adapter from `settings`.
    ///
    /// # Errors
    ///
    /// Fails when the endpoint URL is malformed or the client cannot be built.
    pub fn new(settings: GeminiSettings) -> Result<Self, GeminiBuildError> {
        let endpoint = generate_content_endpoint(&settings.base_url, &settings.model)?;
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            api_key: settings.api_key,
        })
    }
}

fn generate_content_endpoint(base_url: &str, model: &str) -> Result<Url, GeminiBuildError> {
    let endpoint = format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model.trim()
    );
    Url::parse(&endpoint).map_err(|source| GeminiBuildError::Endpoint { endpoint, source })
}

#[async_trait]
impl StoryGenerator for GeminiHttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, StoryGeneratorError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&GenerateContentRequest::user_prompt(prompt))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(status = status.as_u16(), bytes = body.len(), "gemini responded");
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_story(body.as_ref())
    }
}

fn parse_story(body: &[u8]) -> Result<String, StoryGeneratorError> {
    let decoded: GenerateContentResponse = serde_json::from_slice(body).map_err(|error| {
        StoryGeneratorError::decode(format!("invalid generateContent payload: {error}"))
    })?;
    decoded.into_story().map_err(StoryGeneratorError::decode)
}

fn map_transport_error(error: reqwest::Error) -> StoryGeneratorError {
    if error.is_timeout() {
        StoryGeneratorError::timeout(error.to_string())
    } else {
        StoryGeneratorError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> StoryGeneratorError {
    let message = status_message(status, body);
    match status {
        StatusCode::TOO_MANY_REQUESTS => StoryGeneratorError::rate_limited(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            StoryGeneratorError::timeout(message)
        }
        _ => StoryGeneratorError::upstream(status.as_u16(), message),
    }
}
