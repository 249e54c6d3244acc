//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! One request per call, no retries. Failures are classified at this
//! boundary: transport problems, auth/endpoint status codes, and response
//! bodies that do not have the expected shape each map to their own error
//! variant.

use super::payload::build_request;
use super::types::{GenerateContentResponse, Part};
use super::GenerateService;
use crate::media::ProcessedContent;
use crate::settings::{GenerationSettings, SettingsUpdate};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    settings: GenerationSettings,
}

impl GeminiClient {
    /// Construct a client. An absent or empty credential is accepted here
    /// and only surfaces as [`Error::MissingCredential`] when a request is
    /// attempted.
    pub fn new(api_key: Option<String>) -> Self {
        Self::new_with_client(api_key, Client::new())
    }

    pub fn new_with_client(api_key: Option<String>, client: Client) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        response.candidates.first().and_then(|candidate| {
            candidate.content.parts.iter().find_map(|part| match part {
                Part::Text { text } => Some(text.clone()),
                Part::InlineData { .. } => None,
            })
        })
    }

    async fn ask(&self, content: &ProcessedContent) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or(Error::MissingCredential)?;

        let built = build_request(content, &self.settings);
        let url = format!(
            "{}/v1/models/{}:generateContent",
            self.base_url,
            built.model.wire_id()
        );

        tracing::debug!("Sending generateContent request to {}", built.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .timeout(REQUEST_TIMEOUT)
            .json(&built.request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                Error::Transport(e.to_string())
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Gemini API error (status {}): {}", status, body);
            return Err(Error::Transport(format!(
                "unexpected status {status}: {body}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            Error::MalformedResponse(e.to_string())
        })?;

        Self::extract_text(&parsed)
            .ok_or_else(|| Error::MalformedResponse("unexpected response shape".to_string()))
    }
}

#[async_trait]
impl GenerateService for GeminiClient {
    async fn generate(&self, content: &ProcessedContent) -> Result<String> {
        self.ask(content).await
    }

    fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn update_settings(&mut self, update: SettingsUpdate) {
        self.settings.apply(update);
    }
}
