//! Gemini API integration
//!
//! Wire types, payload construction, and the HTTP client for the
//! `generateContent` endpoint, behind a service trait so the chat loop can
//! be driven by a mock in tests.

pub mod client;
pub mod mock;
pub mod payload;
pub mod types;

pub use client::GeminiClient;
pub use mock::MockGenerateClient;

use crate::media::ProcessedContent;
use crate::settings::{GenerationSettings, SettingsUpdate};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerateService: Send + Sync {
    /// Send one request and return the first candidate's text.
    async fn generate(&self, content: &ProcessedContent) -> Result<String>;

    fn settings(&self) -> &GenerationSettings;

    fn update_settings(&mut self, update: SettingsUpdate);
}
