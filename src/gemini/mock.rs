use super::GenerateService;
use crate::media::ProcessedContent;
use crate::settings::{GenerationSettings, SettingsUpdate};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory [`GenerateService`] for tests: queued replies, recorded
/// requests, and a call counter.
pub struct MockGenerateClient {
    responses: Arc<Mutex<Vec<Result<String>>>>,
    requests: Arc<Mutex<Vec<ProcessedContent>>>,
    call_count: Arc<Mutex<usize>>,
    settings: GenerationSettings,
}

impl MockGenerateClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(Ok(response));
        self
    }

    pub fn with_error(self, error: Error) -> Self {
        self.responses.lock().unwrap().push(Err(error));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Shared handle to the recorded requests, usable after the client has
    /// been boxed behind the service trait.
    pub fn request_log(&self) -> Arc<Mutex<Vec<ProcessedContent>>> {
        Arc::clone(&self.requests)
    }
}

impl Default for MockGenerateClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerateService for MockGenerateClient {
    async fn generate(&self, content: &ProcessedContent) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests.lock().unwrap().push(content.clone());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("mock response".to_string())
        } else {
            responses.remove(0)
        }
    }

    fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn update_settings(&mut self, update: SettingsUpdate) {
        self.settings.apply(update);
    }
}
