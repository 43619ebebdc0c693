use super::{ImageBackend, ImageRequest, TextGenerationService, TextRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A 1x1 PNG returned by [`MockImageBackend`] when no outcome is queued.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, // PNG signature
    0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, // IHDR chunk
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, // 1x1 pixel
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xDE, 0x00, 0x00, 0x00, 0x0C, 0x49,
    0x44, 0x41, // IDAT chunk
    0x54, 0x08, 0x99, 0x63, 0xF8, 0xCF, 0xC0, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0xE2,
    0x25, 0x00, 0xBC, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, // IEND chunk
    0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[derive(Clone)]
pub struct MockTextClient {
    responses: Arc<Mutex<Vec<Vec<String>>>>,
    failure: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<TextRequest>>>,
}

impl MockTextClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(vec![response]);
        self
    }

    pub fn with_candidates(self, candidates: Vec<String>) -> Self {
        self.responses.lock().unwrap().push(candidates);
        self
    }

    /// Every call fails as an unreachable provider would.
    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<TextRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockTextClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerationService for MockTextClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<Vec<String>> {
        let count = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::AiProvider(message));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(vec!["A quiet scene settles into soft light.".to_string()])
        } else {
            let index = (count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

#[derive(Debug, Clone)]
enum MockImageOutcome {
    Image(Vec<u8>),
    Failure(String),
    Hang,
}

#[derive(Clone)]
pub struct MockImageBackend {
    name: String,
    outcomes: Arc<Mutex<Vec<MockImageOutcome>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockImageBackend {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcomes: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_image_response(self, bytes: Vec<u8>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockImageOutcome::Image(bytes));
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push(MockImageOutcome::Failure(message.to_string()));
        self
    }

    /// Never responds; exercises the caller's timeout.
    pub fn hanging(self) -> Self {
        self.outcomes.lock().unwrap().push(MockImageOutcome::Hang);
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageBackend for MockImageBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let count = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(request.prompt.clone());
            prompts.len()
        };

        let outcome = {
            let outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                MockImageOutcome::Image(TINY_PNG.to_vec())
            } else {
                outcomes[(count - 1) % outcomes.len()].clone()
            }
        };

        match outcome {
            MockImageOutcome::Image(bytes) => Ok(bytes),
            MockImageOutcome::Failure(message) => Err(Error::AiProvider(message)),
            MockImageOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(Error::AiProvider("mock backend woke up".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> TextRequest {
        TextRequest {
            prompt: prompt.to_string(),
            max_tokens: 200,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn test_mock_text_client_cycles_responses() {
        let client = MockTextClient::new()
            .with_response("First story".to_string())
            .with_response("Second story".to_string());

        assert_eq!(client.generate_text(&request("a")).await.unwrap(), vec!["First story"]);
        assert_eq!(client.generate_text(&request("b")).await.unwrap(), vec!["Second story"]);
        assert_eq!(client.generate_text(&request("c")).await.unwrap(), vec!["First story"]);
        assert_eq!(client.get_call_count(), 3);
        assert_eq!(client.last_request().unwrap().prompt, "c");
    }

    #[tokio::test]
    async fn test_mock_text_client_failure() {
        let client = MockTextClient::new().with_failure("connection refused");
        let err = client.generate_text(&request("a")).await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
        assert_eq!(client.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_image_backend_default_png() {
        let backend = MockImageBackend::new("mock");
        let bytes = backend
            .generate_image(&ImageRequest {
                prompt: "p".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(bytes, TINY_PNG.to_vec());
        assert_eq!(backend.name(), "mock");
    }

    #[tokio::test]
    async fn test_mock_image_backend_shares_state_across_clones() {
        let backend = MockImageBackend::new("mock").with_failure("503");
        let handle = backend.clone();

        let result = backend
            .generate_image(&ImageRequest {
                prompt: "dunes".to_string(),
            })
            .await;
        assert!(result.is_err());
        assert_eq!(handle.get_call_count(), 1);
        assert_eq!(handle.prompts(), vec!["dunes".to_string()]);
    }
}
