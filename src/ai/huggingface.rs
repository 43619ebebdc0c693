//! Hugging Face Inference API image backend.
//!
//! Text-to-image models answer `POST /models/{model}` with raw image bytes.

use crate::ai::{ImageBackend, ImageRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

pub struct HuggingFaceImageClient {
    client: Client,
    api_key: String,
    model: String,
    name: String,
    base_url: String,
    timeout: Duration,
}

impl HuggingFaceImageClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            name: format!("huggingface:{}", model),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl ImageBackend for HuggingFaceImageClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        tracing::debug!("Sending inference request to {}", url);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest {
                inputs: &request.prompt,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::AiProvider(format!(
                "Hugging Face model {} failed (status {}): {}",
                self.model, status, error_text
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::AiProvider(format!(
                "Hugging Face model {} returned an empty body",
                self.model
            )));
        }

        Ok(bytes.to_vec())
    }
}
