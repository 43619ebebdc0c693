//! Cohere text-generation client.
//!
//! Uses the `/v1/generate` endpoint, which returns ranked `generations`.

use crate::ai::{TextGenerationService, TextRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.cohere.ai";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
    k: u32,
    stop_sequences: Vec<String>,
    return_likelihoods: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
struct Generation {
    text: String,
}

pub struct CohereTextClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl CohereTextClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: Client) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl TextGenerationService for CohereTextClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<Vec<String>> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            k: 0,
            stop_sequences: Vec::new(),
            return_likelihoods: "NONE",
        };

        tracing::debug!("Sending generate request to Cohere (model: {})", self.model);

        let response = self
            .client
            .post(format!("{}/v1/generate", self.base_url))
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Cohere: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Cohere API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Cohere API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Cohere response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Cohere response: {}", e))
        })?;

        Ok(parsed
            .generations
            .into_iter()
            .map(|generation| generation.text)
            .collect())
    }
}
