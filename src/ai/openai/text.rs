use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::{TextGenerationService, TextRequest};
use crate::Result;
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiTextClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiTextClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(30), client),
            model,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl TextGenerationService for OpenAiTextClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<Vec<String>> {
        let chat_request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(request.prompt.clone()),
            }],
            max_completion_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self.http.chat_completion(chat_request).await?;

        // A null content still counts as a (blank) candidate in its rank.
        Ok(response
            .choices
            .into_iter()
            .map(|choice| choice.message.content.unwrap_or_default())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> TextRequest {
        TextRequest {
            prompt: "Scene idea: a desert caravan".to_string(),
            max_tokens: 200,
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn test_generate_text_parses_choices() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": {
                        "role": "assistant",
                        "content": "Camels sway beneath a copper sky."
                    },
                    "finish_reason": "stop"
                }]
            })))
            .mount(&server)
            .await;

        let client = OpenAiTextClient::new("test-key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let candidates = client.generate_text(&request()).await.unwrap();
        assert_eq!(candidates, vec!["Camels sway beneath a copper sky."]);
    }

    #[tokio::test]
    async fn test_generate_text_sends_configured_model_and_limits() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_string_contains("\"model\":\"custom-model\""))
            .and(body_string_contains("\"max_completion_tokens\":200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "story" },
                    "finish_reason": "stop"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiTextClient::new("key".to_string(), "custom-model".to_string())
            .with_base_url(server.uri());

        client.generate_text(&request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_returns_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = OpenAiTextClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let err = client.generate_text(&request()).await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_null_content_keeps_choice_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {
                        "message": { "role": "assistant", "content": null },
                        "finish_reason": "content_filter"
                    },
                    {
                        "message": { "role": "assistant", "content": "second story" },
                        "finish_reason": "stop"
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = OpenAiTextClient::new("key".to_string(), "gpt-4o-mini".to_string())
            .with_base_url(server.uri());

        let candidates = client.generate_text(&request()).await.unwrap();
        assert_eq!(candidates, vec!["".to_string(), "second story".to_string()]);
    }
}
