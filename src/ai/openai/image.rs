use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::{ImageBackend, ImageRequest};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
    name: String,
}

impl OpenAiImageClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, timeout, client),
            name: format!("openai:{}", model),
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
impl ImageBackend for OpenAiImageClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Vec<u8>> {
        let body = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            n: 1,
            size: "1024x1024".to_string(),
        };

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &body).await?;

        let image_data = response
            .data
            .first()
            .ok_or_else(|| Error::AiProvider("No image data in OpenAI response".to_string()))?;

        if let Some(b64_json) = &image_data.b64_json {
            use base64::Engine as _;
            base64::engine::general_purpose::STANDARD
                .decode(b64_json)
                .map_err(|e| Error::AiProvider(format!("Failed to decode base64 image: {}", e)))
        } else if let Some(url) = &image_data.url {
            self.http.get_bytes(url).await
        } else {
            Err(Error::AiProvider(
                "No image data (neither base64 nor URL) in response".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer) -> OpenAiImageClient {
        OpenAiImageClient::new(
            "key".to_string(),
            "gpt-image-1".to_string(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri())
    }

    fn request() -> ImageRequest {
        ImageRequest {
            prompt: "a dream".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_image_handles_b64_response() {
        let server = MockServer::start().await;

        use base64::Engine as _;
        let fake_image = vec![0x89, 0x50, 0x4E, 0x47];
        let b64 = base64::engine::general_purpose::STANDARD.encode(&fake_image);

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "b64_json": b64 }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server);
        assert_eq!(client.name(), "openai:gpt-image-1");

        let result = client.generate_image(&request()).await.unwrap();
        assert_eq!(result, fake_image);
    }

    #[tokio::test]
    async fn test_generate_image_downloads_url_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "url": format!("{}/files/img.png", server.uri()) }]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/files/img.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7, 8, 9]))
            .mount(&server)
            .await;

        let result = make_client(&server).generate_image(&request()).await.unwrap();
        assert_eq!(result, vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn test_generate_image_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
            .mount(&server)
            .await;

        let err = make_client(&server).generate_image(&request()).await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[tokio::test]
    async fn test_generate_image_rejects_empty_data() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": []
            })))
            .mount(&server)
            .await;

        let err = make_client(&server).generate_image(&request()).await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
