//! AI service integration for story and image generation
//!
//! Defines the provider boundaries consumed by the pipeline and the concrete
//! clients for Cohere, OpenAI and the Hugging Face Inference API.

pub mod cohere;
pub mod huggingface;
pub mod mock;
pub mod openai;

pub use cohere::CohereTextClient;
pub use huggingface::HuggingFaceImageClient;
pub use mock::{MockImageBackend, MockTextClient};
pub use openai::{OpenAiImageClient, OpenAiTextClient};

use crate::Result;
use async_trait::async_trait;

/// A single completion request sent to a text-generation provider.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A single request sent to an image-generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
}

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Returns the provider's candidates in the order it ranked them.
    async fn generate_text(&self, request: &TextRequest) -> Result<Vec<String>>;
}

#[async_trait]
pub trait ImageBackend: Send + Sync {
    /// Stable label used in logs and on generated payloads.
    fn name(&self) -> &str;

    /// Returns raw image bytes on success.
    async fn generate_image(&self, request: &ImageRequest) -> Result<Vec<u8>>;
}
