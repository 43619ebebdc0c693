use crate::ai::{ImageBackend, ImageRequest};
use crate::models::ImagePayload;
use crate::placeholder::synthesize_placeholder;
use crate::prompts;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Tries image backends in priority order and falls back to a synthesized
/// placeholder, so callers always receive an image.
pub struct ImageOrchestrator {
    backends: Vec<Box<dyn ImageBackend>>,
    timeout: Duration,
}

impl ImageOrchestrator {
    pub fn new(backends: Vec<Box<dyn ImageBackend>>, timeout: Duration) -> Self {
        Self { backends, timeout }
    }

    /// Orchestrator with no backends; always yields the placeholder.
    pub fn placeholder_only() -> Self {
        Self::new(Vec::new(), Duration::from_secs(60))
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|backend| backend.name()).collect()
    }

    pub fn build_prompt(scene_idea: &str) -> String {
        prompts::render(prompts::IMAGE, &[("scene", scene_idea)])
    }

    pub async fn generate_image(&self, scene_idea: &str, story: &str) -> ImagePayload {
        if self.backends.is_empty() {
            info!("No image backends configured, using placeholder");
            return synthesize_placeholder(scene_idea, story);
        }

        let request = ImageRequest {
            prompt: Self::build_prompt(scene_idea),
        };

        for backend in &self.backends {
            debug!("Requesting image from {}", backend.name());

            match tokio::time::timeout(self.timeout, backend.generate_image(&request)).await {
                Ok(Ok(bytes)) if !bytes.is_empty() => {
                    info!(
                        "Generated image with {} ({} bytes)",
                        backend.name(),
                        bytes.len()
                    );
                    return ImagePayload::raster(backend.name(), &bytes);
                }
                Ok(Ok(_)) => warn!("Backend {} returned an empty image", backend.name()),
                Ok(Err(e)) => warn!("Backend {} failed: {}", backend.name(), e),
                Err(_) => warn!(
                    "Backend {} timed out after {:?}",
                    backend.name(),
                    self.timeout
                ),
            }
        }

        warn!(
            "All {} image backends failed, falling back to placeholder",
            self.backends.len()
        );
        synthesize_placeholder(scene_idea, story)
    }
}
