//! Story generation from a scene idea.

use crate::ai::{TextGenerationService, TextRequest};
use crate::{prompts, Error, Result};
use tracing::{debug, error};

/// Output budget for a 80-150 word paragraph.
pub const STORY_MAX_TOKENS: u32 = 200;
pub const STORY_TEMPERATURE: f32 = 0.7;

pub struct NarrativeGenerator {
    provider: Box<dyn TextGenerationService>,
}

impl NarrativeGenerator {
    pub fn new(provider: Box<dyn TextGenerationService>) -> Self {
        Self { provider }
    }

    pub fn build_prompt(scene_idea: &str) -> String {
        prompts::render(prompts::STORY, &[("scene", scene_idea)])
    }

    /// Returns the provider's first candidate, trimmed. Any provider failure
    /// is reported as [`Error::NarrativeProvider`].
    pub async fn generate_story(&self, scene_idea: &str) -> Result<String> {
        let request = TextRequest {
            prompt: Self::build_prompt(scene_idea),
            max_tokens: STORY_MAX_TOKENS,
            temperature: STORY_TEMPERATURE,
        };

        debug!("Generating story for scene: {}", scene_idea);

        let candidates = self.provider.generate_text(&request).await.map_err(|e| {
            error!("Story generation failed: {}", e);
            match e {
                Error::NarrativeProvider(message) => Error::NarrativeProvider(message),
                other => Error::NarrativeProvider(other.to_string()),
            }
        })?;

        let story = candidates
            .into_iter()
            .next()
            .map(|text| text.trim().to_string())
            .ok_or_else(|| {
                error!("Text provider returned no candidates");
                Error::NarrativeProvider("Text provider returned no candidates".to_string())
            })?;

        debug!("Generated story ({} chars)", story.len());
        Ok(story)
    }
}
