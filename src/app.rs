//! Creation pipeline: story, then image, then a single persisted record.

use crate::ai::{
    CohereTextClient, HuggingFaceImageClient, ImageBackend, OpenAiImageClient, OpenAiTextClient,
    TextGenerationService,
};
use crate::image::ImageOrchestrator;
use crate::models::{Config, Creation, ImageProvider, TextProvider};
use crate::narrative::NarrativeGenerator;
use crate::store::{CreationStore, MemoryCreationStore, ObjectCreationStore};
use crate::{Error, Result};
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

/// Coordinates story generation, image generation and persistence.
pub struct App {
    narrative: NarrativeGenerator,
    images: ImageOrchestrator,
    store: Box<dyn CreationStore>,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub text: Box<dyn TextGenerationService>,
    pub images: ImageOrchestrator,
    pub store: Box<dyn CreationStore>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            narrative: NarrativeGenerator::new(services.text),
            images: services.images,
            store: services.store,
        }
    }

    /// Construct an app from validated configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();

        let text_key = config
            .text_api_key()
            .ok_or_else(|| Error::Config("Text provider API key missing".to_string()))?
            .to_string();
        let text: Box<dyn TextGenerationService> = match config.text_provider {
            TextProvider::Cohere => Box::new(CohereTextClient::new_with_client(
                text_key,
                config.text_model.clone(),
                http_client.clone(),
            )),
            TextProvider::OpenAi => Box::new(OpenAiTextClient::new_with_client(
                text_key,
                config.text_model.clone(),
                http_client.clone(),
            )),
        };
        info!(
            "Text provider: {:?} (model: {})",
            config.text_provider, config.text_model
        );

        let mut backends: Vec<Box<dyn ImageBackend>> = Vec::new();
        for entry in &config.image_backends {
            let api_key = config
                .image_api_key(entry.provider)
                .ok_or_else(|| {
                    Error::Config(format!("No API key for image backend {}", entry.model))
                })?
                .to_string();
            let backend: Box<dyn ImageBackend> = match entry.provider {
                ImageProvider::HuggingFace => Box::new(HuggingFaceImageClient::new_with_client(
                    api_key,
                    entry.model.clone(),
                    config.image_timeout,
                    http_client.clone(),
                )),
                ImageProvider::OpenAi => Box::new(OpenAiImageClient::new_with_client(
                    api_key,
                    entry.model.clone(),
                    config.image_timeout,
                    http_client.clone(),
                )),
            };
            backends.push(backend);
        }
        let images = ImageOrchestrator::new(backends, config.image_timeout);
        info!("Image backends (in order): {:?}", images.backend_names());

        let store: Box<dyn CreationStore> = match &config.store {
            Some(store_config) => {
                info!("Storing creations in bucket {}", store_config.bucket);
                Box::new(ObjectCreationStore::new(store_config).await?)
            }
            None => {
                info!("DRY_RUN enabled, creations are kept in memory only");
                Box::new(MemoryCreationStore::new())
            }
        };

        Ok(Self::with_services(AppServices {
            text,
            images,
            store,
        }))
    }

    /// Generate a story and image for `scene_idea` and persist the result.
    ///
    /// Fails on empty input, on a story-generation failure (nothing is
    /// persisted and no image is requested) or when the store write fails.
    /// Image backend failures are absorbed by the placeholder fallback.
    pub async fn create_creation(&self, owner: &str, scene_idea: &str) -> Result<Creation> {
        let owner = normalize_owner(owner)?;
        let scene_idea = scene_idea.trim();
        if scene_idea.is_empty() {
            return Err(Error::Validation("Please provide a scene idea".to_string()));
        }

        info!("[{}] Creating from scene: {}", owner, scene_idea);

        let story = self.narrative.generate_story(scene_idea).await?;
        info!("[{}] Generated story ({} chars)", owner, story.len());

        let image = self.images.generate_image(scene_idea, &story).await;

        let creation = Creation::new(
            owner.to_string(),
            scene_idea.to_string(),
            story,
            Some(image),
            Utc::now(),
        );

        self.store.insert(&creation).await.map_err(|e| {
            error!("[{}] Failed to persist creation {}: {}", owner, creation.id, e);
            e
        })?;
        info!("[{}] Saved creation {}", owner, creation.id);

        Ok(creation)
    }

    /// Replace the journal entry of one of `owner`'s creations.
    pub async fn save_journal(&self, owner: &str, creation_id: Uuid, text: &str) -> Result<()> {
        let owner = normalize_owner(owner)?;
        let updated = self
            .store
            .update_journal(creation_id, owner, text.trim())
            .await?;

        if updated {
            info!("[{}] Saved journal for creation {}", owner, creation_id);
            Ok(())
        } else {
            Err(Error::NotFound(format!("Creation {} not found", creation_id)))
        }
    }

    pub async fn list_creations(&self, owner: &str) -> Result<Vec<Creation>> {
        let owner = normalize_owner(owner)?;
        self.store.list_by_owner(owner).await
    }

    pub async fn find_creation(&self, owner: &str, creation_id: Uuid) -> Result<Creation> {
        let owner = normalize_owner(owner)?;
        self.store
            .find_by_id_and_owner(creation_id, owner)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Creation {} not found", creation_id)))
    }
}

/// Owners are compared trimmed; an empty owner is never valid.
fn normalize_owner(owner: &str) -> Result<&str> {
    let owner = owner.trim();
    if owner.is_empty() {
        return Err(Error::Validation("An owner is required".to_string()));
    }
    Ok(owner)
}
