//! Data models and structures
//!
//! Defines the persisted `Creation` record, the inline image payload it
//! carries, and the environment-driven configuration.

use crate::image::mime::detect_image_mime;
use crate::{Error, Result};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

const BASE64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

/// A scene prompt paired with its generated story and illustration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Creation {
    pub id: Uuid,
    pub owner: String,
    pub scene_idea: String,
    pub story: String,
    pub image: Option<ImagePayload>,
    pub journal_entry: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Creation {
    /// Assemble a fresh record with a new id and an empty journal.
    pub fn new(
        owner: String,
        scene_idea: String,
        story: String,
        image: Option<ImagePayload>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            scene_idea,
            story,
            image,
            journal_entry: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Where an image payload came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// Raster returned by an external backend.
    Generated { backend: String },
    /// SVG synthesized locally from the scene text.
    Placeholder,
}

/// Self-contained image encoded as a `data:` URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImagePayload {
    pub source: ImageSource,
    pub data_url: String,
}

impl ImagePayload {
    pub fn raster(backend: &str, bytes: &[u8]) -> Self {
        Self {
            source: ImageSource::Generated {
                backend: backend.to_string(),
            },
            data_url: format!(
                "data:{};base64,{}",
                detect_image_mime(bytes),
                BASE64.encode(bytes)
            ),
        }
    }

    pub fn svg(document: &str) -> Self {
        Self {
            source: ImageSource::Placeholder,
            data_url: format!("data:image/svg+xml;base64,{}", BASE64.encode(document)),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, ImageSource::Placeholder)
    }

    /// MIME type declared in the data URL header.
    pub fn mime_type(&self) -> Option<&str> {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
    }

    /// Decode the base64 body of the data URL.
    pub fn decode_bytes(&self) -> Option<Vec<u8>> {
        let (_, body) = self.data_url.split_once(";base64,")?;
        BASE64.decode(body).ok()
    }

    /// The SVG source of a placeholder payload.
    pub fn svg_document(&self) -> Option<String> {
        if !self.is_placeholder() {
            return None;
        }
        self.decode_bytes()
            .and_then(|bytes| String::from_utf8(bytes).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextProvider {
    Cohere,
    OpenAi,
}

impl TextProvider {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cohere" => Ok(Self::Cohere),
            "openai" => Ok(Self::OpenAi),
            other => Err(Error::Config(format!(
                "Unknown TEXT_PROVIDER '{}'. Expected 'cohere' or 'openai'",
                other
            ))),
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Cohere => "command",
            Self::OpenAi => "gpt-4o-mini",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageProvider {
    HuggingFace,
    OpenAi,
}

/// One `provider:model` entry of the ordered image backend list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBackendSpec {
    pub provider: ImageProvider,
    pub model: String,
}

impl ImageBackendSpec {
    pub fn parse(entry: &str) -> Result<Self> {
        let (provider, model) = entry.trim().split_once(':').ok_or_else(|| {
            Error::Config(format!(
                "Invalid image backend '{}'. Expected 'provider:model'",
                entry
            ))
        })?;

        let provider = match provider.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => ImageProvider::HuggingFace,
            "openai" => ImageProvider::OpenAi,
            other => {
                return Err(Error::Config(format!(
                    "Unknown image provider '{}' in '{}'",
                    other, entry
                )))
            }
        };

        let model = model.trim();
        if model.is_empty() {
            return Err(Error::Config(format!(
                "Image backend '{}' is missing a model",
                entry
            )));
        }

        Ok(Self {
            provider,
            model: model.to_string(),
        })
    }
}

/// Hugging Face models tried, in order, when `IMAGE_BACKENDS` is not set.
pub const DEFAULT_HUGGINGFACE_MODELS: [&str; 3] = [
    "runwayml/stable-diffusion-v1-5",
    "stabilityai/stable-diffusion-2-1",
    "CompVis/stable-diffusion-v1-4",
];

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub text_provider: TextProvider,
    pub text_model: String,
    pub cohere_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub huggingface_api_key: Option<String>,
    pub image_backends: Vec<ImageBackendSpec>,
    pub image_timeout: Duration,
    pub dry_run: bool,
    /// `None` in dry-run mode, where creations are kept in memory.
    pub store: Option<StoreConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        load_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build and validate a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let text_provider = match var("TEXT_PROVIDER") {
            Some(value) => TextProvider::parse(&value)?,
            None => TextProvider::Cohere,
        };
        let text_model =
            var("TEXT_MODEL").unwrap_or_else(|| text_provider.default_model().to_string());

        let cohere_api_key = var("COHERE_API_KEY");
        let openai_api_key = var("OPENAI_API_KEY");
        let huggingface_api_key = var("HUGGINGFACE_API_KEY");

        let image_backends = match var("IMAGE_BACKENDS") {
            Some(list) => list
                .split(',')
                .filter(|entry| !entry.trim().is_empty())
                .map(ImageBackendSpec::parse)
                .collect::<Result<Vec<_>>>()?,
            None if huggingface_api_key.is_some() => DEFAULT_HUGGINGFACE_MODELS
                .iter()
                .map(|model| ImageBackendSpec {
                    provider: ImageProvider::HuggingFace,
                    model: model.to_string(),
                })
                .collect(),
            None => Vec::new(),
        };

        let image_timeout = match var("IMAGE_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| {
                    Error::Config(format!("IMAGE_TIMEOUT_SECS must be an integer, got '{}'", value))
                })?;
                if secs == 0 {
                    return Err(Error::Config(
                        "IMAGE_TIMEOUT_SECS must be at least 1".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(60),
        };

        let dry_run = var("DRY_RUN")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let store = if dry_run {
            None
        } else {
            Some(StoreConfig {
                endpoint: var("STORE_ENDPOINT")
                    .unwrap_or_else(|| "https://nyc3.digitaloceanspaces.com".to_string()),
                bucket: var("STORE_BUCKET").unwrap_or_else(|| "inkboard".to_string()),
                access_key_id: var("STORE_ACCESS_KEY_ID")
                    .ok_or_else(|| Error::Config("STORE_ACCESS_KEY_ID not set".to_string()))?,
                secret_access_key: var("STORE_SECRET_ACCESS_KEY").ok_or_else(|| {
                    Error::Config("STORE_SECRET_ACCESS_KEY not set".to_string())
                })?,
            })
        };

        let config = Self {
            text_provider,
            text_model,
            cohere_api_key,
            openai_api_key,
            huggingface_api_key,
            image_backends,
            image_timeout,
            dry_run,
            store,
        };
        config.validate_keys()?;
        Ok(config)
    }

    fn validate_keys(&self) -> Result<()> {
        match self.text_provider {
            TextProvider::Cohere if self.cohere_api_key.is_none() => {
                return Err(Error::Config(
                    "COHERE_API_KEY not set (TEXT_PROVIDER=cohere)".to_string(),
                ))
            }
            TextProvider::OpenAi if self.openai_api_key.is_none() => {
                return Err(Error::Config(
                    "OPENAI_API_KEY not set (TEXT_PROVIDER=openai)".to_string(),
                ))
            }
            _ => {}
        }

        for backend in &self.image_backends {
            if self.image_api_key(backend.provider).is_none() {
                return Err(Error::Config(format!(
                    "No API key configured for image backend {:?}:{}",
                    backend.provider, backend.model
                )));
            }
        }

        Ok(())
    }

    pub fn text_api_key(&self) -> Option<&str> {
        match self.text_provider {
            TextProvider::Cohere => self.cohere_api_key.as_deref(),
            TextProvider::OpenAi => self.openai_api_key.as_deref(),
        }
    }

    pub fn image_api_key(&self, provider: ImageProvider) -> Option<&str> {
        match provider {
            ImageProvider::HuggingFace => self.huggingface_api_key.as_deref(),
            ImageProvider::OpenAi => self.openai_api_key.as_deref(),
        }
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn load_dotenv(result: dotenvy::Result<std::path::PathBuf>) -> Result<()> {
    match result {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Ok(())
        }
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_creation_serialization() {
        let creation = Creation::new(
            "user-1".to_string(),
            "a quiet lake".to_string(),
            "The lake lay still.".to_string(),
            Some(ImagePayload::svg("<svg/>")),
            Utc::now(),
        );

        let json = serde_json::to_string(&creation).unwrap();
        assert!(json.contains("\"kind\":\"placeholder\""));

        let deserialized: Creation = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, creation);
        assert!(deserialized.journal_entry.is_none());
        assert_eq!(deserialized.created_at, deserialized.updated_at);
    }

    #[test]
    fn test_raster_payload_sniffs_mime() {
        let payload = ImagePayload::raster("hf", &[0xFF, 0xD8, 0xFF, 0xE0, 0x00]);
        assert_eq!(payload.mime_type(), Some("image/jpeg"));
        assert!(!payload.is_placeholder());
        assert!(payload.svg_document().is_none());
        assert_eq!(payload.decode_bytes().unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]);
    }

    #[test]
    fn test_svg_payload_decodes_document() {
        let payload = ImagePayload::svg("<svg></svg>");
        assert_eq!(payload.mime_type(), Some("image/svg+xml"));
        assert_eq!(payload.svg_document().as_deref(), Some("<svg></svg>"));
    }

    #[test]
    fn test_backend_spec_parse() {
        let spec = ImageBackendSpec::parse(" huggingface:stabilityai/stable-diffusion-2-1 ").unwrap();
        assert_eq!(spec.provider, ImageProvider::HuggingFace);
        assert_eq!(spec.model, "stabilityai/stable-diffusion-2-1");

        assert!(ImageBackendSpec::parse("openai").is_err());
        assert!(ImageBackendSpec::parse("midjourney:v6").is_err());
        assert!(ImageBackendSpec::parse("openai: ").is_err());
    }

    #[test]
    fn test_config_defaults_to_huggingface_models_in_order() {
        let config = config_from(&[
            ("COHERE_API_KEY", "co-key"),
            ("HUGGINGFACE_API_KEY", "hf-key"),
            ("DRY_RUN", "true"),
        ])
        .unwrap();

        assert_eq!(config.text_provider, TextProvider::Cohere);
        assert_eq!(config.text_model, "command");
        let models: Vec<&str> = config
            .image_backends
            .iter()
            .map(|b| b.model.as_str())
            .collect();
        assert_eq!(models, DEFAULT_HUGGINGFACE_MODELS.to_vec());
        assert_eq!(config.image_timeout, Duration::from_secs(60));
        assert!(config.store.is_none());
    }

    #[test]
    fn test_config_without_image_keys_has_no_backends() {
        let config = config_from(&[("COHERE_API_KEY", "co-key"), ("DRY_RUN", "1")]).unwrap();
        assert!(config.image_backends.is_empty());
    }

    #[test]
    fn test_config_explicit_backend_list() {
        let config = config_from(&[
            ("TEXT_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
            ("HUGGINGFACE_API_KEY", "hf-key"),
            ("IMAGE_BACKENDS", "openai:gpt-image-1, hf:CompVis/stable-diffusion-v1-4"),
            ("IMAGE_TIMEOUT_SECS", "15"),
            ("DRY_RUN", "yes"),
        ])
        .unwrap();

        assert_eq!(config.text_model, "gpt-4o-mini");
        assert_eq!(config.image_backends.len(), 2);
        assert_eq!(config.image_backends[0].provider, ImageProvider::OpenAi);
        assert_eq!(config.image_backends[1].provider, ImageProvider::HuggingFace);
        assert_eq!(config.image_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_config_requires_text_provider_key() {
        let err = config_from(&[("TEXT_PROVIDER", "openai"), ("DRY_RUN", "1")]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_requires_key_for_each_backend() {
        let err = config_from(&[
            ("COHERE_API_KEY", "co-key"),
            ("IMAGE_BACKENDS", "openai:gpt-image-1"),
            ("DRY_RUN", "1"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_requires_store_credentials_outside_dry_run() {
        let err = config_from(&[("COHERE_API_KEY", "co-key")]).unwrap_err();
        assert!(err.to_string().contains("STORE_ACCESS_KEY_ID"));

        let config = config_from(&[
            ("COHERE_API_KEY", "co-key"),
            ("STORE_ACCESS_KEY_ID", "id"),
            ("STORE_SECRET_ACCESS_KEY", "secret"),
            ("STORE_BUCKET", "creations"),
        ])
        .unwrap();
        let store = config.store.unwrap();
        assert_eq!(store.bucket, "creations");
        assert_eq!(store.endpoint, "https://nyc3.digitaloceanspaces.com");
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let err = config_from(&[
            ("COHERE_API_KEY", "co-key"),
            ("IMAGE_TIMEOUT_SECS", "soon"),
            ("DRY_RUN", "1"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_rejects_zero_timeout() {
        let err = config_from(&[
            ("COHERE_API_KEY", "co-key"),
            ("IMAGE_TIMEOUT_SECS", "0"),
            ("DRY_RUN", "1"),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("IMAGE_TIMEOUT_SECS"));
    }

    #[test]
    fn test_missing_dotenv_is_ignored() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "no .env");
        assert!(load_dotenv(Err(dotenvy::Error::Io(missing))).is_ok());
        assert!(load_dotenv(Ok(std::path::PathBuf::from(".env"))).is_ok());
    }

    #[test]
    fn test_malformed_dotenv_is_reported() {
        let err = load_dotenv(Err(dotenvy::Error::LineParse("KEY=\"open".to_string(), 4)))
            .unwrap_err();
        assert!(matches!(err, Error::EnvVar(_)));

        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = load_dotenv(Err(dotenvy::Error::Io(denied))).unwrap_err();
        assert!(matches!(err, Error::EnvVar(_)));
    }
}
