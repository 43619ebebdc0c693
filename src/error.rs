//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Raw failure reported by a provider client (status, payload, decoding).
    #[error("AI provider error: {0}")]
    AiProvider(String),

    /// The text-generation stage failed; fatal to a creation request.
    #[error("Story generation failed: {0}")]
    NarrativeProvider(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A `.env` file exists but could not be read or parsed.
    #[error("Environment file error: {0}")]
    EnvVar(#[from] dotenvy::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
