//! Image generation with ordered backend fallback
//!
//! Tries each configured backend in priority order and degrades to the
//! synthesized placeholder when none succeeds.

pub mod mime;
pub mod orchestrator;

pub use orchestrator::ImageOrchestrator;
