//! Generator for Inkboard creations - turns a short scene idea into a story
//! and an illustration, then keeps the result in a per-owner journal.
//!
//! Image generation tries a configured chain of backends and falls back to a
//! deterministic SVG composition when every backend fails.

pub mod ai;
pub mod app;
pub mod error;
pub mod image;
pub mod models;
pub mod narrative;
pub mod placeholder;
pub mod prompts;
pub mod store;

pub use error::{Error, Result};
