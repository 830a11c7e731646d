//! Content-generation collaborator abstraction.
//!
//! The [`ContentGenerator`] trait decouples alert processing from the
//! text-generation backend. [`GeminiGenerator`] calls the Generative
//! Language REST API; [`SimulatedGenerator`] stands in when no API key is
//! configured so that unconfigured deployments still produce content.

pub mod gemini;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::GenerationConfig;
use crate::Result;

pub use gemini::GeminiGenerator;

/// Boxed future returned by [`ContentGenerator::generate`].
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Produces alert content from a natural-language prompt.
pub trait ContentGenerator: Send + Sync {
    /// Generate content for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Generation`](crate::AppError::Generation) on any
    /// genuine failure; implementations never signal failure with empty text.
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a>;
}

/// Generator used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedGenerator;

impl SimulatedGenerator {
    /// Placeholder content for `prompt`.
    #[must_use]
    pub fn content_for(prompt: &str) -> String {
        format!("[Simulated AI Content]: {prompt}")
    }
}

impl ContentGenerator for SimulatedGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> GenerateFuture<'a> {
        Box::pin(async move { Ok(Self::content_for(prompt)) })
    }
}

/// Pick the generator for `config`: the Gemini client when an API key is
/// present, otherwise the simulated generator.
#[must_use]
pub fn from_config(config: &GenerationConfig) -> Arc<dyn ContentGenerator> {
    match config.api_key.as_deref() {
        Some(key) if !key.is_empty() => Arc::new(GeminiGenerator::new(
            config.api_base.clone(),
            config.model.clone(),
            key.to_owned(),
        )),
        _ => {
            tracing::warn!("generation API key not found; using simulated content");
            Arc::new(SimulatedGenerator)
        }
    }
}
