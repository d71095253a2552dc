//! Completion backends for Archivist.
//!
//! All providers implement the `archivist_core::Provider` trait. The
//! configured backend is any OpenAI-compatible chat completions endpoint,
//! Ollama by default.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use std::sync::Arc;

use archivist_config::AppConfig;
use archivist_core::Provider;
use archivist_core::error::ProviderError;

/// Build the completion backend described by the configuration.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let provider = &config.provider;
    // Ollama ignores the key; hosted endpoints reject an empty one
    let api_key = provider.api_key.clone().unwrap_or_else(|| "ollama".into());

    tracing::debug!(
        provider = %provider.name,
        base_url = %provider.base_url,
        model = %config.model,
        "Building completion backend"
    );

    let backend = OpenAiCompatProvider::new(
        provider.name.clone(),
        provider.base_url.clone(),
        api_key,
        std::time::Duration::from_secs(provider.timeout_secs),
    )?;
    Ok(Arc::new(backend))
}
