//! `archivist ask`: A plain completion, no tools.

use archivist_core::message::Message;
use archivist_core::Provider;
use archivist_core::provider::ProviderRequest;

pub async fn run(prompt: &str) -> Result<(), Box<dyn std::error::Error>> {
    if prompt.trim().is_empty() {
        return Err("prompt must not be empty".into());
    }

    let config = super::load_config()?;
    let provider = archivist_providers::build_from_config(&config)?;

    let request = ProviderRequest {
        model: config.model.clone(),
        messages: vec![Message::user(prompt)],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        tools: vec![],
    };

    let response = provider.complete(request).await?;
    tracing::debug!(model = %response.model, "Completion received");
    println!("{}", response.message.content);
    Ok(())
}
