//! `archivist research`: Run the agent end to end.

use archivist_agent::ResearchAgent;

pub async fn run(
    query: &str,
    model: Option<String>,
    temperature: Option<f32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config()?;
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(temperature) = temperature {
        if !(0.0..=2.0).contains(&temperature) {
            return Err("temperature must be between 0.0 and 2.0".into());
        }
        config.temperature = temperature;
    }

    let agent = ResearchAgent::from_config(&config)?;
    agent.verify_backend().await?;

    eprint!("  Researching...");
    let result = agent.run(query).await;
    eprint!("\r                \r");

    let record = result?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
