//! `archivist search`: Exercise the search tool on its own.

use archivist_tools::SerperSearchTool;

pub async fn run(query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let tool = SerperSearchTool::from_config(&config.search)?;

    let summary = tool.search(query).await?;
    println!("{summary}");
    Ok(())
}
