//! Archivist CLI: the main entry point.
//!
//! Commands:
//! - `research` - Run the agent and print the structured record
//! - `search`   - Run the web search tool alone
//! - `ask`      - Send a plain prompt to the model
//! - `schema`   - Print the record's format instructions
//! - `init`     - Write a default config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "archivist",
    about = "Archivist: research House DJs with an LLM and web search",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a DJ and print the validated record as JSON
    Research {
        /// The research question
        query: String,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,

        /// Override the configured temperature
        #[arg(short, long)]
        temperature: Option<f32>,
    },

    /// Run a single web search and print the summary
    Search {
        /// The search query
        query: String,
    },

    /// Send a prompt to the model without tools
    Ask {
        /// The prompt text
        prompt: String,
    },

    /// Print the output schema and format instructions
    Schema,

    /// Write a default config to ~/.archivist/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Research {
            query,
            model,
            temperature,
        } => commands::research::run(&query, model, temperature).await?,
        Commands::Search { query } => commands::search::run(&query).await?,
        Commands::Ask { prompt } => commands::ask::run(&prompt).await?,
        Commands::Schema => commands::schema::run()?,
        Commands::Init => commands::init::run()?,
    }

    Ok(())
}
