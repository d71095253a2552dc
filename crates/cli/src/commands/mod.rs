pub mod ask;
pub mod init;
pub mod research;
pub mod schema;
pub mod search;

use archivist_config::AppConfig;

/// Load configuration, turning failures into a readable message.
pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}
