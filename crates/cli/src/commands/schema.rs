//! `archivist schema`: Show what the model is asked to produce.

use archivist_core::HouseDj;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", HouseDj::format_instructions());
    println!();
    println!("Example record:");
    println!("{}", serde_json::to_string_pretty(&HouseDj::example())?);
    Ok(())
}
