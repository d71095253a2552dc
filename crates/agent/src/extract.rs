//! Pulls the structured answer out of the model's final text.

use archivist_core::{Error, HouseDj, Result};
use regex_lite::Regex;
use tracing::{error, info};

/// First triple-backtick block, any info string (`json`, `JSON`, `jsonc`),
/// interior trimmed.
const FENCE_PATTERN: &str = r"(?s)```[A-Za-z0-9_+-]*\s*(.*?)\s*```";

/// The interior of the first fenced block in `text`, if any.
pub fn fenced_block(text: &str) -> Result<Option<&str>> {
    let fence = Regex::new(FENCE_PATTERN)
        .map_err(|e| Error::Internal(format!("fence pattern failed to compile: {e}")))?;
    Ok(fence
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str()))
}

/// Extract, decode and validate a [`HouseDj`] from raw model output.
pub fn parse_house_dj(raw: &str) -> Result<HouseDj> {
    let Some(payload) = fenced_block(raw)? else {
        error!("Model output did not contain a fenced JSON block");
        return Err(Error::OutputFormat {
            raw: raw.to_string(),
        });
    };

    match HouseDj::parse_json(payload) {
        Ok(record) => {
            info!(name = record.name(), "Parsed structured record from model output");
            Ok(record)
        }
        Err(e) => {
            error!(error = %e, "Extracted block failed to parse");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_json_tagged_block() {
        let raw = "Here you go:\n```json\n{\"name\": \"Frankie Knuckles\"}\n```\nSources: wiki";
        assert_eq!(
            fenced_block(raw).unwrap(),
            Some("{\"name\": \"Frankie Knuckles\"}")
        );
    }

    #[test]
    fn extracts_untagged_block() {
        let raw = "```\n  {\"name\": \"Ron Hardy\"}  \n```";
        assert_eq!(fenced_block(raw).unwrap(), Some("{\"name\": \"Ron Hardy\"}"));
    }

    #[test]
    fn info_string_case_and_variant_stripped() {
        for tag in ["JSON", "Json", "jsonc", "json5"] {
            let raw = format!("```{tag}\n{{\"name\": \"Larry Heard\"}}\n```");
            assert_eq!(
                fenced_block(&raw).unwrap(),
                Some("{\"name\": \"Larry Heard\"}"),
                "tag {tag}"
            );
        }
        let record = parse_house_dj("```JSON\n{\"name\": \"Larry Heard\"}\n```").unwrap();
        assert_eq!(record.name(), "Larry Heard");
    }

    #[test]
    fn first_block_wins() {
        let raw = "```json\n{\"name\": \"A\"}\n```\n```json\n{\"name\": \"B\"}\n```";
        let record = parse_house_dj(raw).unwrap();
        assert_eq!(record.name(), "A");
    }

    #[test]
    fn no_fence_is_output_format_error() {
        let raw = "{\"name\": \"Frankie Knuckles\"}";
        match parse_house_dj(raw) {
            Err(Error::OutputFormat { raw: carried }) => assert_eq!(carried, raw),
            other => panic!("expected OutputFormat, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_fence_is_output_format_error() {
        let raw = "```json\n{\"name\": \"Frankie Knuckles\"}";
        assert!(matches!(parse_house_dj(raw), Err(Error::OutputFormat { .. })));
    }

    #[test]
    fn invalid_json_is_decode_error() {
        match parse_house_dj("```json\nnot valid json\n```") {
            Err(Error::JsonDecode { payload, .. }) => assert_eq!(payload, "not valid json"),
            other => panic!("expected JsonDecode, got {other:?}"),
        }
    }

    #[test]
    fn missing_name_is_schema_error() {
        let raw = "```json\n{\"genres\": [\"House\"]}\n```";
        match parse_house_dj(raw) {
            Err(Error::SchemaValidation(schema)) => assert!(schema.mentions("name")),
            other => panic!("expected SchemaValidation, got {other:?}"),
        }
    }

    #[test]
    fn valid_block_yields_record() {
        let raw = "Final answer:\n```json\n{\n  \"name\": \"Frankie Knuckles\",\n  \
                   \"website\": \"https://frankieknuckles.com\",\n  \
                   \"genres\": [\"House\", \"Garage\"]\n}\n```";
        let record = parse_house_dj(raw).unwrap();
        assert_eq!(record.name(), "Frankie Knuckles");
        assert_eq!(
            record.website().map(|u| u.as_str()),
            Some("https://frankieknuckles.com/")
        );
        assert_eq!(record.genres().map(|g| g.len()), Some(2));
    }
}
