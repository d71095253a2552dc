//! The `HouseDj` record: the structured answer a research request produces.
//!
//! Records are only ever built through validation: [`HouseDj::from_value`],
//! [`HouseDj::parse_json`], or serde deserialization (which routes through
//! `from_value`). Once built a record is immutable; fields are read through
//! accessors.
//!
//! Validation is permissive about *extra* keys (kept in [`HouseDj::extra`])
//! and strict about the declared ones: `name` must be a non-empty string and
//! every other declared field, when present and not `null`, must match its
//! shape. All violations are collected, not just the first.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::error::Error;

/// The shape a declared field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    String,
    StringList,
    Url,
    StringMap,
}

impl Shape {
    fn expected(self) -> &'static str {
        match self {
            Shape::String => "a string",
            Shape::StringList => "a list of strings",
            Shape::Url => "an http(s) URL",
            Shape::StringMap => "a mapping of strings to strings",
        }
    }

    fn json_schema(self) -> Value {
        match self {
            Shape::String => serde_json::json!({ "type": "string" }),
            Shape::StringList => serde_json::json!({
                "type": "array",
                "items": { "type": "string" }
            }),
            Shape::Url => serde_json::json!({
                "type": "string",
                "format": "uri",
                "minLength": 1
            }),
            Shape::StringMap => serde_json::json!({
                "type": "object",
                "additionalProperties": { "type": "string" }
            }),
        }
    }
}

struct FieldSpec {
    name: &'static str,
    shape: Shape,
    description: &'static str,
}

const REQUIRED_FIELD: FieldSpec = FieldSpec {
    name: "name",
    shape: Shape::String,
    description: "The full name of the House DJ.",
};

const OPTIONAL_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "aliases", shape: Shape::StringList, description: "Other names or aliases used by the DJ." },
    FieldSpec { name: "birth_date", shape: Shape::String, description: "The birth date of the DJ." },
    FieldSpec { name: "birth_place", shape: Shape::String, description: "The city and country where the DJ was born." },
    FieldSpec { name: "active_years", shape: Shape::String, description: "The period during which the DJ has been active." },
    FieldSpec { name: "notable_tracks", shape: Shape::StringList, description: "A list of influential tracks by the DJ." },
    FieldSpec { name: "associated_labels", shape: Shape::StringList, description: "Record labels the DJ has been associated with." },
    FieldSpec { name: "influences", shape: Shape::StringList, description: "Artists or genres that influenced the DJ's style." },
    FieldSpec { name: "known_for", shape: Shape::String, description: "What the DJ is most known for, or their signature style." },
    FieldSpec { name: "biography_summary", shape: Shape::String, description: "A brief summary of the DJ's biography." },
    FieldSpec { name: "genres", shape: Shape::StringList, description: "Main electronic music genres the DJ is associated with." },
    FieldSpec { name: "website", shape: Shape::Url, description: "Official website or prominent online profile URL." },
    FieldSpec { name: "social_media", shape: Shape::StringMap, description: "Social media platforms mapped to profile URLs (e.g. {\"instagram\": \"https://instagram.com/djname\"})." },
    FieldSpec { name: "awards", shape: Shape::StringList, description: "Notable awards or recognitions received by the DJ." },
    FieldSpec { name: "collaborations", shape: Shape::StringList, description: "Key artists or producers the DJ has collaborated with." },
    FieldSpec { name: "legacy", shape: Shape::String, description: "The DJ's lasting impact on electronic music." },
];

/// A House DJ with key biographical and musical information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct HouseDj {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aliases: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    birth_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active_years: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notable_tracks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    associated_labels: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    influences: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    known_for: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    biography_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    genres: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none")]
    social_media: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    awards: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    collaborations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    legacy: Option<String>,
    /// Keys the schema does not declare, kept verbatim.
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl HouseDj {
    /// Validate a parsed JSON value and build a record from it.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let mut map = match value {
            Value::Object(map) => map,
            other => {
                return Err(SchemaError::single(Violation::wrong_shape(
                    "$",
                    "a JSON object",
                    &other,
                )));
            }
        };

        let mut v = Validator {
            map: &mut map,
            violations: Vec::new(),
        };

        let name = v.required_name();
        let aliases = v.string_list("aliases");
        let birth_date = v.string("birth_date");
        let birth_place = v.string("birth_place");
        let active_years = v.string("active_years");
        let notable_tracks = v.string_list("notable_tracks");
        let associated_labels = v.string_list("associated_labels");
        let influences = v.string_list("influences");
        let known_for = v.string("known_for");
        let biography_summary = v.string("biography_summary");
        let genres = v.string_list("genres");
        let website = v.url("website");
        let social_media = v.string_map("social_media");
        let awards = v.string_list("awards");
        let collaborations = v.string_list("collaborations");
        let legacy = v.string("legacy");

        let violations = v.violations;
        match name {
            Some(name) if violations.is_empty() => Ok(Self {
                name,
                aliases,
                birth_date,
                birth_place,
                active_years,
                notable_tracks,
                associated_labels,
                influences,
                known_for,
                biography_summary,
                genres,
                website,
                social_media,
                awards,
                collaborations,
                legacy,
                extra: map,
            }),
            _ => Err(SchemaError { violations }),
        }
    }

    /// Decode and validate a JSON document.
    ///
    /// Syntax errors become [`Error::JsonDecode`] (carrying the offending
    /// text); shape errors become [`Error::SchemaValidation`].
    pub fn parse_json(payload: &str) -> crate::Result<Self> {
        let value: Value = serde_json::from_str(payload).map_err(|source| Error::JsonDecode {
            payload: payload.to_string(),
            source,
        })?;
        Ok(Self::from_value(value)?)
    }

    /// The JSON schema a valid record conforms to.
    pub fn json_schema() -> Value {
        let mut properties = Map::new();
        properties.insert(
            REQUIRED_FIELD.name.into(),
            field_schema(&REQUIRED_FIELD, false),
        );
        for spec in OPTIONAL_FIELDS {
            properties.insert(spec.name.into(), field_schema(spec, true));
        }
        serde_json::json!({
            "title": "HouseDJ",
            "description": "A House DJ with key biographical and musical information.",
            "type": "object",
            "properties": properties,
            "required": [REQUIRED_FIELD.name],
            "additionalProperties": true
        })
    }

    /// Instructions telling a model exactly what JSON to produce.
    ///
    /// The text contains literal braces; embed it as a literal segment, not
    /// as template source.
    pub fn format_instructions() -> String {
        let schema = serde_json::to_string_pretty(&Self::json_schema()).unwrap_or_default();
        format!(
            "The output must be a JSON object that conforms to the JSON schema below.\n\
             \n\
             For example, given the schema {{\"properties\": {{\"foo\": {{\"type\": \"array\", \
             \"items\": {{\"type\": \"string\"}}}}}}, \"required\": [\"foo\"]}}, the object \
             {{\"foo\": [\"bar\", \"baz\"]}} is a valid instance. The object \
             {{\"properties\": {{\"foo\": [\"bar\", \"baz\"]}}}} is not: return data, not the schema.\n\
             \n\
             Wrap the final JSON object in a fenced block that starts with ```json and ends with ```.\n\
             \n\
             Here is the output schema:\n\
             ```\n\
             {schema}\n\
             ```"
        )
    }

    /// A fully populated reference record.
    pub fn example() -> Self {
        fn strings(items: &[&str]) -> Option<Vec<String>> {
            Some(items.iter().map(|s| s.to_string()).collect())
        }

        Self {
            name: "Frankie Knuckles".into(),
            aliases: strings(&["The Godfather of House"]),
            birth_date: Some("1955-01-18".into()),
            birth_place: Some("The Bronx, New York, USA".into()),
            active_years: Some("1970s-2014".into()),
            notable_tracks: strings(&["Your Love", "The Whistle Song", "Baby Wants to Ride"]),
            associated_labels: strings(&["Trax Records", "Def Mix Productions"]),
            influences: strings(&["Motown", "Philadelphia soul", "Disco"]),
            known_for: Some(
                "Pioneering the genre of House Music at The Warehouse club in Chicago.".into(),
            ),
            biography_summary: Some(
                "Frankie Knuckles was an American DJ, record producer, and remixer. He was \
                 instrumental in developing and popularizing house music in Chicago during the \
                 1980s. Often referred to as 'The Godfather of House Music'."
                    .into(),
            ),
            genres: strings(&["House", "Chicago House", "Deep House"]),
            website: None,
            social_media: Some(BTreeMap::new()),
            awards: strings(&["Grammy Award for Remixer of the Year, Non-Classical (1998)"]),
            collaborations: strings(&["Jamie Principle", "David Morales"]),
            legacy: Some(
                "Widely regarded as the creator of house music, his influence is profound and \
                 continues to shape electronic music worldwide."
                    .into(),
            ),
            extra: Map::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> Option<&[String]> {
        self.aliases.as_deref()
    }

    pub fn birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref()
    }

    pub fn birth_place(&self) -> Option<&str> {
        self.birth_place.as_deref()
    }

    pub fn active_years(&self) -> Option<&str> {
        self.active_years.as_deref()
    }

    pub fn notable_tracks(&self) -> Option<&[String]> {
        self.notable_tracks.as_deref()
    }

    pub fn associated_labels(&self) -> Option<&[String]> {
        self.associated_labels.as_deref()
    }

    pub fn influences(&self) -> Option<&[String]> {
        self.influences.as_deref()
    }

    pub fn known_for(&self) -> Option<&str> {
        self.known_for.as_deref()
    }

    pub fn biography_summary(&self) -> Option<&str> {
        self.biography_summary.as_deref()
    }

    pub fn genres(&self) -> Option<&[String]> {
        self.genres.as_deref()
    }

    pub fn website(&self) -> Option<&Url> {
        self.website.as_ref()
    }

    pub fn social_media(&self) -> Option<&BTreeMap<String, String>> {
        self.social_media.as_ref()
    }

    pub fn awards(&self) -> Option<&[String]> {
        self.awards.as_deref()
    }

    pub fn collaborations(&self) -> Option<&[String]> {
        self.collaborations.as_deref()
    }

    pub fn legacy(&self) -> Option<&str> {
        self.legacy.as_deref()
    }

    /// Undeclared attributes the model added.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl TryFrom<Value> for HouseDj {
    type Error = SchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

fn field_schema(spec: &FieldSpec, optional: bool) -> Value {
    let shape = spec.shape.json_schema();
    if optional {
        serde_json::json!({
            "anyOf": [shape, { "type": "null" }],
            "default": null,
            "description": spec.description
        })
    } else {
        let mut shape = shape;
        shape["description"] = Value::String(spec.description.into());
        shape
    }
}

/// Pulls declared fields out of the object, recording every mismatch.
struct Validator<'a> {
    map: &'a mut Map<String, Value>,
    violations: Vec<Violation>,
}

impl Validator<'_> {
    /// Removes `field`; `null` counts as absent.
    fn take(&mut self, field: &str) -> Option<Value> {
        match self.map.remove(field) {
            Some(Value::Null) | None => None,
            Some(value) => Some(value),
        }
    }

    fn required_name(&mut self) -> Option<String> {
        let field = REQUIRED_FIELD.name;
        match self.map.remove(field) {
            None => {
                self.violations.push(Violation::missing(field));
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.violations.push(Violation::invalid(field, "must not be empty"));
                None
            }
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                self.violations
                    .push(Violation::wrong_shape(field, REQUIRED_FIELD.shape.expected(), &other));
                None
            }
        }
    }

    fn string(&mut self, field: &str) -> Option<String> {
        match self.take(field)? {
            Value::String(s) => Some(s),
            other => {
                self.violations
                    .push(Violation::wrong_shape(field, Shape::String.expected(), &other));
                None
            }
        }
    }

    fn string_list(&mut self, field: &str) -> Option<Vec<String>> {
        let items = match self.take(field)? {
            Value::Array(items) => items,
            other => {
                self.violations
                    .push(Violation::wrong_shape(field, Shape::StringList.expected(), &other));
                return None;
            }
        };

        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.into_iter().enumerate() {
            match item {
                Value::String(s) => out.push(s),
                other => {
                    ok = false;
                    self.violations.push(Violation::wrong_shape(
                        format!("{field}[{i}]"),
                        Shape::String.expected(),
                        &other,
                    ));
                }
            }
        }
        ok.then_some(out)
    }

    fn url(&mut self, field: &str) -> Option<Url> {
        let raw = match self.take(field)? {
            Value::String(s) => s,
            other => {
                self.violations
                    .push(Violation::wrong_shape(field, Shape::Url.expected(), &other));
                return None;
            }
        };

        match Url::parse(raw.trim()) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Some(url),
            Ok(url) => {
                self.violations.push(Violation::invalid(
                    field,
                    format!("URL scheme should be 'http' or 'https', got '{}'", url.scheme()),
                ));
                None
            }
            Err(e) => {
                self.violations
                    .push(Violation::invalid(field, format!("invalid URL '{raw}': {e}")));
                None
            }
        }
    }

    fn string_map(&mut self, field: &str) -> Option<BTreeMap<String, String>> {
        let entries = match self.take(field)? {
            Value::Object(entries) => entries,
            other => {
                self.violations
                    .push(Violation::wrong_shape(field, Shape::StringMap.expected(), &other));
                return None;
            }
        };

        let mut out = BTreeMap::new();
        let mut ok = true;
        for (key, value) in entries {
            match value {
                Value::String(s) => {
                    out.insert(key, s);
                }
                other => {
                    ok = false;
                    self.violations.push(Violation::wrong_shape(
                        format!("{field}.{key}"),
                        Shape::String.expected(),
                        &other,
                    ));
                }
            }
        }
        ok.then_some(out)
    }
}

/// One reason a JSON document is not a valid record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field path (`name`, `aliases[2]`, `social_media.instagram`, or `$` for the root)
    pub field: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required field is absent.
    Missing,
    /// The value has the wrong JSON type.
    WrongShape {
        expected: &'static str,
        found: &'static str,
    },
    /// The value has the right type but is unacceptable.
    Invalid { reason: String },
}

impl Violation {
    fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::Missing,
        }
    }

    fn wrong_shape(field: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::WrongShape {
                expected,
                found: json_type_name(found),
            },
        }
    }

    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ViolationKind::Invalid {
                reason: reason.into(),
            },
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "{}: field required", self.field),
            ViolationKind::WrongShape { expected, found } => {
                write!(f, "{}: expected {expected}, found {found}", self.field)
            }
            ViolationKind::Invalid { reason } => write!(f, "{}: {reason}", self.field),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Validation failure detail: every violation found in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} validation error(s): {}", .violations.len(), join_violations(.violations))]
pub struct SchemaError {
    violations: Vec<Violation>,
}

impl SchemaError {
    fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Whether any violation concerns `field` (or one of its elements).
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| {
            v.field == field
                || v.field.starts_with(&format!("{field}["))
                || v.field.starts_with(&format!("{field}."))
        })
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frankie_json() -> Value {
        serde_json::json!({
            "name": "Frankie Knuckles",
            "aliases": ["The Godfather of House"],
            "birth_date": "1955-01-18",
            "birth_place": "The Bronx, New York, USA",
            "active_years": "1970s-2014",
            "notable_tracks": ["Your Love", "The Whistle Song"],
            "associated_labels": ["Trax Records"],
            "influences": ["Disco", "Soul"],
            "known_for": "Pioneering House Music",
            "biography_summary": "Frankie Knuckles was a legendary DJ.",
            "genres": ["House"],
            "website": "http://example.com/frankie",
            "social_media": {"twitter": "frankie_k"},
            "awards": ["Grammy"],
            "collaborations": ["Jamie Principle"],
            "legacy": "Changed music forever."
        })
    }

    #[test]
    fn full_record_parses() {
        let dj = HouseDj::from_value(frankie_json()).unwrap();
        assert_eq!(dj.name(), "Frankie Knuckles");
        assert_eq!(dj.aliases().unwrap(), ["The Godfather of House"]);
        assert_eq!(dj.birth_date(), Some("1955-01-18"));
        assert_eq!(dj.website().unwrap().as_str(), "http://example.com/frankie");
        assert_eq!(dj.social_media().unwrap()["twitter"], "frankie_k");
        assert!(dj.extra().is_empty());
    }

    #[test]
    fn record_round_trips_with_canonical_url() {
        let dj = HouseDj::from_value(serde_json::json!({
            "name": "Frankie Knuckles",
            "website": "HTTP://Example.COM"
        }))
        .unwrap();
        assert_eq!(dj.website().unwrap().as_str(), "http://example.com/");

        let json = serde_json::to_string(&dj).unwrap();
        let reparsed: HouseDj = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, dj);
        assert_eq!(reparsed.website().unwrap().as_str(), "http://example.com/");
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let dj = HouseDj::from_value(serde_json::json!({"name": "Larry Heard"})).unwrap();
        let json = serde_json::to_value(&dj).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Larry Heard"}));
    }

    #[test]
    fn null_optional_fields_count_as_absent() {
        let dj = HouseDj::from_value(serde_json::json!({
            "name": "Ron Hardy",
            "website": null,
            "aliases": null
        }))
        .unwrap();
        assert!(dj.website().is_none());
        assert!(dj.aliases().is_none());
    }

    #[test]
    fn unknown_fields_are_retained() {
        let dj = HouseDj::from_value(serde_json::json!({
            "name": "Marshall Jefferson",
            "residencies": ["The Music Box"],
            "sources": [{"url": "https://example.com/mj"}]
        }))
        .unwrap();
        assert_eq!(dj.extra()["residencies"][0], "The Music Box");
        assert!(dj.extra().contains_key("sources"));

        let json = serde_json::to_value(&dj).unwrap();
        assert_eq!(json["residencies"][0], "The Music Box");
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = HouseDj::from_value(serde_json::json!({
            "aliases": ["Test Alias"],
            "birth_date": "2000-01-01"
        }))
        .unwrap_err();
        assert!(err.mentions("name"));
        assert_eq!(err.violations()[0].kind, ViolationKind::Missing);
        assert!(err.to_string().contains("field required"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = HouseDj::from_value(serde_json::json!({"name": "   "})).unwrap_err();
        assert!(err.mentions("name"));
    }

    #[test]
    fn every_shape_violation_is_reported() {
        let err = HouseDj::from_value(serde_json::json!({
            "name": 42,
            "aliases": "DJ Pierre",
            "genres": ["House", 7],
            "website": "ftp://example.com",
            "social_media": {"instagram": ["a", "b"]},
            "legacy": false
        }))
        .unwrap_err();

        for field in ["name", "aliases", "genres", "website", "social_media", "legacy"] {
            assert!(err.mentions(field), "missing violation for {field}: {err}");
        }
        assert_eq!(err.violations().len(), 6);
        assert!(err.to_string().contains("genres[1]: expected a string, found a number"));
    }

    #[test]
    fn garbage_url_is_rejected() {
        let err = HouseDj::from_value(serde_json::json!({
            "name": "Kerri Chandler",
            "website": "not a url"
        }))
        .unwrap_err();
        assert!(err.mentions("website"));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = HouseDj::from_value(serde_json::json!(["Frankie Knuckles"])).unwrap_err();
        assert_eq!(err.violations()[0].field, "$");
    }

    #[test]
    fn serde_deserialize_validates() {
        let result: Result<HouseDj, _> = serde_json::from_str(r#"{"birth_date": "1955"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn parse_json_separates_decode_from_validation() {
        assert!(matches!(
            HouseDj::parse_json("not valid json"),
            Err(Error::JsonDecode { ref payload, .. }) if payload == "not valid json"
        ));
        assert!(matches!(
            HouseDj::parse_json(r#"{"aliases": []}"#),
            Err(Error::SchemaValidation(_))
        ));
        assert!(HouseDj::parse_json(r#"{"name": "Derrick Carter"}"#).is_ok());
    }

    #[test]
    fn schema_lists_every_declared_field() {
        let schema = HouseDj::json_schema();
        let properties = schema["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 1 + OPTIONAL_FIELDS.len());
        assert_eq!(schema["required"], serde_json::json!(["name"]));
        assert_eq!(properties["name"]["type"], "string");
        assert_eq!(properties["website"]["anyOf"][0]["format"], "uri");
    }

    #[test]
    fn format_instructions_embed_schema() {
        let text = HouseDj::format_instructions();
        assert!(text.contains("\"notable_tracks\""));
        assert!(text.contains("```json"));
        assert!(text.contains('{'));
        assert!(!text.contains("{{"));
    }

    #[test]
    fn example_record_is_valid() {
        let example = HouseDj::example();
        let json = serde_json::to_value(&example).unwrap();
        let reparsed = HouseDj::from_value(json).unwrap();
        assert_eq!(reparsed, example);
        assert_eq!(reparsed.name(), "Frankie Knuckles");
    }
}
