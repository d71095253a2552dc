//! Chat prompt templates.
//!
//! A [`PromptTemplate`] is an ordered list of message slots. System and human
//! slots are built from segments: template text, where `{name}` is a variable
//! and `{{`/`}}` are literal braces, or literal text that is inserted as-is.
//! Placeholder slots expand to a list of messages supplied at render time.

use std::collections::HashMap;

use archivist_core::message::Message;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Missing value for template variable '{0}'")]
    MissingVariable(String),

    #[error("Malformed template at byte {position}: {reason}")]
    Malformed { position: usize, reason: String },
}

/// One piece of a message slot.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Template source with `{name}` variables.
    Template(String),
    /// Inserted verbatim; braces carry no meaning.
    Literal(String),
}

impl Segment {
    pub fn template(text: impl Into<String>) -> Self {
        Segment::Template(text.into())
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Segment::Literal(text.into())
    }
}

#[derive(Debug, Clone)]
enum Slot {
    System(Vec<Segment>),
    Human(Vec<Segment>),
    Placeholder(String),
}

/// Values supplied when rendering a template.
#[derive(Debug, Clone, Default)]
pub struct PromptValues {
    variables: HashMap<String, String>,
    placeholders: HashMap<String, Vec<Message>>,
}

impl PromptValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_messages(mut self, name: impl Into<String>, messages: Vec<Message>) -> Self {
        self.placeholders.insert(name.into(), messages);
        self
    }

    /// Replace the messages bound to a placeholder.
    pub fn set_messages(&mut self, name: impl Into<String>, messages: Vec<Message>) {
        self.placeholders.insert(name.into(), messages);
    }
}

/// An ordered list of message slots.
#[derive(Debug, Clone, Default)]
pub struct PromptTemplate {
    slots: Vec<Slot>,
}

impl PromptTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.slots.push(Slot::System(segments.into_iter().collect()));
        self
    }

    pub fn human(mut self, segments: impl IntoIterator<Item = Segment>) -> Self {
        self.slots.push(Slot::Human(segments.into_iter().collect()));
        self
    }

    /// A slot that expands to zero or more messages. An unbound placeholder
    /// renders as empty.
    pub fn placeholder(mut self, name: impl Into<String>) -> Self {
        self.slots.push(Slot::Placeholder(name.into()));
        self
    }

    /// Names of every `{variable}` referenced by template segments.
    pub fn input_variables(&self) -> Result<Vec<String>, TemplateError> {
        let mut names = Vec::new();
        for slot in &self.slots {
            let segments = match slot {
                Slot::System(segments) | Slot::Human(segments) => segments,
                Slot::Placeholder(_) => continue,
            };
            for segment in segments {
                if let Segment::Template(source) = segment {
                    for piece in parse(source)? {
                        if let Piece::Variable(name) = piece {
                            if !names.iter().any(|n| n == name) {
                                names.push(name.to_string());
                            }
                        }
                    }
                }
            }
        }
        Ok(names)
    }

    /// Render every slot into messages.
    pub fn format(&self, values: &PromptValues) -> Result<Vec<Message>, TemplateError> {
        let mut messages = Vec::new();
        for slot in &self.slots {
            match slot {
                Slot::System(segments) => {
                    messages.push(Message::system(render(segments, values)?));
                }
                Slot::Human(segments) => {
                    messages.push(Message::user(render(segments, values)?));
                }
                Slot::Placeholder(name) => {
                    if let Some(bound) = values.placeholders.get(name) {
                        messages.extend(bound.iter().cloned());
                    }
                }
            }
        }
        Ok(messages)
    }
}

enum Piece<'a> {
    Text(&'a str),
    Brace(char),
    Variable(&'a str),
}

fn render(segments: &[Segment], values: &PromptValues) -> Result<String, TemplateError> {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Template(source) => {
                for piece in parse(source)? {
                    match piece {
                        Piece::Text(text) => out.push_str(text),
                        Piece::Brace(c) => out.push(c),
                        Piece::Variable(name) => {
                            let value = values
                                .variables
                                .get(name)
                                .ok_or_else(|| TemplateError::MissingVariable(name.to_string()))?;
                            out.push_str(value);
                        }
                    }
                }
            }
        }
    }
    Ok(out)
}

fn parse(source: &str) -> Result<Vec<Piece<'_>>, TemplateError> {
    let mut pieces = Vec::new();
    let bytes = source.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                if start < i {
                    pieces.push(Piece::Text(&source[start..i]));
                }
                pieces.push(Piece::Brace(bytes[i] as char));
                i += 2;
                start = i;
            }
            b'{' => {
                let close = source[i + 1..]
                    .find('}')
                    .map(|offset| i + 1 + offset)
                    .ok_or_else(|| TemplateError::Malformed {
                        position: i,
                        reason: "unclosed '{'".into(),
                    })?;
                let name = source[i + 1..close].trim();
                if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                    return Err(TemplateError::Malformed {
                        position: i,
                        reason: format!("invalid variable name '{name}'"),
                    });
                }
                if start < i {
                    pieces.push(Piece::Text(&source[start..i]));
                }
                pieces.push(Piece::Variable(name));
                i = close + 1;
                start = i;
            }
            b'}' => {
                return Err(TemplateError::Malformed {
                    position: i,
                    reason: "single '}' outside a variable".into(),
                });
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        pieces.push(Piece::Text(&source[start..]));
    }
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use archivist_core::message::Role;

    #[test]
    fn variables_are_substituted() {
        let template = PromptTemplate::new().human([Segment::template("Research {input} now")]);
        let messages = template
            .format(&PromptValues::new().with_variable("input", "Larry Heard"))
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "Research Larry Heard now");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let template = PromptTemplate::new().system([Segment::template("{{\"a\": {x}}}")]);
        let messages = template
            .format(&PromptValues::new().with_variable("x", "1"))
            .unwrap();
        assert_eq!(messages[0].content, "{\"a\": 1}");
    }

    #[test]
    fn literal_segments_keep_braces() {
        let schema = r#"{"properties": {"name": {"type": "string"}}}"#;
        let template = PromptTemplate::new().system([
            Segment::template("Schema:\n"),
            Segment::literal(schema),
        ]);
        let messages = template.format(&PromptValues::new()).unwrap();
        assert_eq!(messages[0].content, format!("Schema:\n{schema}"));
    }

    #[test]
    fn variable_values_are_not_reparsed() {
        let template = PromptTemplate::new().human([Segment::template("{input}")]);
        let messages = template
            .format(&PromptValues::new().with_variable("input", "what is {input}?"))
            .unwrap();
        assert_eq!(messages[0].content, "what is {input}?");
    }

    #[test]
    fn missing_variable_is_an_error() {
        let template = PromptTemplate::new().human([Segment::template("{input}")]);
        let err = template.format(&PromptValues::new()).unwrap_err();
        assert_eq!(err, TemplateError::MissingVariable("input".into()));
    }

    #[test]
    fn malformed_templates_rejected() {
        for source in ["open {brace", "stray } brace", "{}", "{not valid}"] {
            let template = PromptTemplate::new().human([Segment::template(source)]);
            assert!(
                matches!(
                    template.format(&PromptValues::new()),
                    Err(TemplateError::Malformed { .. })
                ),
                "{source}"
            );
        }
    }

    #[test]
    fn placeholders_expand_in_order() {
        let template = PromptTemplate::new()
            .system([Segment::template("sys")])
            .placeholder("history")
            .human([Segment::template("{input}")])
            .placeholder("scratchpad");

        let values = PromptValues::new()
            .with_variable("input", "q")
            .with_messages("scratchpad", vec![Message::assistant("a"), Message::tool_result("c1", "r")]);

        let messages = template.format(&values).unwrap();
        let roles: Vec<Role> = messages.iter().map(|m| m.role.clone()).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::Tool]);
    }

    #[test]
    fn input_variables_listed_once() {
        let template = PromptTemplate::new()
            .system([Segment::template("{persona}"), Segment::literal("{ignored}")])
            .human([Segment::template("{input} {input} {{x}}")]);
        assert_eq!(template.input_variables().unwrap(), vec!["persona", "input"]);
    }
}
