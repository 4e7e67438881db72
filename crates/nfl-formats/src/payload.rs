// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Target-side content exchanged with adapters.

use nfl_graph::Graph;
use serde_json::Value;

use crate::FormatError;

/// Serialized form of a graph in some target format.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Plain text document.
    Text(String),
    /// Structured JSON object.
    Json(Value),
    /// Separate node and edge CSV tables.
    Tables {
        /// Node table.
        nodes: String,
        /// Edge table.
        edges: String,
    },
    /// SDL schema plus JSON data.
    GraphQl {
        /// Schema text; never read back.
        schema: String,
        /// `{nodes, edges}` data payload.
        data: Value,
    },
}

impl Payload {
    /// Borrow text content.
    pub fn text(&self, format: &'static str) -> Result<&str, FormatError> {
        match self {
            Payload::Text(text) => Ok(text),
            _ => Err(FormatError::PayloadKind {
                format,
                expected: "text",
            }),
        }
    }

    /// JSON content, parsing text when needed. GraphQL payloads yield their data.
    pub fn json(&self, format: &'static str) -> Result<Value, FormatError> {
        match self {
            Payload::Json(value) | Payload::GraphQl { data: value, .. } => Ok(value.clone()),
            Payload::Text(text) => Ok(serde_json::from_str(text)?),
            Payload::Tables { .. } => Err(FormatError::PayloadKind {
                format,
                expected: "JSON",
            }),
        }
    }

    /// Human-readable rendering (pretty JSON, tables separated by a blank line).
    pub fn render(&self) -> Result<String, FormatError> {
        Ok(match self {
            Payload::Text(text) => text.clone(),
            Payload::Json(value) => serde_json::to_string_pretty(value)?,
            Payload::Tables { nodes, edges } => format!("{nodes}\n{edges}"),
            Payload::GraphQl { schema, data } => {
                format!("{schema}\n{}", serde_json::to_string_pretty(data)?)
            }
        })
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

/// NFL input: source text or an already-parsed graph.
#[derive(Debug, Clone, Copy)]
pub enum NflSource<'a> {
    /// NFL source text.
    Text(&'a str),
    /// Parsed graph.
    Graph(&'a Graph),
}

impl<'a> From<&'a str> for NflSource<'a> {
    fn from(text: &'a str) -> Self {
        NflSource::Text(text)
    }
}

impl<'a> From<&'a String> for NflSource<'a> {
    fn from(text: &'a String) -> Self {
        NflSource::Text(text)
    }
}

impl<'a> From<&'a Graph> for NflSource<'a> {
    fn from(graph: &'a Graph) -> Self {
        NflSource::Graph(graph)
    }
}

/// Non-empty string field.
pub(crate) fn str_field<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn text_parses_as_json() {
        let payload = Payload::from(r#"{"a": 1}"#);
        assert_eq!(payload.json("test").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn tables_are_not_json() {
        let payload = Payload::Tables {
            nodes: String::new(),
            edges: String::new(),
        };
        assert!(matches!(
            payload.json("test"),
            Err(FormatError::PayloadKind { expected: "JSON", .. })
        ));
    }
}
