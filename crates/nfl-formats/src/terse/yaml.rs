// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One YAML mapping per node keyed by id. Edges are not represented.

use nfl_graph::{json_scalar, Graph, Node};
use serde_json::Value;

use crate::payload::str_field;
use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "yaml";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "YAML",
    serialize,
    reconstruct: Some(reconstruct),
};

/// Words a YAML reader would resolve to null or a boolean.
const RESOLVED_WORDS: [&str; 10] = [
    "null", "true", "false", "yes", "no", "on", "off", "y", "n", "~",
];

fn is_plain_key(key: &str) -> bool {
    key.starts_with(|c: char| c.is_alphabetic() || c == '_')
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        && !RESOLVED_WORDS.contains(&key.to_ascii_lowercase().as_str())
}

/// Double-quoted YAML scalar; JSON string syntax is a subset of it.
fn scalar(value: &str) -> Result<String, FormatError> {
    Ok(serde_json::to_string(value)?)
}

fn key(key: &str) -> Result<String, FormatError> {
    if is_plain_key(key) {
        Ok(key.to_owned())
    } else {
        scalar(key)
    }
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let mut out = String::new();
    for node in graph.nodes() {
        out.push_str(&format!("{}:\n", key(&node.id)?));
        out.push_str(&format!("  label: {}\n", scalar(&node.label)?));
        for (k, v) in node.traits.flattened() {
            out.push_str(&format!("  {}: {}\n", key(&k)?, scalar(&v)?));
        }
        if let Some(state) = &node.state {
            out.push_str(&format!("  state: {}\n", scalar(state)?));
        }
    }
    Ok(Payload::Text(out))
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let text = payload.text(FORMAT)?;
    let mut graph = Graph::new();
    if text.trim().is_empty() {
        return Ok(graph);
    }
    let doc: Value = serde_yaml::from_str(text)?;
    let entries = match doc {
        Value::Null => return Ok(graph),
        Value::Object(entries) => entries,
        _ => {
            return Err(FormatError::PayloadKind {
                format: FORMAT,
                expected: "a mapping of node ids",
            })
        }
    };
    for (id, body) in &entries {
        let mut node = Node::new(id.as_str());
        match body {
            Value::Object(fields) => {
                let label_key = ["label", "name"]
                    .into_iter()
                    .find(|k| str_field(body, k).is_some());
                if let Some(label) = label_key.and_then(|k| str_field(body, k)) {
                    node.label = label.to_owned();
                }
                node.state = str_field(body, "state").map(str::to_owned);
                for (k, v) in fields {
                    if Some(k.as_str()) == label_key || k == "state" {
                        continue;
                    }
                    if let Some(v) = json_scalar(v) {
                        node.traits.insert_loose(k.clone(), v);
                    }
                }
            }
            other => {
                if let Some(label) = json_scalar(other).filter(|l| !l.is_empty()) {
                    node.label = label;
                }
            }
        }
        graph.upsert_node(node);
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn writes_label_traits_then_state() {
        let mut graph = Graph::new();
        let mut alice = Node::new("Alice").with_label("Alice Smith");
        alice.traits.insert_loose("role", "lead");
        alice.state = Some("active".into());
        graph.upsert_node(alice);
        let payload = serialize(&graph).unwrap();
        assert_eq!(
            payload,
            Payload::from(
                "Alice:\n  label: \"Alice Smith\"\n  role: \"lead\"\n  state: \"active\"\n"
            )
        );
        assert_eq!(reconstruct(&payload).unwrap(), graph);
    }

    #[test]
    fn odd_ids_are_quoted() {
        let mut graph = Graph::new();
        graph.upsert_node(Node::new("a: b"));
        let payload = serialize(&graph).unwrap();
        assert_eq!(reconstruct(&payload).unwrap(), graph);
    }

    #[test]
    fn keyword_ids_stay_strings() {
        let mut graph = Graph::new();
        graph.upsert_node(Node::new("true"));
        graph.upsert_node(Node::new("Null"));
        let payload = serialize(&graph).unwrap();
        assert_eq!(reconstruct(&payload).unwrap(), graph);
    }

    #[test]
    fn hand_written_yaml_is_accepted() {
        let graph = reconstruct(&Payload::from("Bob:\n  name: Bob Jones\n  age: 41\nCarol: Carol K\n"))
            .unwrap();
        let bob = graph.node("Bob").unwrap();
        assert_eq!(bob.label, "Bob Jones");
        assert_eq!(bob.traits.loose.get("age").map(String::as_str), Some("41"));
        assert_eq!(graph.node("Carol").unwrap().label, "Carol K");
    }

    #[test]
    fn empty_document_is_empty_graph() {
        assert!(reconstruct(&Payload::from("")).unwrap().is_empty());
    }

    #[test]
    fn sequences_are_rejected() {
        assert!(matches!(
            reconstruct(&Payload::from("- a\n- b\n")),
            Err(FormatError::PayloadKind { .. })
        ));
    }
}
