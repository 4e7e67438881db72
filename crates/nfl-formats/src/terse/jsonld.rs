// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Flat schema.org JSON-LD: one `@graph` entry per node and per edge.

use nfl_graph::{json_scalar, Edge, Graph, Node};
use serde_json::{json, Map, Value};

use crate::payload::str_field;
use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "jsonld";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "JSON-LD",
    serialize,
    reconstruct: Some(reconstruct),
};

const RESERVED: [&str; 5] = ["@id", "@type", "name", "label", "state"];

fn node_entry(node: &Node) -> Value {
    let mut entry = Map::new();
    entry.insert("@id".into(), json!(node.id));
    entry.insert("@type".into(), json!("Thing"));
    entry.insert("name".into(), json!(node.label));
    for (key, value) in node.traits.flattened() {
        entry.insert(key, Value::String(value));
    }
    if let Some(state) = &node.state {
        entry.insert("state".into(), json!(state));
    }
    Value::Object(entry)
}

fn edge_entry(edge: &Edge) -> Value {
    json!({
        "@type": "Relationship",
        "from": edge.source,
        "to": edge.target,
        "relationship": edge.relationship,
    })
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let entries: Vec<Value> = graph
        .nodes()
        .map(node_entry)
        .chain(graph.edges().iter().map(edge_entry))
        .collect();
    let doc = json!({ "@context": "http://schema.org", "@graph": entries });
    Ok(Payload::Text(serde_json::to_string_pretty(&doc)?))
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let doc = payload.json(FORMAT)?;
    let mut graph = Graph::new();
    let Some(entries) = doc.get("@graph").and_then(Value::as_array) else {
        return Ok(graph);
    };
    for entry in entries {
        if let (Some(from), Some(to)) = (str_field(entry, "from"), str_field(entry, "to")) {
            let relationship = str_field(entry, "relationship").unwrap_or_default();
            let mut edge = Edge::new(from, relationship, to);
            if let Some(fields) = entry.as_object() {
                for (key, value) in fields {
                    if matches!(key.as_str(), "@type" | "from" | "to" | "relationship") {
                        continue;
                    }
                    if let Some(value) = json_scalar(value) {
                        edge.properties.insert(key.clone(), value);
                    }
                }
            }
            graph.push_edge(edge);
            continue;
        }
        let Some(id) = str_field(entry, "@id") else {
            continue;
        };
        let label = str_field(entry, "name")
            .or_else(|| str_field(entry, "label"))
            .unwrap_or(id);
        let mut node = Node::new(id).with_label(label);
        node.state = str_field(entry, "state").map(str::to_owned);
        if let Some(fields) = entry.as_object() {
            for (key, value) in fields {
                if RESERVED.contains(&key.as_str()) {
                    continue;
                }
                if let Some(value) = json_scalar(value) {
                    node.traits.insert_loose(key.clone(), value);
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
    #![allow(clippy::panic)]
    use super::*;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        let mut alice = Node::new("Alice").with_label("Alice Smith");
        alice.traits.insert_loose("role", "lead");
        graph.upsert_node(alice);
        graph.push_edge(Edge::new("Alice", "knows", "Bob"));
        graph
    }

    #[test]
    fn entries_follow_schema_org_shape() {
        let Payload::Text(text) = serialize(&sample()).unwrap() else {
            panic!("expected text");
        };
        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["@context"], "http://schema.org");
        assert_eq!(
            doc["@graph"][0],
            json!({"@id": "Alice", "@type": "Thing", "name": "Alice Smith", "role": "lead"})
        );
        assert_eq!(
            doc["@graph"][1],
            json!({"@type": "Relationship", "from": "Alice", "to": "Bob", "relationship": "knows"})
        );
    }

    #[test]
    fn reconstruct_restores_nodes_and_edges() {
        let graph = reconstruct(&serialize(&sample()).unwrap()).unwrap();
        assert_eq!(graph, sample());
    }

    #[test]
    fn label_falls_back_to_id() {
        let payload = Payload::Json(json!({"@graph": [{"@id": "x", "label": "Ex"}, {"@id": "y"}]}));
        let graph = reconstruct(&payload).unwrap();
        assert_eq!(graph.node("x").unwrap().label, "Ex");
        assert_eq!(graph.node("y").unwrap().label, "y");
    }

    #[test]
    fn missing_graph_is_empty() {
        let graph = reconstruct(&Payload::Json(json!({"@context": "x"}))).unwrap();
        assert!(graph.is_empty());
    }

    #[test]
    fn malformed_json_propagates() {
        assert!(matches!(
            reconstruct(&Payload::from("{not json")),
            Err(FormatError::Json(_))
        ));
    }
}
