// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON-LD with `urn:nfl:` identifiers, typed nodes and `<trait>_trait`
//! objects.

use nfl_graph::{
    json_scalar, Edge, Graph, Node, PropertyMap, DEFAULT_NODE_TYPE, DEFAULT_RELATIONSHIP,
};
use serde_json::{json, Map, Value};

use crate::payload::str_field;
use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "jsonld";
const URN: &str = "urn:nfl:";
const RELATIONSHIP_TYPE: &str = "Relationship";
const TRAIT_SUFFIX: &str = "_trait";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "JSON-LD",
    serialize,
    reconstruct: Some(reconstruct),
};

fn urn(id: &str) -> String {
    format!("{URN}{id}")
}

fn strip_urn(value: &str) -> &str {
    value.strip_prefix(URN).unwrap_or(value)
}

fn string_object(props: &PropertyMap) -> Value {
    Value::Object(
        props
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}

fn node_entry(node: &Node) -> Value {
    let mut entry = Map::new();
    entry.insert("@id".into(), json!(urn(&node.id)));
    entry.insert("@type".into(), json!(node.node_type()));
    for (key, value) in node.properties.iter().filter(|(k, _)| *k != "isa") {
        entry.insert(key.clone(), json!(value));
    }
    if node.label != node.id {
        entry.insert("label".into(), json!(node.label));
    }
    for (key, value) in &node.traits.loose {
        entry.insert(key.clone(), json!(value));
    }
    for (name, props) in &node.traits.groups {
        entry.insert(format!("{name}{TRAIT_SUFFIX}"), string_object(props));
    }
    Value::Object(entry)
}

fn edge_entry(edge: &Edge) -> Value {
    let mut entry = Map::new();
    entry.insert("@id".into(), json!(urn(&format!("edge_{}", edge.key()))));
    entry.insert("@type".into(), json!(RELATIONSHIP_TYPE));
    entry.insert("source".into(), json!(urn(&edge.source)));
    entry.insert("target".into(), json!(urn(&edge.target)));
    entry.insert("relationship".into(), json!(edge.relationship));
    for (key, value) in &edge.properties {
        entry.insert(key.clone(), json!(value));
    }
    Value::Object(entry)
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let entries: Vec<Value> = graph
        .nodes()
        .map(node_entry)
        .chain(graph.edges().iter().map(edge_entry))
        .collect();
    Ok(Payload::Json(
        json!({ "@context": "http://schema.org", "@graph": entries }),
    ))
}

fn required<'v>(entry: &'v Value, field: &'static str) -> Result<&'v str, FormatError> {
    str_field(entry, field).ok_or(FormatError::MissingField {
        format: FORMAT,
        field,
    })
}

fn read_edge(entry: &Value) -> Result<Edge, FormatError> {
    let source = strip_urn(required(entry, "source")?);
    let target = strip_urn(required(entry, "target")?);
    let relationship = str_field(entry, "relationship").unwrap_or(DEFAULT_RELATIONSHIP);
    let mut edge = Edge::new(source, relationship, target);
    for (key, value) in entry.as_object().into_iter().flatten() {
        if matches!(
            key.as_str(),
            "@id" | "@type" | "source" | "target" | "relationship"
        ) {
            continue;
        }
        if let Some(value) = json_scalar(value) {
            edge.properties.insert(key.clone(), value);
        }
    }
    Ok(edge)
}

fn read_node(entry: &Value) -> Result<Node, FormatError> {
    let mut node = Node::new(strip_urn(required(entry, "@id")?));
    if let Some(kind) = str_field(entry, "@type").filter(|t| *t != DEFAULT_NODE_TYPE) {
        node.properties.insert("isa".into(), kind.to_owned());
    }
    for (key, value) in entry.as_object().into_iter().flatten() {
        match (key.as_str(), value) {
            ("@id" | "@type", _) => {}
            ("label", _) => {
                if let Some(label) = json_scalar(value).filter(|l| !l.is_empty()) {
                    node.label = label;
                }
            }
            (_, Value::Object(props)) => {
                let Some(name) = key.strip_suffix(TRAIT_SUFFIX) else {
                    continue;
                };
                let group = node.traits.group_mut(name);
                for (k, v) in props {
                    if let Some(v) = json_scalar(v) {
                        group.insert(k.clone(), v);
                    }
                }
            }
            _ => {
                if let Some(value) = json_scalar(value) {
                    node.properties.insert(key.clone(), value);
                }
            }
        }
    }
    Ok(node)
}

/// `Relationship` entries carrying an endpoint; a node typed `Relationship`
/// has neither.
fn is_edge(entry: &Value) -> bool {
    str_field(entry, "@type") == Some(RELATIONSHIP_TYPE)
        && (entry.get("source").is_some() || entry.get("target").is_some())
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let doc = payload.json(FORMAT)?;
    let entries = doc
        .get("@graph")
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingField {
            format: FORMAT,
            field: "@graph",
        })?;
    let mut graph = Graph::new();
    for entry in entries {
        if is_edge(entry) {
            graph.push_edge(read_edge(entry)?);
        } else {
            graph.upsert_node(read_node(entry)?);
        }
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
        let mut brady = Node::new("Brady")
            .with_property("isa", "Player")
            .with_property("name", "Tom Brady");
        let stats = brady.traits.group_mut("stats");
        stats.insert("touchdowns".into(), "649".into());
        graph.upsert_node(brady);
        graph.upsert_node(Node::new("Patriots").with_label("New England"));
        graph.push_edge(Edge::new("Brady", "playsFor", "Patriots").with_property("since", "2000"));
        graph
    }

    #[test]
    fn node_and_edge_entries() {
        let Payload::Json(doc) = serialize(&sample()).unwrap() else {
            panic!("expected json");
        };
        assert_eq!(
            doc["@graph"][0],
            json!({
                "@id": "urn:nfl:Brady",
                "@type": "Player",
                "name": "Tom Brady",
                "stats_trait": {"touchdowns": "649"}
            })
        );
        assert_eq!(doc["@graph"][1]["@type"], "Thing");
        assert_eq!(
            doc["@graph"][2],
            json!({
                "@id": "urn:nfl:edge_Brady_playsFor_Patriots",
                "@type": "Relationship",
                "source": "urn:nfl:Brady",
                "target": "urn:nfl:Patriots",
                "relationship": "playsFor",
                "since": "2000"
            })
        );
    }

    #[test]
    fn round_trip_is_lossless_for_block_graphs() {
        let graph = sample();
        assert_eq!(reconstruct(&serialize(&graph).unwrap()).unwrap(), graph);
    }

    #[test]
    fn edges_need_endpoints() {
        let payload = Payload::Json(json!({"@graph": [{"@type": "Relationship", "source": "urn:nfl:a"}]}));
        let err = reconstruct(&payload).unwrap_err();
        assert!(matches!(err, FormatError::MissingField { field: "target", .. }));
    }

    #[test]
    fn relationship_typed_nodes_stay_nodes() {
        let mut graph = Graph::new();
        graph.upsert_node(Node::new("marriage").with_property("isa", RELATIONSHIP_TYPE));
        graph.push_edge(Edge::new("a", "partOf", "marriage"));
        let back = reconstruct(&serialize(&graph).unwrap()).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn graph_array_is_required() {
        let err = reconstruct(&Payload::Json(json!({}))).unwrap_err();
        assert!(matches!(err, FormatError::MissingField { field: "@graph", .. }));
    }
}
