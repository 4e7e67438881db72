// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fixed GraphQL SDL plus a `{nodes, edges}` data payload. Only the data is
//! read back.

use nfl_graph::{json_scalar, Edge, Graph, Node, PropertyMap, DEFAULT_RELATIONSHIP};
use serde_json::{json, Map, Value};

use crate::payload::str_field;
use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "graphql";
const STATS: &str = "stats";

/// Schema emitted alongside every data payload.
pub const SCHEMA: &str = "type Query {
  nodes: [Node]
  edges: [Edge]
}

type Node {
  id: ID!
  isa: String
  name: String
  description: String
  stats: Stats
}

type Edge {
  source: ID!
  relationship: String!
  target: ID!
  since: String
}

type Stats {
  passing_yards: Int
  rushing_yards: Int
  touchdowns: Int
}
";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "GraphQL",
    serialize,
    reconstruct: Some(reconstruct),
};

fn strings(props: &PropertyMap) -> Map<String, Value> {
    props
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect()
}

fn node_entry(node: &Node) -> Value {
    let mut entry = Map::new();
    entry.insert("id".into(), json!(node.id));
    entry.extend(strings(&node.properties));
    if node.label != node.id {
        entry.insert("label".into(), json!(node.label));
    }
    entry.extend(strings(&node.traits.loose));
    let stats = node.traits.group(STATS).map(strings).unwrap_or_default();
    entry.insert(STATS.into(), Value::Object(stats));
    Value::Object(entry)
}

fn edge_entry(edge: &Edge) -> Value {
    let mut entry = Map::new();
    entry.insert("source".into(), json!(edge.source));
    entry.insert("relationship".into(), json!(edge.relationship));
    entry.insert("target".into(), json!(edge.target));
    entry.extend(strings(&edge.properties));
    Value::Object(entry)
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let nodes: Vec<Value> = graph.nodes().map(node_entry).collect();
    let edges: Vec<Value> = graph.edges().iter().map(edge_entry).collect();
    Ok(Payload::GraphQl {
        schema: SCHEMA.to_owned(),
        data: json!({ "nodes": nodes, "edges": edges }),
    })
}

fn list<'v>(data: &'v Value, field: &'static str) -> Result<&'v Vec<Value>, FormatError> {
    data.get(field)
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingField {
            format: FORMAT,
            field,
        })
}

fn required<'v>(entry: &'v Value, field: &'static str) -> Result<&'v str, FormatError> {
    str_field(entry, field).ok_or(FormatError::MissingField {
        format: FORMAT,
        field,
    })
}

fn non_empty_scalar(value: &Value) -> Option<String> {
    json_scalar(value).filter(|v| !v.is_empty())
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let data = payload.json(FORMAT)?;
    let (nodes, edges) = (list(&data, "nodes")?, list(&data, "edges")?);
    let mut graph = Graph::new();
    for entry in nodes {
        let mut node = Node::new(required(entry, "id")?);
        for (key, value) in entry.as_object().into_iter().flatten() {
            match key.as_str() {
                "id" => {}
                STATS => {
                    let stats: PropertyMap = value
                        .as_object()
                        .into_iter()
                        .flatten()
                        .filter_map(|(k, v)| non_empty_scalar(v).map(|v| (k.clone(), v)))
                        .collect();
                    if !stats.is_empty() {
                        *node.traits.group_mut(STATS) = stats;
                    }
                }
                "label" => {
                    if let Some(label) = non_empty_scalar(value) {
                        node.label = label;
                    }
                }
                _ => {
                    if let Some(value) = non_empty_scalar(value) {
                        node.properties.insert(key.clone(), value);
                    }
                }
            }
        }
        graph.upsert_node(node);
    }
    for entry in edges {
        let relationship = str_field(entry, "relationship").unwrap_or(DEFAULT_RELATIONSHIP);
        let mut edge = Edge::new(
            required(entry, "source")?,
            relationship,
            required(entry, "target")?,
        );
        for (key, value) in entry.as_object().into_iter().flatten() {
            if matches!(key.as_str(), "source" | "relationship" | "target") {
                continue;
            }
            if let Some(value) = non_empty_scalar(value) {
                edge.properties.insert(key.clone(), value);
            }
        }
        graph.push_edge(edge);
    }
    Ok(graph)
}
