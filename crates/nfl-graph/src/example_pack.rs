// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Example-pack payload consumed by the graph visualizer.
//!
//! Shape: `{ pack, nodes?: [{name, type, ..}], edges?: [{from, to, ..}] }`.
//! A node without `name`/`type` or an edge without `from`/`to` is invalid,
//! and so is an edge naming a node the payload does not define.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{Edge, Graph, Node, Pack, DEFAULT_RELATIONSHIP};

/// Validation failures for example-pack payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackSchemaError {
    /// Top-level value is not an object.
    #[error("example pack must be a JSON object")]
    NotAnObject,
    /// The `pack` field is absent or not a string.
    #[error("missing 'pack'")]
    MissingPack,
    /// `nodes` or `edges` is present but not an array.
    #[error("'{0}' must be a list")]
    NotAList(&'static str),
    /// A node entry lacks `name` or `type`.
    #[error("node {index} missing required field '{field}'")]
    NodeField {
        /// Position in `nodes`.
        index: usize,
        /// Missing field name.
        field: &'static str,
    },
    /// An edge entry lacks `from` or `to`.
    #[error("edge {index} missing required field '{field}'")]
    EdgeField {
        /// Position in `edges`.
        index: usize,
        /// Missing field name.
        field: &'static str,
    },
    /// An edge endpoint names no node in `nodes`.
    #[error("edge {index} references undefined node '{endpoint}'")]
    UndefinedNode {
        /// Position in `edges`.
        index: usize,
        /// The unknown node name.
        endpoint: String,
    },
}

/// Visualizer node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackNode {
    /// Node id.
    pub name: String,
    /// Node type (`isa`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Any additional fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Visualizer edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackEdge {
    /// Source node id.
    pub from: String,
    /// Target node id.
    pub to: String,
    /// Any additional fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full visualizer payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExamplePack {
    /// Pack name.
    pub pack: String,
    /// Nodes to render.
    #[serde(default)]
    pub nodes: Vec<PackNode>,
    /// Edges to render.
    #[serde(default)]
    pub edges: Vec<PackEdge>,
}

fn has_string(entry: &Value, field: &str) -> bool {
    entry.get(field).is_some_and(Value::is_string)
}

/// Check `value` against the example-pack contract and decode it.
pub fn validate_example_pack(value: &Value) -> Result<ExamplePack, PackSchemaError> {
    let obj = value.as_object().ok_or(PackSchemaError::NotAnObject)?;
    if !obj.get("pack").is_some_and(Value::is_string) {
        return Err(PackSchemaError::MissingPack);
    }

    let mut pack = ExamplePack {
        pack: obj
            .get("pack")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        nodes: Vec::new(),
        edges: Vec::new(),
    };

    if let Some(nodes) = obj.get("nodes") {
        let nodes = nodes.as_array().ok_or(PackSchemaError::NotAList("nodes"))?;
        for (index, entry) in nodes.iter().enumerate() {
            for field in ["name", "type"] {
                if !has_string(entry, field) {
                    return Err(PackSchemaError::NodeField { index, field });
                }
            }
            let mut extra = entry.as_object().cloned().unwrap_or_default();
            let name = take_string(&mut extra, "name");
            let kind = take_string(&mut extra, "type");
            pack.nodes.push(PackNode { name, kind, extra });
        }
    }

    if let Some(edges) = obj.get("edges") {
        let edges = edges.as_array().ok_or(PackSchemaError::NotAList("edges"))?;
        let defined: HashSet<&str> = pack.nodes.iter().map(|n| n.name.as_str()).collect();
        let mut decoded = Vec::with_capacity(edges.len());
        for (index, entry) in edges.iter().enumerate() {
            for field in ["from", "to"] {
                if !has_string(entry, field) {
                    return Err(PackSchemaError::EdgeField { index, field });
                }
            }
            let mut extra = entry.as_object().cloned().unwrap_or_default();
            let from = take_string(&mut extra, "from");
            let to = take_string(&mut extra, "to");
            let undefined = [&from, &to]
                .into_iter()
                .find(|name| !defined.contains(name.as_str()));
            if let Some(endpoint) = undefined {
                return Err(PackSchemaError::UndefinedNode {
                    index,
                    endpoint: endpoint.clone(),
                });
            }
            decoded.push(PackEdge { from, to, extra });
        }
        pack.edges = decoded;
    }

    Ok(pack)
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> String {
    match map.shift_remove(key) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

/// String form of a JSON scalar; `None` for null, arrays and objects.
pub fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl ExamplePack {
    /// Project a graph onto the visualizer payload.
    pub fn from_graph(graph: &Graph) -> Self {
        let nodes = graph
            .nodes()
            .map(|node| {
                let mut extra = Map::new();
                if node.label != node.id {
                    extra.insert("label".into(), node.label.clone().into());
                }
                for (k, v) in node.properties.iter().filter(|(k, _)| *k != "isa") {
                    extra.insert(k.clone(), v.clone().into());
                }
                for (k, v) in &node.traits.loose {
                    extra.insert(k.clone(), v.clone().into());
                }
                if !node.traits.groups.is_empty() {
                    let names: Vec<Value> =
                        node.traits.groups.keys().cloned().map(Value::from).collect();
                    extra.insert("traits".into(), Value::Array(names));
                }
                if let Some(state) = &node.state {
                    extra.insert("state".into(), state.clone().into());
                }
                PackNode {
                    name: node.id.clone(),
                    kind: node.node_type().to_owned(),
                    extra,
                }
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| {
                let mut extra = Map::new();
                if !edge.relationship.is_empty() {
                    extra.insert("relationship".into(), edge.relationship.clone().into());
                }
                for (k, v) in &edge.properties {
                    extra.insert(k.clone(), v.clone().into());
                }
                PackEdge {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    extra,
                }
            })
            .collect();

        Self {
            pack: graph.pack.as_ref().map(|p| p.name.clone()).unwrap_or_default(),
            nodes,
            edges,
        }
    }

    /// Rebuild a graph; `type` becomes the `isa` property and scalar extras
    /// become flat properties.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        if !self.pack.is_empty() {
            graph.pack = Some(Pack::named(self.pack.clone()));
        }
        for pn in &self.nodes {
            let mut node = Node::new(pn.name.clone()).with_property("isa", pn.kind.clone());
            for (k, v) in &pn.extra {
                match (k.as_str(), v) {
                    ("label", Value::String(label)) => node.label = label.clone(),
                    ("state", Value::String(state)) => node.state = Some(state.clone()),
                    ("traits", Value::Array(names)) => {
                        for name in names.iter().filter_map(Value::as_str) {
                            node.traits.group_mut(name);
                        }
                    }
                    _ => {
                        if let Some(s) = json_scalar(v) {
                            node.properties.insert(k.clone(), s);
                        }
                    }
                }
            }
            graph.upsert_node(node);
        }
        for pe in &self.edges {
            let relationship = pe
                .extra
                .get("relationship")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_RELATIONSHIP);
            let mut edge = Edge::new(pe.from.clone(), relationship, pe.to.clone());
            for (k, v) in pe.extra.iter().filter(|(k, _)| *k != "relationship") {
                if let Some(s) = json_scalar(v) {
                    edge.properties.insert(k.clone(), s);
                }
            }
            graph.push_edge(edge);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_missing_pack() {
        let err = validate_example_pack(&json!({"nodes": []})).unwrap_err();
        assert_eq!(err, PackSchemaError::MissingPack);
    }

    #[test]
    fn rejects_node_without_type() {
        let err = validate_example_pack(&json!({
            "pack": "demo",
            "nodes": [{"name": "a", "type": "Thing"}, {"name": "b"}]
        }))
        .unwrap_err();
        assert_eq!(err, PackSchemaError::NodeField { index: 1, field: "type" });
    }

    #[test]
    fn rejects_edge_without_to() {
        let err = validate_example_pack(&json!({
            "pack": "demo",
            "edges": [{"from": "a"}]
        }))
        .unwrap_err();
        assert_eq!(err, PackSchemaError::EdgeField { index: 0, field: "to" });
    }

    #[test]
    fn rejects_edge_to_undefined_node() {
        let err = validate_example_pack(&json!({
            "pack": "demo",
            "nodes": [{"name": "a", "type": "Thing"}],
            "edges": [{"from": "a", "to": "a"}, {"from": "a", "to": "ghost"}]
        }))
        .unwrap_err();
        assert_eq!(
            err,
            PackSchemaError::UndefinedNode {
                index: 1,
                endpoint: "ghost".into()
            }
        );
        assert_eq!(err.to_string(), "edge 1 references undefined node 'ghost'");
    }

    #[test]
    fn scalars_render_as_strings() {
        assert_eq!(json_scalar(&json!(3)), Some("3".into()));
        assert_eq!(json_scalar(&json!(true)), Some("true".into()));
        assert_eq!(json_scalar(&json!({"x": 1})), None);
    }

    #[test]
    fn nodes_and_edges_are_optional() {
        let pack = validate_example_pack(&json!({"pack": "empty"})).unwrap();
        assert!(pack.nodes.is_empty());
        assert!(pack.edges.is_empty());
    }

    #[test]
    fn graph_projection_survives_validation() {
        let mut graph = Graph::new();
        graph.pack = Some(Pack::named("demo"));
        graph.upsert_node(
            Node::new("qb")
                .with_label("Quarterback")
                .with_property("isa", "Player"),
        );
        graph.upsert_node(Node::new("wr"));
        graph.push_edge(Edge::new("qb", "throwsTo", "wr").with_property("since", "2020"));

        let value = serde_json::to_value(ExamplePack::from_graph(&graph)).unwrap();
        let pack = validate_example_pack(&value).unwrap();
        let back = pack.to_graph();

        let qb = back.node("qb").unwrap();
        assert_eq!(qb.label, "Quarterback");
        assert_eq!(qb.node_type(), "Player");
        assert_eq!(back.edges()[0].relationship, "throwsTo");
        assert_eq!(back.edges()[0].properties.get("since").map(String::as_str), Some("2020"));
    }
}
