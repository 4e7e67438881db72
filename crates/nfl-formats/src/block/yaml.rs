// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `{nodes: {<id>: {...}}, edges: [...]}` YAML document.

use indexmap::IndexMap;
use nfl_graph::{json_scalar, Edge, Graph, Node, PropertyMap, DEFAULT_RELATIONSHIP};
use serde::Serialize;
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

#[derive(Serialize)]
struct YamlNode<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    #[serde(flatten)]
    properties: &'a PropertyMap,
    #[serde(flatten)]
    loose: &'a PropertyMap,
    #[serde(skip_serializing_if = "no_groups")]
    traits: &'a IndexMap<String, PropertyMap>,
}

#[derive(Serialize)]
struct YamlEdge<'a> {
    source: &'a str,
    relationship: &'a str,
    target: &'a str,
    #[serde(skip_serializing_if = "no_properties")]
    properties: &'a PropertyMap,
}

#[derive(Serialize)]
struct YamlDoc<'a> {
    nodes: IndexMap<&'a str, YamlNode<'a>>,
    edges: Vec<YamlEdge<'a>>,
}

fn no_groups(groups: &&IndexMap<String, PropertyMap>) -> bool {
    groups.is_empty()
}

fn no_properties(props: &&PropertyMap) -> bool {
    props.is_empty()
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let doc = YamlDoc {
        nodes: graph
            .nodes()
            .map(|node| {
                let entry = YamlNode {
                    label: (node.label != node.id).then_some(node.label.as_str()),
                    properties: &node.properties,
                    loose: &node.traits.loose,
                    traits: &node.traits.groups,
                };
                (node.id.as_str(), entry)
            })
            .collect(),
        edges: graph
            .edges()
            .iter()
            .map(|edge| YamlEdge {
                source: &edge.source,
                relationship: &edge.relationship,
                target: &edge.target,
                properties: &edge.properties,
            })
            .collect(),
    };
    Ok(Payload::Text(serde_yaml::to_string(&doc)?))
}

fn scalars(value: &Value) -> impl Iterator<Item = (&String, String)> {
    value
        .as_object()
        .into_iter()
        .flatten()
        .filter_map(|(k, v)| json_scalar(v).map(|v| (k, v)))
}

fn read_node(id: &str, body: &Value) -> Node {
    let mut node = Node::new(id);
    for (key, value) in scalars(body) {
        if key == "label" {
            if !value.is_empty() {
                node.label = value;
            }
        } else {
            node.properties.insert(key.clone(), value);
        }
    }
    if let Some(traits) = body.get("traits").and_then(Value::as_object) {
        for (name, props) in traits {
            let group = node.traits.group_mut(name);
            for (key, value) in scalars(props) {
                group.insert(key.clone(), value);
            }
        }
    }
    node
}

fn read_edge(entry: &Value) -> Result<Edge, FormatError> {
    let endpoint = |field: &'static str| {
        str_field(entry, field).ok_or(FormatError::MissingField {
            format: FORMAT,
            field,
        })
    };
    let relationship = str_field(entry, "relationship").unwrap_or(DEFAULT_RELATIONSHIP);
    let mut edge = Edge::new(endpoint("source")?, relationship, endpoint("target")?);
    if let Some(props) = entry.get("properties") {
        for (key, value) in scalars(props) {
            edge.properties.insert(key.clone(), value);
        }
    }
    Ok(edge)
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let doc: Value = serde_yaml::from_str(payload.text(FORMAT)?)?;
    let nodes = doc
        .get("nodes")
        .and_then(Value::as_object)
        .ok_or(FormatError::MissingField {
            format: FORMAT,
            field: "nodes",
        })?;
    let mut graph = Graph::new();
    for (id, body) in nodes {
        graph.upsert_node(read_node(id, body));
    }
    for entry in doc.get("edges").and_then(Value::as_array).into_iter().flatten() {
        graph.push_edge(read_edge(entry)?);
    }
    Ok(graph)
}
