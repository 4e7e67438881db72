// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GeoJSON `FeatureCollection` with one geometry-less feature per node.

use nfl_graph::{json_scalar, Graph, Node};
use serde_json::{json, Map, Value};

use crate::payload::str_field;
use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "geojson";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "GeoJSON",
    serialize,
    reconstruct: Some(reconstruct),
};

fn feature(node: &Node) -> Value {
    let mut props = Map::new();
    props.insert("id".into(), json!(node.id));
    props.insert("label".into(), json!(node.label));
    for (key, value) in node.traits.flattened() {
        props.insert(key, Value::String(value));
    }
    if let Some(state) = &node.state {
        props.insert("state".into(), json!(state));
    }
    json!({ "type": "Feature", "geometry": null, "properties": props })
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let features: Vec<Value> = graph.nodes().map(feature).collect();
    let doc = json!({ "type": "FeatureCollection", "features": features });
    Ok(Payload::Text(serde_json::to_string_pretty(&doc)?))
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let doc = payload.json(FORMAT)?;
    let mut graph = Graph::new();
    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .ok_or(FormatError::MissingField {
            format: FORMAT,
            field: "features",
        })?;
    for feature in features {
        let Some(props) = feature.get("properties") else {
            continue;
        };
        let Some(id) = str_field(props, "id").or_else(|| str_field(props, "name")) else {
            continue;
        };
        let label = str_field(props, "label")
            .or_else(|| str_field(props, "name"))
            .unwrap_or(id);
        let mut node = Node::new(id).with_label(label);
        node.state = str_field(props, "state").map(str::to_owned);
        for (key, value) in props.as_object().into_iter().flatten() {
            if matches!(key.as_str(), "id" | "label" | "name" | "state") {
                continue;
            }
            if let Some(value) = json_scalar(value) {
                node.traits.insert_loose(key.clone(), value);
            }
        }
        graph.upsert_node(node);
    }
    Ok(graph)
}
