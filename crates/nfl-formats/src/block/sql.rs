// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! SQL DDL plus `INSERT` statements for a two-table node/edge schema.
//! Serialize only.

use nfl_graph::{Graph, Node};
use serde_json::Value;

use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "sql";

const CREATE_NODES: &str =
    "CREATE TABLE IF NOT EXISTS nodes (name TEXT PRIMARY KEY, type TEXT, label TEXT, state JSON);";
const CREATE_EDGES: &str = "CREATE TABLE IF NOT EXISTS edges \
     (from_node TEXT, to_node TEXT, relationship TEXT, properties JSON);";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "SQL",
    serialize,
    reconstruct: None,
};

/// Single-quoted SQL string literal.
fn text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn node_insert(node: &Node) -> Result<String, FormatError> {
    let state = serde_json::to_string(&node.state.as_deref().map_or(Value::Null, Value::from))?;
    Ok(format!(
        "INSERT INTO nodes (name, type, label, state) VALUES ({}, {}, {}, {});",
        text(&node.id),
        text(node.node_type()),
        text(&node.label),
        text(&state)
    ))
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let mut statements = vec![CREATE_NODES.to_owned(), CREATE_EDGES.to_owned()];
    for node in graph.nodes() {
        statements.push(node_insert(node)?);
    }
    for edge in graph.edges() {
        let properties = serde_json::to_string(&edge.properties)?;
        statements.push(format!(
            "INSERT INTO edges (from_node, to_node, relationship, properties) VALUES ({}, {}, {}, {});",
            text(&edge.source),
            text(&edge.target),
            text(&edge.relationship),
            text(&properties)
        ));
    }
    Ok(Payload::Text(statements.join("\n")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use nfl_graph::Edge;

    #[test]
    fn schema_then_rows() {
        let mut graph = Graph::new();
        let mut brady = Node::new("Brady").with_property("isa", "Player");
        brady.state = Some("active".into());
        graph.upsert_node(brady);
        graph.push_edge(Edge::new("Brady", "playsFor", "Patriots").with_property("since", "2000"));

        let text = serialize(&graph).unwrap().render().unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], CREATE_NODES);
        assert_eq!(lines[1], CREATE_EDGES);
        assert_eq!(
            lines[2],
            "INSERT INTO nodes (name, type, label, state) VALUES ('Brady', 'Player', 'Brady', '\"active\"');"
        );
        assert_eq!(
            lines[3],
            "INSERT INTO edges (from_node, to_node, relationship, properties) \
             VALUES ('Brady', 'Patriots', 'playsFor', '{\"since\":\"2000\"}');"
        );
    }

    #[test]
    fn quotes_are_doubled() {
        let mut graph = Graph::new();
        graph.upsert_node(Node::new("O'Brien"));
        let text = serialize(&graph).unwrap().render().unwrap();
        assert!(text.contains("VALUES ('O''Brien', 'Thing', 'O''Brien', 'null');"));
    }
}
