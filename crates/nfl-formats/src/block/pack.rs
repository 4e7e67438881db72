// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Visualizer example-pack JSON (`{pack, nodes, edges}`).

use nfl_graph::{validate_example_pack, ExamplePack, Graph};

use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "pack";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "Example Pack",
    serialize,
    reconstruct: Some(reconstruct),
};

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let value = serde_json::to_value(ExamplePack::from_graph(graph))?;
    validate_example_pack(&value)?;
    Ok(Payload::Json(value))
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let value = payload.json(FORMAT)?;
    Ok(validate_example_pack(&value)?.to_graph())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::panic)]
    use super::*;
    use nfl_graph::{Edge, Node, Pack, PackSchemaError};
    use serde_json::json;

    #[test]
    fn emits_a_valid_pack() {
        let mut graph = Graph::new();
        graph.pack = Some(Pack::named("NFL_Legends"));
        graph.upsert_node(Node::new("Brady").with_property("isa", "Player"));
        graph.upsert_node(Node::new("Patriots").with_property("isa", "Team"));
        graph.push_edge(Edge::new("Brady", "playsFor", "Patriots"));
        let Payload::Json(value) = serialize(&graph).unwrap() else {
            panic!("expected json");
        };
        assert_eq!(value["pack"], "NFL_Legends");
        assert_eq!(value["nodes"][0], json!({"name": "Brady", "type": "Player"}));
        assert_eq!(
            value["edges"][0],
            json!({"from": "Brady", "to": "Patriots", "relationship": "playsFor"})
        );
        assert_eq!(reconstruct(&Payload::Json(value)).unwrap(), graph);
    }

    #[test]
    fn invalid_packs_are_rejected() {
        let payload = Payload::Json(json!({"pack": "p", "nodes": [{"name": "a"}]}));
        assert!(matches!(reconstruct(&payload), Err(FormatError::PackSchema(_))));
    }

    #[test]
    fn dangling_edges_are_not_emitted() {
        let mut graph = Graph::new();
        graph.pack = Some(Pack::named("P"));
        graph.push_edge(Edge::new("ghost", "haunts", "phantom"));
        assert!(matches!(
            serialize(&graph),
            Err(FormatError::PackSchema(PackSchemaError::UndefinedNode { index: 0, .. }))
        ));
    }

    #[test]
    fn dangling_edges_are_not_read() {
        let payload = Payload::Json(json!({
            "pack": "P",
            "nodes": [],
            "edges": [{"from": "ghost", "to": "phantom"}]
        }));
        let err = reconstruct(&payload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "example pack: edge 0 references undefined node 'ghost'"
        );
    }
}
