// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! What each terse format keeps and what it drops.
#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use nfl_formats::{convert_from_nfl, convert_to_nfl, Payload};
use nfl_graph::{Edge, Graph, Node, PropertyMap};
use nfl_syntax::{parse, Dialect};
use proptest::prelude::*;

const RESERVED: [&str; 10] = [
    "@id", "@type", "id", "name", "label", "state", "from", "to", "etikedo", "relationship",
];

fn ident() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,8}"
}

fn label() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]([A-Za-z0-9 ,.]{0,10}[A-Za-z0-9])?"
}

fn traits() -> impl Strategy<Value = PropertyMap> {
    prop::collection::vec(("[a-z][a-z0-9_]{0,8}", "[A-Za-z0-9 ]{0,10}"), 0..4).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(k, _)| !RESERVED.contains(&k.as_str()))
            .collect()
    })
}

fn graph() -> impl Strategy<Value = Graph> {
    let node = (ident(), label(), traits()).prop_map(|(id, label, loose)| {
        let mut node = Node::new(id).with_label(label);
        node.traits.loose = loose;
        node
    });
    let edge = (ident(), prop::option::of(ident()), ident())
        .prop_map(|(s, r, t)| Edge::new(s, r.unwrap_or_default(), t));
    (
        prop::collection::vec(node, 0..6),
        prop::collection::vec(edge, 0..4),
    )
        .prop_map(|(nodes, edges)| {
            let mut g = Graph::new();
            nodes.into_iter().for_each(|n| g.upsert_node(n));
            edges.into_iter().for_each(|e| g.push_edge(e));
            g
        })
}

fn through(graph: &Graph, format: &str) -> Graph {
    let payload: Payload = convert_from_nfl(graph, format).unwrap();
    parse(&convert_to_nfl(&payload, format).unwrap(), Dialect::Terse)
}

fn ids_and_labels(graph: &Graph) -> Vec<(String, String)> {
    graph
        .nodes()
        .map(|n| (n.id.clone(), n.label.clone()))
        .collect()
}

proptest! {
    #[test]
    fn csv_keeps_ids_and_labels_only(g in graph()) {
        let back = through(&g, "csv");
        prop_assert_eq!(ids_and_labels(&back), ids_and_labels(&g));
        prop_assert!(back.nodes().all(|n| n.traits.is_empty()));
        prop_assert!(back.edges().is_empty());
    }

    #[test]
    fn jsonld_keeps_traits_and_edges(g in graph()) {
        prop_assert_eq!(through(&g, "jsonld"), g);
    }

    #[test]
    fn yaml_and_geojson_keep_nodes_but_drop_edges(g in graph()) {
        for format in ["yaml", "geojson"] {
            let back = through(&g, format);
            prop_assert_eq!(back.nodes().cloned().collect::<Vec<_>>(), g.nodes().cloned().collect::<Vec<_>>());
            prop_assert!(back.edges().is_empty());
        }
    }
}
