// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! OWL individuals in Turtle syntax. Serialize only.

use nfl_graph::{Graph, Node};

use crate::turtle::{self, OWL_NS};
use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "owl";
/// Predicate for edges that carry no relationship.
const CONNECTED_TO: &str = "connectedTo";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "OWL",
    serialize,
    reconstruct: None,
};

fn individual(node: &Node) -> String {
    let mut predicates = vec![
        "a owl:NamedIndividual".to_owned(),
        format!("nfl:type {}", turtle::literal(node.node_type())),
    ];
    if node.label != node.id {
        predicates.push(format!("rdfs:label {}", turtle::literal(&node.label)));
    }
    if let Some(state) = &node.state {
        predicates.push(format!("nfl:state {}", turtle::literal(state)));
    }
    format!("{} {} .\n", turtle::nfl_term(&node.id), predicates.join(" ;\n    "))
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let mut out = turtle::prefix_header();
    out.push_str(&format!("@prefix owl: <{OWL_NS}> .\n\n"));
    out.push_str("nfl:Ontology a owl:Ontology .\n");
    for node in graph.nodes() {
        out.push_str(&individual(node));
    }
    for edge in graph.edges() {
        let predicate: &str = if edge.relationship.is_empty() {
            CONNECTED_TO
        } else {
            &edge.relationship
        };
        out.push_str(&format!(
            "{} {} {} .\n",
            turtle::nfl_term(&edge.source),
            turtle::nfl_term(predicate),
            turtle::nfl_term(&edge.target)
        ));
    }
    Ok(Payload::Text(out))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::turtle::{Term, NFL_NS, RDF_NS};
    use nfl_graph::Edge;

    fn sample() -> Graph {
        let mut graph = Graph::new();
        graph.upsert_node(Node::new("Brady").with_property("isa", "Player"));
        graph.upsert_node(Node::new("Patriots").with_label("New England"));
        graph.push_edge(Edge::new("Brady", "playsFor", "Patriots"));
        graph.push_edge(Edge::new("Patriots", "", "Brady"));
        graph
    }

    #[test]
    fn individuals_and_edges() {
        let text = serialize(&sample()).unwrap().render().unwrap();
        assert!(text.contains("@prefix owl: <http://www.w3.org/2002/07/owl#> ."));
        assert!(text.contains("nfl:Brady a owl:NamedIndividual ;\n    nfl:type \"Player\" .\n"));
        assert!(text.contains("    rdfs:label \"New England\" .\n"));
        assert!(text.contains("nfl:Brady nfl:playsFor nfl:Patriots .\n"));
        assert!(text.contains("nfl:Patriots nfl:connectedTo nfl:Brady .\n"));
    }

    #[test]
    fn output_is_readable_turtle() {
        let text = serialize(&sample()).unwrap().render().unwrap();
        let triples = turtle::read(&text).unwrap();
        assert_eq!(triples[0].subject, format!("{NFL_NS}Ontology"));
        assert_eq!(triples[0].predicate, format!("{RDF_NS}type"));
        assert_eq!(triples[0].object, Term::Iri(format!("{OWL_NS}Ontology")));
        assert_eq!(triples.len(), 8);
    }
}
