// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! One `schema:Thing` statement per node.

use nfl_graph::Graph;

use crate::turtle::{self, Term, RDF_NS, SCHEMA_NS};
use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "rdf";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "RDF",
    serialize,
    reconstruct: Some(reconstruct),
};

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let mut out = turtle::prefix_header();
    for node in graph.nodes() {
        out.push_str(&format!(
            "<{}> a schema:Thing ; schema:name {} .\n",
            node.id,
            turtle::literal(&node.label)
        ));
    }
    Ok(Payload::Text(out))
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let type_iri = format!("{RDF_NS}type");
    let name_iri = format!("{SCHEMA_NS}name");
    let mut graph = Graph::new();
    for triple in turtle::read(payload.text(FORMAT)?)? {
        let id = turtle::compact(&triple.subject);
        if triple.predicate == type_iri {
            graph.node_or_insert(&id);
        } else if triple.predicate == name_iri {
            if let Term::Literal(name) = triple.object {
                graph.node_or_insert(&id).label = name;
            }
        }
    }
    Ok(graph)
}
