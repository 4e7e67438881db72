// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Turtle with `nfl:` resources.
//!
//! Writing is straightforward. Reading has to guess which edge a property
//! triple belongs to, because edges are plain `s p o` statements with no
//! identity of their own. Triples on an `nfl:edge_<source>_<rel>_<target>`
//! subject join exactly. Anything else falls back to the most recently
//! defined edge that mentions the subject, and every such guess is reported.

use indexmap::IndexMap;
use nfl_graph::{Edge, Graph, Node};

use crate::turtle::{self, Term};
use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "turtle";
const EDGE_PREFIX: &str = "edge_";
const STATS_PREFIX: &str = "stats_";
const FLAT_KEYS: [&str; 3] = ["isa", "name", "description"];

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "Turtle",
    serialize,
    reconstruct: Some(reconstruct),
};

/// How a property triple was joined to an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributionKind {
    /// Subject named the edge resource directly.
    Exact,
    /// Several edges mention the subject; the most recent one was used.
    Ambiguous {
        /// Number of candidate edges.
        candidates: usize,
    },
    /// Exactly one edge mentions the subject.
    Unique,
    /// No edge mentions the subject; the triple was dropped.
    Unattributed,
}

/// One edge-property join performed while reading Turtle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    /// Triple subject (compacted).
    pub subject: String,
    /// Property key.
    pub property: String,
    /// Property value.
    pub value: String,
    /// `<source>_<rel>_<target>` of the edge that received the value.
    pub edge: Option<String>,
    /// Join quality.
    pub kind: AttributionKind,
}

fn statement(subject: &str, predicates: &[(String, String)]) -> String {
    let body: Vec<String> = predicates
        .iter()
        .map(|(p, o)| format!("{p} {o}"))
        .collect();
    format!("{subject} {} .\n", body.join(" ;\n    "))
}

fn node_statement(node: &Node) -> String {
    let mut predicates = vec![("rdf:type".to_owned(), turtle::nfl_term(node.node_type()))];
    if let Some(name) = node.properties.get("name") {
        predicates.push(("schema:name".into(), turtle::literal(name)));
    }
    if let Some(description) = node.properties.get("description") {
        predicates.push(("schema:description".into(), turtle::literal(description)));
    }
    if node.label != node.id {
        predicates.push(("rdfs:label".into(), turtle::literal(&node.label)));
    }
    let extra = node
        .properties
        .iter()
        .filter(|(k, _)| !FLAT_KEYS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .chain(node.traits.flattened());
    for (key, value) in extra {
        predicates.push((turtle::nfl_term(&key), turtle::literal(&value)));
    }
    statement(&turtle::nfl_term(&node.id), &predicates)
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let mut out = turtle::prefix_header();
    out.push('\n');
    for node in graph.nodes() {
        out.push_str(&node_statement(node));
    }
    for edge in graph.edges() {
        out.push_str(&format!(
            "{} {} {} .\n",
            turtle::nfl_term(&edge.source),
            turtle::nfl_term(&edge.relationship),
            turtle::nfl_term(&edge.target)
        ));
        if !edge.properties.is_empty() {
            let predicates: Vec<(String, String)> = edge
                .properties
                .iter()
                .map(|(k, v)| (turtle::nfl_term(k), turtle::literal(v)))
                .collect();
            let subject = turtle::nfl_term(&format!("{EDGE_PREFIX}{}", edge.key()));
            out.push_str(&statement(&subject, &predicates));
        }
    }
    Ok(Payload::Text(out))
}

struct TurtleReader {
    graph: Graph,
    edges: IndexMap<String, Edge>,
    report: Vec<Attribution>,
}

impl TurtleReader {
    fn attach(&mut self, subject: String, property: String, value: String) {
        let exact = subject
            .strip_prefix(EDGE_PREFIX)
            .filter(|key| self.edges.contains_key(*key))
            .map(str::to_owned);
        let (edge, kind) = if let Some(key) = exact {
            (Some(key), AttributionKind::Exact)
        } else {
            let candidates: Vec<&String> = self
                .edges
                .iter()
                .filter(|(key, e)| {
                    e.source == subject || e.target == subject || subject.contains(key.as_str())
                })
                .map(|(key, _)| key)
                .collect();
            match candidates.as_slice() {
                [] => (None, AttributionKind::Unattributed),
                [only] => (Some((*only).clone()), AttributionKind::Unique),
                [.., last] => (
                    Some((*last).clone()),
                    AttributionKind::Ambiguous {
                        candidates: candidates.len(),
                    },
                ),
            }
        };
        match (&kind, &edge) {
            (AttributionKind::Unattributed, _) => {
                tracing::warn!(%subject, %property, "no edge mentions subject; property dropped");
            }
            (AttributionKind::Ambiguous { candidates }, Some(key)) => {
                tracing::warn!(%subject, %property, edge = %key, candidates, "ambiguous edge property");
            }
            _ => {}
        }
        if let Some(target) = edge.as_ref().and_then(|key| self.edges.get_mut(key)) {
            target.properties.insert(property.clone(), value.clone());
        }
        self.report.push(Attribution {
            subject,
            property,
            value,
            edge,
            kind,
        });
    }

    fn triple(&mut self, subject: String, predicate: &str, object: Term) {
        let (value, is_iri) = match object {
            Term::Iri(iri) => (turtle::compact(&iri), true),
            Term::Literal(value) => (value, false),
        };
        if let Some(stat) = predicate.strip_prefix(STATS_PREFIX) {
            self.graph
                .node_or_insert(&subject)
                .traits
                .group_mut("stats")
                .insert(stat.to_owned(), value);
            return;
        }
        match predicate {
            "rdf:type" => {
                let node = self.graph.node_or_insert(&subject);
                if value != nfl_graph::DEFAULT_NODE_TYPE {
                    node.properties.insert("isa".into(), value);
                }
            }
            "schema:name" => {
                self.graph
                    .node_or_insert(&subject)
                    .properties
                    .insert("name".into(), value);
            }
            "schema:description" => {
                self.graph
                    .node_or_insert(&subject)
                    .properties
                    .insert("description".into(), value);
            }
            "rdfs:label" => self.graph.node_or_insert(&subject).label = value,
            _ if is_iri && !predicate.contains('_') && predicate != "since" => {
                let edge = Edge::new(subject, predicate, value);
                self.edges.insert(edge.key(), edge);
            }
            _ if !is_iri && !predicate.contains('_') && !subject.starts_with(EDGE_PREFIX) => {
                self.graph
                    .node_or_insert(&subject)
                    .properties
                    .insert(predicate.to_owned(), value);
            }
            _ => self.attach(subject, predicate.to_owned(), value),
        }
    }
}

/// Read Turtle into a graph, returning every edge-property join made on the
/// way. Non-exact joins are also logged at `warn`.
pub fn reconstruct_with_report(
    payload: &Payload,
) -> Result<(Graph, Vec<Attribution>), FormatError> {
    let mut reader = TurtleReader {
        graph: Graph::new(),
        edges: IndexMap::new(),
        report: Vec::new(),
    };
    for triple in turtle::read(payload.text(FORMAT)?)? {
        let subject = turtle::compact(&triple.subject);
        let predicate = turtle::compact(&triple.predicate);
        reader.triple(subject, &predicate, triple.object);
    }
    let TurtleReader {
        mut graph,
        edges,
        report,
    } = reader;
    for edge in edges.into_values() {
        graph.push_edge(edge);
    }
    Ok((graph, report))
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    reconstruct_with_report(payload).map(|(graph, _)| graph)
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
            .with_property("name", "Tom Brady")
            .with_property("position", "QB");
        brady
            .traits
            .group_mut("stats")
            .insert("touchdowns".into(), "649".into());
        graph.upsert_node(brady);
        graph.upsert_node(Node::new("Patriots").with_property("isa", "Team"));
        graph.push_edge(Edge::new("Brady", "playsFor", "Patriots").with_property("since", "2000"));
        graph
    }

    #[test]
    fn writes_typed_statements() {
        let Payload::Text(text) = serialize(&sample()).unwrap() else {
            panic!("expected text");
        };
        assert!(text.contains(
            "nfl:Brady rdf:type nfl:Player ;\n    schema:name \"Tom Brady\" ;\n    \
             nfl:position \"QB\" ;\n    nfl:stats_touchdowns \"649\" .\n"
        ));
        assert!(text.contains("nfl:Brady nfl:playsFor nfl:Patriots .\n"));
        assert!(text.contains("nfl:edge_Brady_playsFor_Patriots nfl:since \"2000\" .\n"));
    }

    #[test]
    fn own_output_reads_back_exactly() {
        let graph = sample();
        let (back, report) = reconstruct_with_report(&serialize(&graph).unwrap()).unwrap();
        assert_eq!(back, graph);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].kind, AttributionKind::Exact);
    }

    #[test]
    fn heuristic_join_is_reported() {
        let doc = "nfl:A nfl:knows nfl:B .\n\
                   nfl:A nfl:likes nfl:C .\n\
                   nfl:A nfl:met_at \"camp\" .\n\
                   nfl:Z nfl:seen_on \"tv\" .\n";
        let (graph, report) = reconstruct_with_report(&Payload::from(doc)).unwrap();
        assert_eq!(graph.edges().len(), 2);
        assert_eq!(
            graph.edges()[1].properties.get("met_at").map(String::as_str),
            Some("camp")
        );
        assert!(graph.edges()[0].properties.is_empty());
        assert_eq!(report[0].kind, AttributionKind::Ambiguous { candidates: 2 });
        assert_eq!(report[0].edge.as_deref(), Some("A_likes_C"));
        assert_eq!(report[1].kind, AttributionKind::Unattributed);
        assert_eq!(report[1].edge, None);
    }

    #[test]
    fn since_is_never_an_edge() {
        let (graph, _) =
            reconstruct_with_report(&Payload::from("nfl:A nfl:since nfl:B .")).unwrap();
        assert!(graph.edges().is_empty());
    }
}
