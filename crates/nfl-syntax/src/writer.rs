// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical NFL emission for both dialects.
//!
//! The terse dialect has no pack header, no flat-property bag and no named
//! trait groups: flat properties and `<group>_<key>` pairs are written as
//! trait clauses. The block dialect has no loose traits: loose pairs are
//! written as flat properties. Node `state` is not expressible in NFL.

use std::fmt;

use nfl_graph::{Graph, Node, DEFAULT_RELATIONSHIP};

use crate::block::LABEL_KEY;
use crate::props::{quote, quote_if_needed, quote_token};
use crate::terse::{LABEL_ALIASES, RELATIONSHIP_ALIASES};
use crate::Dialect;

/// Emit `graph` as NFL source text in `dialect`.
pub fn write(graph: &Graph, dialect: Dialect) -> String {
    Source { graph, dialect }.to_string()
}

struct Source<'g> {
    graph: &'g Graph,
    dialect: Dialect,
}

impl fmt::Display for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dialect {
            Dialect::Terse => write_terse(f, self.graph),
            Dialect::Block => write_block(f, self.graph),
        }
    }
}

fn write_terse(f: &mut fmt::Formatter<'_>, graph: &Graph) -> fmt::Result {
    let mut sep = "";
    for node in graph.nodes() {
        write!(f, "{sep}node:{} | {}:{}", node.id, LABEL_ALIASES[0], quote(&node.label))?;
        let clauses = node
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .chain(node.traits.flattened());
        for (k, v) in clauses {
            write!(f, " | {k}:{}", quote(&v))?;
        }
        sep = "\n";
    }
    for edge in graph.edges() {
        write!(f, "{sep}edge:{} -> {}", edge.source, edge.target)?;
        if !edge.relationship.is_empty() {
            write!(f, " | {}:{}", RELATIONSHIP_ALIASES[0], quote(&edge.relationship))?;
        }
        for (k, v) in &edge.properties {
            write!(f, " | {k}:{}", quote(v))?;
        }
        sep = "\n";
    }
    Ok(())
}

fn write_node_block(f: &mut fmt::Formatter<'_>, node: &Node) -> fmt::Result {
    writeln!(f, "node: {}", quote_token(&node.id))?;
    if node.label != node.id {
        writeln!(f, "  | {LABEL_KEY}: {}", quote(&node.label))?;
    }
    for (k, v) in node.properties.iter().chain(&node.traits.loose) {
        writeln!(f, "  | {k}: {}", quote(v))?;
    }
    for (name, props) in &node.traits.groups {
        writeln!(f, "  | trait.{name}")?;
        for (k, v) in props {
            writeln!(f, "    | {k}: {}", quote_if_needed(v))?;
        }
    }
    writeln!(f)
}

fn write_block(f: &mut fmt::Formatter<'_>, graph: &Graph) -> fmt::Result {
    if let Some(pack) = &graph.pack {
        writeln!(f, "pack: {}", quote_token(&pack.name))?;
        if let Some(title) = &pack.title {
            writeln!(f, "  | title: {}", quote(title))?;
        }
        if let Some(version) = &pack.version {
            writeln!(f, "  | version: {}", quote(version))?;
        }
        writeln!(f)?;
    }
    for node in graph.nodes() {
        write_node_block(f, node)?;
    }
    for edge in graph.edges() {
        let (source, target) = (quote_token(&edge.source), quote_token(&edge.target));
        if edge.relationship == DEFAULT_RELATIONSHIP {
            writeln!(f, "edge: {source} -> {target}")?;
        } else {
            let relationship = quote_token(&edge.relationship);
            writeln!(f, "edge: {source} -> {relationship} -> {target}")?;
        }
        for (k, v) in &edge.properties {
            writeln!(f, "  | {k}: {}", quote(v))?;
        }
        writeln!(f)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use nfl_graph::{Edge, Pack};

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.pack = Some(Pack {
            name: "demo".into(),
            title: Some("Demo".into()),
            version: None,
        });
        let mut qb = Node::new("qb").with_property("isa", "Player");
        qb.traits.group_mut("stats").insert("touchdowns".into(), "3".into());
        g.upsert_node(qb);
        g.upsert_node(Node::new("wr").with_label("Receiver"));
        g.push_edge(Edge::new("qb", "throwsTo", "wr").with_property("since", "2020"));
        g
    }

    #[test]
    fn block_output_shape() {
        let text = write(&sample(), Dialect::Block);
        assert_eq!(
            text,
            "pack: demo\n  | title: \"Demo\"\n\n\
             node: qb\n  | isa: \"Player\"\n  | trait.stats\n    | touchdowns: 3\n\n\
             node: wr\n  | label: \"Receiver\"\n\n\
             edge: qb -> throwsTo -> wr\n  | since: \"2020\"\n\n"
        );
    }

    #[test]
    fn block_output_reparses_identically() {
        let g = sample();
        assert_eq!(parse(&write(&g, Dialect::Block), Dialect::Block), g);
    }

    #[test]
    fn terse_output_shape() {
        let mut g = Graph::new();
        let mut alice = Node::new("Alice").with_label("Alice Smith");
        alice.traits.insert_loose("role", "lead");
        g.upsert_node(alice);
        g.push_edge(Edge::new("Alice", "knows", "Bob"));
        g.push_edge(Edge::new("Bob", "", "Alice"));

        assert_eq!(
            write(&g, Dialect::Terse),
            "node:Alice | etikedo:\"Alice Smith\" | role:\"lead\"\n\
             edge:Alice -> Bob | rilato:\"knows\"\n\
             edge:Bob -> Alice"
        );
    }

    #[test]
    fn block_quotes_spaced_ids() {
        let mut g = Graph::new();
        g.pack = Some(Pack::named("Gridiron Greats"));
        g.upsert_node(Node::new("Tom Brady").with_property("isa", "Player"));
        g.push_edge(Edge::new("Tom Brady", "plays for", "New England"));
        let text = write(&g, Dialect::Block);
        assert!(text.starts_with("pack: \"Gridiron Greats\"\n"));
        assert!(text.contains("node: \"Tom Brady\"\n"));
        assert!(text.contains("edge: \"Tom Brady\" -> \"plays for\" -> \"New England\"\n"));
        assert_eq!(parse(&text, Dialect::Block), g);
    }

    #[test]
    fn block_keeps_non_default_relationships() {
        let mut g = Graph::new();
        g.push_edge(Edge::new("a", "", "b"));
        g.push_edge(Edge::new("b", DEFAULT_RELATIONSHIP, "c"));
        let text = write(&g, Dialect::Block);
        assert_eq!(text, "edge: a -> \"\" -> b\n\nedge: b -> c\n\n");
        assert_eq!(parse(&text, Dialect::Block), g);
    }

    #[test]
    fn terse_flattens_groups() {
        let text = write(&sample(), Dialect::Terse);
        assert!(text.starts_with(
            "node:qb | etikedo:\"qb\" | isa:\"Player\" | stats_touchdowns:\"3\""
        ));
    }
}
