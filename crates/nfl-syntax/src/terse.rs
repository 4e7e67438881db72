// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Terse dialect: `node:<id>|k:v`, `trait:<id>|k:v`, `edge:<a> -> <b>|k:v`.

use nfl_graph::{Edge, Graph, Node};

use crate::props::{parse_props, take_alias};
use crate::{content_lines, Diagnostics, SkipReason};

/// Keys naming the display label; removed from the trait bag.
pub(crate) const LABEL_ALIASES: [&str; 2] = ["etikedo", "label"];
/// Keys naming the relationship; removed from the edge bag.
pub(crate) const RELATIONSHIP_ALIASES: [&str; 3] = ["rilato", "relationship", "rel"];

pub(crate) fn parse(text: &str, diag: &mut Diagnostics) -> Graph {
    let mut graph = Graph::new();
    for (line_no, raw) in content_lines(text) {
        let line = raw.trim();
        let (head, clauses) = match line.split_once('|') {
            Some((head, rest)) => (head, rest),
            None => (line, ""),
        };

        if let Some(id) = ["node:", "fn:", "pack:"]
            .iter()
            .find_map(|prefix| head.strip_prefix(prefix))
        {
            let id = id.trim();
            if id.is_empty() {
                diag.skip(line_no, raw, SkipReason::MissingId);
                continue;
            }
            let mut props = parse_props(clauses);
            let label = take_alias(&mut props, &LABEL_ALIASES).unwrap_or_else(|| id.to_owned());
            let mut node = Node::new(id).with_label(label);
            node.traits.loose = props;
            graph.upsert_node(node);
        } else if let Some(id) = head.strip_prefix("trait:") {
            let id = id.trim();
            if id.is_empty() {
                diag.skip(line_no, raw, SkipReason::MissingId);
                continue;
            }
            graph
                .node_or_insert(id)
                .traits
                .loose
                .extend(parse_props(clauses));
        } else if let Some(rest) = head.strip_prefix("edge:") {
            let Some((source, target)) = endpoints(rest) else {
                diag.skip(line_no, raw, SkipReason::MalformedEdge);
                continue;
            };
            let mut props = parse_props(clauses);
            let relationship = take_alias(&mut props, &RELATIONSHIP_ALIASES).unwrap_or_default();
            let mut edge = Edge::new(source, relationship, target);
            edge.properties = props;
            graph.push_edge(edge);
        } else {
            diag.skip(line_no, raw, SkipReason::Unrecognized);
        }
    }
    graph
}

/// `<a> -> <b>`; both sides must be single non-empty tokens.
fn endpoints(rest: &str) -> Option<(&str, &str)> {
    let (source, target) = rest.split_once("->")?;
    let source = source.trim();
    let target = target.trim();
    let token = |s: &str| !s.is_empty() && !s.contains(char::is_whitespace);
    (token(source) && token(target)).then_some((source, target))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::{parse, parse_with_diagnostics, Dialect, SkipReason};

    #[test]
    fn node_with_label_alias_and_traits() {
        let g = parse(r#"node:Alice|etikedo:"Alice Smith"|role:"lead""#, Dialect::Terse);
        let alice = g.node("Alice").unwrap();
        assert_eq!(alice.label, "Alice Smith");
        assert_eq!(alice.traits.loose.get("role").map(String::as_str), Some("lead"));
        assert!(!alice.traits.loose.contains_key("etikedo"));
        assert!(alice.properties.is_empty());
    }

    #[test]
    fn edge_with_relationship_alias() {
        let g = parse(r#"edge:Alice -> Bob|rilato:"knows""#, Dialect::Terse);
        let edge = &g.edges()[0];
        assert_eq!((edge.source.as_str(), edge.target.as_str()), ("Alice", "Bob"));
        assert_eq!(edge.relationship, "knows");
        assert!(edge.properties.is_empty());
    }

    #[test]
    fn edge_without_relationship_is_empty() {
        let g = parse("edge:a->b|weight:3", Dialect::Terse);
        assert_eq!(g.edges()[0].relationship, "");
        assert_eq!(g.edges()[0].properties.get("weight").map(String::as_str), Some("3"));
    }

    #[test]
    fn spaced_pipes_are_accepted() {
        let g = parse(
            "node:Alice | etikedo:\"Alice\"\nedge:Alice -> Bob | rilato:\"knows\"",
            Dialect::Terse,
        );
        assert_eq!(g.node("Alice").unwrap().label, "Alice");
        assert_eq!(g.edges()[0].target, "Bob");
        assert_eq!(g.edges()[0].relationship, "knows");
    }

    #[test]
    fn fn_and_pack_are_node_synonyms() {
        let g = parse("fn:f|label:F\npack:p", Dialect::Terse);
        assert_eq!(g.node("f").unwrap().label, "F");
        assert_eq!(g.node("p").unwrap().label, "p");
        assert!(g.pack.is_none());
    }

    #[test]
    fn trait_lines_merge_into_new_or_existing_node() {
        let g = parse(
            "trait:ghost|hp:3\nnode:n|a:1\ntrait:n|b:2|a:9",
            Dialect::Terse,
        );
        assert_eq!(g.node("ghost").unwrap().label, "ghost");
        let n = g.node("n").unwrap();
        let pairs: Vec<_> = n
            .traits
            .loose
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, [("a", "9"), ("b", "2")]);
    }

    #[test]
    fn redeclaration_replaces_node() {
        let g = parse("node:a|x:1\nnode:b\nnode:a|y:2", Dialect::Terse);
        let ids: Vec<_> = g.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        let a = g.node("a").unwrap();
        assert!(!a.traits.loose.contains_key("x"));
        assert!(a.traits.loose.contains_key("y"));
    }

    #[test]
    fn malformed_lines_are_reported_not_fatal() {
        let parsed = parse_with_diagnostics(
            "node:\nedge:a b\nedge:a -> b c\nwhat is this\nnode:ok",
            Dialect::Terse,
        );
        assert_eq!(parsed.graph.node_count(), 1);
        let reasons: Vec<_> = parsed.skipped.iter().map(|s| (s.line_no, s.reason)).collect();
        assert_eq!(
            reasons,
            [
                (1, SkipReason::MissingId),
                (2, SkipReason::MalformedEdge),
                (3, SkipReason::MalformedEdge),
                (4, SkipReason::Unrecognized),
            ]
        );
    }
}
