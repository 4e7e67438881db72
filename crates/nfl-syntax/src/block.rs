// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Block dialect: headers at column 0, indented `| key: value` lines below.
//!
//! ```text
//! pack: football
//!   | title: "Football"
//! node: qb
//!   | isa: "Player"
//!   | trait.stats
//!     | touchdowns: 3
//! edge: qb -> throwsTo -> wr
//!   | since: "2020"
//! ```
//!
//! Ids, pack names and relationships holding spaces are double-quoted.

use nfl_graph::{Edge, Graph, Node, Pack, PropertyMap, DEFAULT_RELATIONSHIP};

use crate::props::parse_clause;
use crate::{content_lines, Diagnostics, SkipReason};

/// Node property that sets the display label instead of being stored.
pub(crate) const LABEL_KEY: &str = "label";

enum Cursor {
    Idle,
    Pack,
    Node(String),
    Edge,
}

struct OpenTrait {
    name: String,
    indent: usize,
}

struct BlockParser<'d> {
    graph: Graph,
    cursor: Cursor,
    open_trait: Option<OpenTrait>,
    diag: &'d mut Diagnostics,
}

pub(crate) fn parse(text: &str, diag: &mut Diagnostics) -> Graph {
    let mut parser = BlockParser {
        graph: Graph::new(),
        cursor: Cursor::Idle,
        open_trait: None,
        diag,
    };
    for (line_no, raw) in content_lines(text) {
        let indent = raw.len() - raw.trim_start().len();
        if indent == 0 {
            parser.header(line_no, raw.trim());
        } else {
            parser.indented(line_no, raw, indent);
        }
    }
    parser.graph
}

/// `"quoted id"` up to its closing quote, else the first bare token.
fn header_id(rest: &str) -> Option<&str> {
    let rest = rest.trim();
    if let Some(quoted) = rest.strip_prefix('"') {
        let (id, _) = quoted.split_once('"')?;
        return Some(id).filter(|id| !id.is_empty());
    }
    rest.split_whitespace().next()
}

impl BlockParser<'_> {
    fn header(&mut self, line_no: usize, line: &str) {
        self.open_trait = None;
        if let Some(rest) = line.strip_prefix("pack:") {
            let Some(name) = header_id(rest) else {
                self.diag.skip(line_no, line, SkipReason::MissingId);
                return;
            };
            self.graph.pack = Some(Pack::named(name));
            self.cursor = Cursor::Pack;
        } else if let Some(rest) = line.strip_prefix("node:") {
            let Some(id) = header_id(rest) else {
                self.diag.skip(line_no, line, SkipReason::MissingId);
                self.cursor = Cursor::Idle;
                return;
            };
            self.graph.upsert_node(Node::new(id));
            self.cursor = Cursor::Node(id.to_owned());
        } else if let Some(rest) = line.strip_prefix("edge:") {
            match edge_parts(rest) {
                Some((source, relationship, target)) => {
                    self.graph.push_edge(Edge::new(source, relationship, target));
                    self.cursor = Cursor::Edge;
                }
                None => {
                    self.diag.skip(line_no, line, SkipReason::MalformedEdge);
                    self.cursor = Cursor::Idle;
                }
            }
        } else {
            self.diag.skip(line_no, line, SkipReason::Unrecognized);
        }
    }

    fn indented(&mut self, line_no: usize, raw: &str, indent: usize) {
        let Some(body) = raw.trim().strip_prefix('|') else {
            self.diag.skip(line_no, raw, SkipReason::Unrecognized);
            return;
        };
        let body = body.trim();

        if let Some(rest) = body.strip_prefix("trait.") {
            let name: String = rest
                .chars()
                .take_while(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            let node = match &self.cursor {
                Cursor::Node(id) => self.graph.node_mut(id),
                _ => None,
            };
            match node {
                Some(node) if !name.is_empty() => {
                    node.traits.groups.insert(name.clone(), PropertyMap::new());
                    self.open_trait = Some(OpenTrait { name, indent });
                }
                Some(_) => self.diag.skip(line_no, raw, SkipReason::MissingId),
                None => self.diag.skip(line_no, raw, SkipReason::NoContext),
            }
            return;
        }

        let Some((key, value)) = parse_clause(body) else {
            self.diag.skip(line_no, raw, SkipReason::MalformedProperty);
            return;
        };

        match &self.cursor {
            Cursor::Pack => {
                let Some(pack) = self.graph.pack.as_mut() else {
                    return;
                };
                match key.as_str() {
                    "title" => pack.title = Some(value),
                    "version" => pack.version = Some(value),
                    _ => self.diag.skip(line_no, raw, SkipReason::Unrecognized),
                }
            }
            Cursor::Node(id) => {
                let Some(node) = self.graph.node_mut(id) else {
                    return;
                };
                let in_trait = self
                    .open_trait
                    .as_ref()
                    .filter(|open| indent > open.indent)
                    .map(|open| open.name.clone());
                if let Some(name) = in_trait {
                    node.traits.group_mut(&name).insert(key, value);
                    return;
                }
                self.open_trait = None;
                if key == LABEL_KEY {
                    node.label = value;
                } else {
                    node.properties.insert(key, value);
                }
            }
            Cursor::Edge => {
                if let Some(edge) = self.graph.last_edge_mut() {
                    edge.properties.insert(key, value);
                }
            }
            Cursor::Idle => self.diag.skip(line_no, raw, SkipReason::NoContext),
        }
    }
}

/// One `->`-separated edge part: a bare token or a quoted string.
fn edge_part(part: &str) -> Option<&str> {
    let part = part.trim();
    match part.strip_prefix('"').and_then(|q| q.strip_suffix('"')) {
        Some(quoted) => Some(quoted),
        None if part.is_empty() || part.contains(char::is_whitespace) => None,
        None => Some(part),
    }
}

/// `<a> -> <b>` or `<a> -> <rel> -> <b>`; endpoints must be non-empty.
fn edge_parts(rest: &str) -> Option<(&str, &str, &str)> {
    let parts = rest.split("->").map(edge_part).collect::<Option<Vec<_>>>()?;
    let (source, relationship, target) = match parts.as_slice() {
        [source, target] => (*source, DEFAULT_RELATIONSHIP, *target),
        [source, relationship, target] => (*source, *relationship, *target),
        _ => return None,
    };
    (!source.is_empty() && !target.is_empty()).then_some((source, relationship, target))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::{parse, parse_with_diagnostics, Dialect, SkipReason};

    const SAMPLE: &str = "\
# football pack
pack: football
  | title: \"Football Demo\"
  | version: \"2025-07-04\"

node: qb
  | isa: \"Player\"
  | name: \"Quarterback\"
  | trait.stats
    | touchdowns: 3
    | yards: \"120\"
  | description: \"Throws\"

node: wr
  | isa: \"Player\"

edge: qb -> throwsTo -> wr
  | since: \"2020\"
edge: wr -> qb
";

    #[test]
    fn pack_metadata() {
        let g = parse(SAMPLE, Dialect::Block);
        let pack = g.pack.as_ref().unwrap();
        assert_eq!(pack.name, "football");
        assert_eq!(pack.title.as_deref(), Some("Football Demo"));
        assert_eq!(pack.version.as_deref(), Some("2025-07-04"));
    }

    #[test]
    fn node_properties_and_trait_groups() {
        let g = parse(SAMPLE, Dialect::Block);
        let qb = g.node("qb").unwrap();
        assert_eq!(qb.label, "qb");
        let props: Vec<_> = qb.properties.keys().map(String::as_str).collect();
        assert_eq!(props, ["isa", "name", "description"]);

        let stats = qb.traits.group("stats").unwrap();
        let pairs: Vec<_> = stats.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, [("touchdowns", "3"), ("yards", "120")]);
        assert!(qb.traits.loose.is_empty());
    }

    #[test]
    fn edges_with_and_without_relationship() {
        let g = parse(SAMPLE, Dialect::Block);
        let edges = g.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].relationship, "throwsTo");
        assert_eq!(edges[0].properties.get("since").map(String::as_str), Some("2020"));
        assert_eq!(edges[1].relationship, "relatedTo");
        assert_eq!(edges[1].source, "wr");
    }

    #[test]
    fn label_property_sets_display_label() {
        let g = parse("node: a\n  | label: \"Alpha\"\n  | x: 1", Dialect::Block);
        let a = g.node("a").unwrap();
        assert_eq!(a.label, "Alpha");
        assert!(!a.properties.contains_key("label"));
    }

    #[test]
    fn reopening_a_trait_clears_it() {
        let g = parse(
            "node: a\n  | trait.t\n    | x: 1\n  | trait.t\n    | y: 2",
            Dialect::Block,
        );
        let t = g.node("a").unwrap().traits.group("t").unwrap();
        assert!(!t.contains_key("x"));
        assert!(t.contains_key("y"));
    }

    #[test]
    fn orphan_lines_are_dropped() {
        let parsed = parse_with_diagnostics(
            "  | stray: 1\n  | trait.none\nedge: a\nnode:\nnode: ok\n  nope",
            Dialect::Block,
        );
        assert_eq!(parsed.graph.node_count(), 1);
        let reasons: Vec<_> = parsed.skipped.iter().map(|s| s.reason).collect();
        assert_eq!(
            reasons,
            [
                SkipReason::NoContext,
                SkipReason::NoContext,
                SkipReason::MalformedEdge,
                SkipReason::MissingId,
                SkipReason::Unrecognized,
            ]
        );
    }

    #[test]
    fn quoted_headers_keep_spaces() {
        let g = parse(
            "pack: \"Gridiron Greats\"\nnode: \"Tom Brady\"\n  | isa: \"Player\"\n\
             edge: \"Tom Brady\" -> \"\" -> Patriots",
            Dialect::Block,
        );
        assert_eq!(g.pack.as_ref().unwrap().name, "Gridiron Greats");
        assert_eq!(g.node("Tom Brady").unwrap().node_type(), "Player");
        assert_eq!(g.edges()[0].source, "Tom Brady");
        assert_eq!(g.edges()[0].relationship, "");
    }

    #[test]
    fn unquoted_spaced_edge_parts_are_malformed() {
        let parsed = parse_with_diagnostics(
            "edge: Tom Brady -> Patriots\nedge: \"\" -> b",
            Dialect::Block,
        );
        assert!(parsed.graph.edges().is_empty());
        assert_eq!(parsed.skipped.len(), 2);
    }

    #[test]
    fn duplicate_edges_are_kept() {
        let g = parse("edge: a -> r -> b\nedge: a -> r -> b", Dialect::Block);
        assert_eq!(g.edges().len(), 2);
    }
}
