// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node and edge tables. Trait groups flatten into `<trait>_<key>` columns;
//! only `stats_` columns are folded back into a trait on the way in.

use indexmap::IndexSet;
use nfl_graph::{Edge, Graph, Node, DEFAULT_RELATIONSHIP};

use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "csv";
const STATS_PREFIX: &str = "stats_";
const NODE_COLUMNS: [&str; 4] = ["id", "isa", "name", "description"];
const EDGE_COLUMNS: [&str; 3] = ["source", "relationship", "target"];

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "CSV",
    serialize,
    reconstruct: Some(reconstruct),
};

fn table(header: &IndexSet<String>, rows: &[Vec<String>]) -> Result<String, FormatError> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| FormatError::Csv(err.into_error().into()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn node_cells(node: &Node) -> Vec<(String, String)> {
    let mut cells: Vec<(String, String)> = node
        .properties
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if node.label != node.id {
        cells.push(("label".into(), node.label.clone()));
    }
    cells.extend(node.traits.flattened());
    cells
}

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let node_cells: Vec<(&Node, Vec<(String, String)>)> =
        graph.nodes().map(|n| (n, node_cells(n))).collect();
    let mut header: IndexSet<String> = NODE_COLUMNS.iter().map(|c| (*c).to_owned()).collect();
    header.extend(node_cells.iter().flat_map(|(_, c)| c.iter().map(|(k, _)| k.clone())));
    let rows: Vec<Vec<String>> = node_cells
        .iter()
        .map(|(node, cells)| {
            header
                .iter()
                .map(|column| match column.as_str() {
                    "id" => node.id.clone(),
                    column => cells
                        .iter()
                        .find(|(k, _)| k == column)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default(),
                })
                .collect()
        })
        .collect();
    let nodes = table(&header, &rows)?;

    let mut header: IndexSet<String> = EDGE_COLUMNS.iter().map(|c| (*c).to_owned()).collect();
    header.extend(graph.edges().iter().flat_map(|e| e.properties.keys().cloned()));
    let rows: Vec<Vec<String>> = graph
        .edges()
        .iter()
        .map(|edge| {
            header
                .iter()
                .map(|column| match column.as_str() {
                    "source" => edge.source.clone(),
                    "relationship" => edge.relationship.clone(),
                    "target" => edge.target.clone(),
                    key => edge.properties.get(key).cloned().unwrap_or_default(),
                })
                .collect()
        })
        .collect();
    let edges = table(&header, &rows)?;
    Ok(Payload::Tables { nodes, edges })
}

/// Header-keyed rows; an empty table yields no rows.
fn read_rows(text: &str) -> Result<Vec<Vec<(String, String)>>, FormatError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .filter(|(_, v)| !v.is_empty())
                .map(|(h, v)| (h.to_owned(), v.to_owned()))
                .collect(),
        );
    }
    Ok(rows)
}

fn require_column(text: &str, column: &'static str) -> Result<(), FormatError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(text.as_bytes());
    if reader.headers()?.iter().any(|h| h == column) {
        Ok(())
    } else {
        Err(FormatError::MissingColumn(column))
    }
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let (nodes, edges) = match payload {
        Payload::Tables { nodes, edges } => (nodes.as_str(), edges.as_str()),
        other => (other.text(FORMAT)?, ""),
    };
    require_column(nodes, "id")?;
    for column in ["source", "target"] {
        require_column(edges, column)?;
    }

    let mut graph = Graph::new();
    for row in read_rows(nodes)? {
        let Some(id) = row.iter().find(|(k, _)| k == "id").map(|(_, v)| v.as_str()) else {
            continue;
        };
        let mut node = Node::new(id);
        for (key, value) in &row {
            if key == "id" {
                continue;
            }
            if key == "label" {
                node.label.clone_from(value);
            } else if let Some(stat) = key.strip_prefix(STATS_PREFIX) {
                node.traits
                    .group_mut("stats")
                    .insert(stat.to_owned(), value.clone());
            } else {
                node.properties.insert(key.clone(), value.clone());
            }
        }
        graph.upsert_node(node);
    }
    for row in read_rows(edges)? {
        let field = |name: &str| {
            row.iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .unwrap_or_default()
        };
        let relationship = Some(field("relationship"))
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_RELATIONSHIP.to_owned());
        let mut edge = Edge::new(field("source"), relationship, field("target"));
        for (key, value) in &row {
            if !EDGE_COLUMNS.contains(&key.as_str()) {
                edge.properties.insert(key.clone(), value.clone());
            }
        }
        graph.push_edge(edge);
    }
    Ok(graph)
}
