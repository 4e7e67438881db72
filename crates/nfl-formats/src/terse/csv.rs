// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Two-column `id,etikedo` table. Traits, state and edges are dropped.

use nfl_graph::{Graph, Node};

use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "csv";
const ID: &str = "id";
const LABEL: &str = "etikedo";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "CSV",
    serialize,
    reconstruct: Some(reconstruct),
};

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record([ID, LABEL])?;
    for node in graph.nodes() {
        writer.write_record([node.id.as_str(), node.label.as_str()])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| FormatError::Csv(err.into_error().into()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(Payload::Text(text.trim_end_matches('\n').to_owned()))
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let text = match payload {
        Payload::Tables { nodes, .. } => nodes.as_str(),
        other => other.text(FORMAT)?,
    };
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(FormatError::MissingColumn(name))
    };
    let (id_col, label_col) = (column(ID)?, column(LABEL)?);

    let mut graph = Graph::new();
    for record in reader.records() {
        let record = record?;
        let id = record.get(id_col).unwrap_or_default();
        if id.is_empty() {
            continue;
        }
        let label = record.get(label_col).filter(|l| !l.is_empty()).unwrap_or(id);
        graph.upsert_node(Node::new(id).with_label(label));
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn writes_header_and_rows_without_trailing_newline() {
        let mut graph = Graph::new();
        let mut alice = Node::new("Alice").with_label("Alice Smith");
        alice.traits.insert_loose("role", "lead");
        graph.upsert_node(alice);
        let payload = serialize(&graph).unwrap();
        assert_eq!(payload, Payload::from("id,etikedo\nAlice,Alice Smith"));
    }

    #[test]
    fn columns_are_found_by_name() {
        let graph = reconstruct(&Payload::from("etikedo,id\nBob Jones,Bob\n")).unwrap();
        assert_eq!(graph.node("Bob").unwrap().label, "Bob Jones");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut graph = Graph::new();
        graph.upsert_node(Node::new("a").with_label("Smith, Jr."));
        let payload = serialize(&graph).unwrap();
        assert_eq!(payload, Payload::from("id,etikedo\na,\"Smith, Jr.\""));
        assert_eq!(reconstruct(&payload).unwrap(), graph);
    }

    #[test]
    fn missing_column_is_an_error() {
        let err = reconstruct(&Payload::from("id,name\nA,B")).unwrap_err();
        assert!(matches!(err, FormatError::MissingColumn("etikedo")));
    }
}
