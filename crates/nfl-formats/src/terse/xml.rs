// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `<things>` document with one `<thing id>` element per node.

use nfl_graph::{Graph, Node};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Adapter, FormatError, Payload};

const FORMAT: &str = "xml";

pub(super) const ADAPTER: Adapter = Adapter {
    name: FORMAT,
    title: "XML",
    serialize,
    reconstruct: Some(reconstruct),
};

fn serialize(graph: &Graph) -> Result<Payload, FormatError> {
    let mut out = String::from("<things>\n");
    for node in graph.nodes() {
        out.push_str(&format!(
            "  <thing id=\"{}\"><name>{}</name></thing>\n",
            escape(node.id.as_str()),
            escape(node.label.as_str())
        ));
    }
    out.push_str("</things>\n");
    Ok(Payload::Text(out))
}

fn thing_id(start: &BytesStart<'_>) -> Result<String, FormatError> {
    let attr = start
        .try_get_attribute("id")
        .map_err(quick_xml::Error::from)?
        .ok_or(FormatError::MissingField {
            format: FORMAT,
            field: "id",
        })?;
    let raw = String::from_utf8_lossy(&attr.value);
    Ok(unescape(&raw).map_err(quick_xml::Error::from)?.into_owned())
}

fn reconstruct(payload: &Payload) -> Result<Graph, FormatError> {
    let mut reader = Reader::from_str(payload.text(FORMAT)?);
    reader.config_mut().trim_text_start = true;
    reader.config_mut().trim_text_end = true;

    let mut graph = Graph::new();
    let mut current: Option<Node> = None;
    let mut in_name = false;
    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"thing" => {
                current = Some(Node::new(thing_id(&e)?));
            }
            Event::Empty(e) if e.name().as_ref() == b"thing" => {
                graph.upsert_node(Node::new(thing_id(&e)?));
            }
            Event::Start(e) if e.name().as_ref() == b"name" => in_name = current.is_some(),
            Event::Text(text) if in_name => {
                let label = text.unescape()?;
                if let Some(node) = current.as_mut().filter(|_| !label.is_empty()) {
                    node.label = label.into_owned();
                }
            }
            Event::End(e) if e.name().as_ref() == b"name" => in_name = false,
            Event::End(e) if e.name().as_ref() == b"thing" => {
                if let Some(node) = current.take() {
                    graph.upsert_node(node);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(graph)
}
