// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `nfl` itself as a registry entry.

use nfl_graph::Graph;
use nfl_syntax::{parse, write, Dialect};

use crate::{Adapter, FormatError, Payload};

/// Registry key for NFL text.
pub const NFL_FORMAT: &str = "nfl";

fn write_terse(graph: &Graph) -> Result<Payload, FormatError> {
    Ok(Payload::Text(write(graph, Dialect::Terse)))
}

fn write_block(graph: &Graph) -> Result<Payload, FormatError> {
    Ok(Payload::Text(write(graph, Dialect::Block)))
}

fn parse_terse(payload: &Payload) -> Result<Graph, FormatError> {
    Ok(parse(payload.text(NFL_FORMAT)?, Dialect::Terse))
}

fn parse_block(payload: &Payload) -> Result<Graph, FormatError> {
    Ok(parse(payload.text(NFL_FORMAT)?, Dialect::Block))
}

pub(crate) fn adapter(dialect: Dialect) -> Adapter {
    let (serialize, reconstruct): (crate::SerializeFn, crate::ReconstructFn) = match dialect {
        Dialect::Terse => (write_terse, parse_terse),
        Dialect::Block => (write_block, parse_block),
    };
    Adapter {
        name: NFL_FORMAT,
        title: "NFL",
        serialize,
        reconstruct: Some(reconstruct),
    }
}
