// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Adapters paired with the terse pipe dialect.
//!
//! These are the light-weight shapes: node ids, labels, loose traits and
//! state. Edges only survive through JSON-LD.

mod csv;
mod geojson;
mod jsonld;
mod rdf;
mod xml;
mod yaml;

use crate::Adapter;

pub(crate) const ADAPTERS: [Adapter; 6] = [
    jsonld::ADAPTER,
    csv::ADAPTER,
    yaml::ADAPTER,
    geojson::ADAPTER,
    xml::ADAPTER,
    rdf::ADAPTER,
];
