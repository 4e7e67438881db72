// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Adapters paired with the block dialect: typed nodes, named trait groups,
//! edge properties and pack metadata.

mod csv;
mod graphql;
mod jsonld;
mod owl;
mod pack;
mod sql;
mod turtle;
mod yaml;

pub use turtle::{reconstruct_with_report, Attribution, AttributionKind};

use crate::Adapter;

/// Serialize-only formats (`owl`, `sql`) come last.
pub(crate) const ADAPTERS: [Adapter; 9] = [
    jsonld::ADAPTER,
    csv::ADAPTER,
    yaml::ADAPTER,
    turtle::ADAPTER,
    Adapter {
        name: "rdf",
        ..turtle::ADAPTER
    },
    graphql::ADAPTER,
    pack::ADAPTER,
    owl::ADAPTER,
    sql::ADAPTER,
];
