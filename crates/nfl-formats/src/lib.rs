// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Format adapters between the NFL graph model and external formats.
//!
//! Every format is a `(serialize, reconstruct)` pair in a per-dialect
//! [`Registry`]. The terse registry carries the light shapes (JSON-LD, CSV,
//! YAML, GeoJSON, XML, RDF); the block registry carries the typed ones
//! (JSON-LD, CSV tables, YAML, Turtle, GraphQL, example pack) plus the
//! serialize-only OWL and SQL exports. Reconstruction always goes through a
//! [`Graph`] and comes back out as NFL text.
//!
//! Quick start:
//! ```
//! use nfl_formats::{convert_from_nfl, convert_to_nfl, Payload};
//!
//! let csv = convert_from_nfl("node:Alice|etikedo:\"Alice Smith\"", "csv").unwrap();
//! assert_eq!(csv, Payload::from("id,etikedo\nAlice,Alice Smith"));
//! let nfl = convert_to_nfl(&csv, "csv").unwrap();
//! assert_eq!(nfl, "node:Alice | etikedo:\"Alice Smith\"");
//! ```

mod block;
mod error;
mod nfl;
mod payload;
mod registry;
mod terse;
pub mod turtle;

pub use block::{reconstruct_with_report, Attribution, AttributionKind};
pub use error::FormatError;
pub use nfl::NFL_FORMAT;
pub use payload::{NflSource, Payload};
pub use registry::{Adapter, ReconstructFn, Registry, SerializeFn};

use nfl_graph::{Graph, GraphStore, Pack};
use nfl_syntax::{parse, write, Dialect};

/// Pack stamped onto graphs reconstructed by the block dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Pack name for converted output.
    pub pack_name: String,
    /// Pack version for converted output.
    pub pack_version: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pack_name: "Converted_Pack".into(),
            pack_version: "2025-07-04".into(),
        }
    }
}

/// Conversion entry point bound to one dialect.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    dialect: Dialect,
    options: ConvertOptions,
}

impl Converter {
    /// Converter with default pack options.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            options: ConvertOptions::default(),
        }
    }

    /// Replace the pack options.
    #[must_use]
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Dialect used for parsing and writing NFL.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Registry for this converter's dialect.
    pub fn registry(&self) -> &'static Registry {
        Registry::for_dialect(self.dialect)
    }

    /// NFL text or graph -> target content.
    pub fn from_nfl<'a>(
        &self,
        source: impl Into<NflSource<'a>>,
        format: &str,
    ) -> Result<Payload, FormatError> {
        let adapter = self.registry().resolve(format)?;
        let payload = match source.into() {
            NflSource::Text(text) => adapter.serialize(&parse(text, self.dialect))?,
            NflSource::Graph(graph) => adapter.serialize(graph)?,
        };
        tracing::debug!(format, dialect = %self.dialect, "serialized graph");
        Ok(payload)
    }

    /// Target content -> graph.
    ///
    /// In the block dialect a graph with no pack of its own is stamped with
    /// `Converted from <format title>` and the configured name and version.
    pub fn to_graph(&self, payload: &Payload, format: &str) -> Result<Graph, FormatError> {
        let adapter = self.registry().resolve(format)?;
        let mut graph = adapter.reconstruct(payload)?;
        if adapter.name != NFL_FORMAT {
            self.stamp(&mut graph, adapter.title);
        }
        tracing::debug!(
            format,
            nodes = graph.node_count(),
            edges = graph.edges().len(),
            "reconstructed graph"
        );
        Ok(graph)
    }

    /// Target content -> NFL text. `nfl` input is returned unchanged.
    pub fn to_nfl(&self, payload: &Payload, format: &str) -> Result<String, FormatError> {
        let adapter = self.registry().resolve(format)?;
        if adapter.name == NFL_FORMAT {
            return Ok(payload.text(NFL_FORMAT)?.to_owned());
        }
        Ok(write(&self.to_graph(payload, format)?, self.dialect))
    }

    /// Parse NFL (or take a graph) and upsert it into `store`.
    pub fn ingest_into<'a>(
        &self,
        source: impl Into<NflSource<'a>>,
        store: &mut dyn GraphStore,
    ) -> Result<(), FormatError> {
        match source.into() {
            NflSource::Text(text) => store.ingest(&parse(text, self.dialect))?,
            NflSource::Graph(graph) => store.ingest(graph)?,
        }
        tracing::info!(store = store.label(), "ingested graph");
        Ok(())
    }

    /// Read the whole graph held by `store` and write it as NFL.
    pub fn export_store(&self, store: &dyn GraphStore) -> Result<String, FormatError> {
        let mut graph = store.extract()?;
        self.stamp(&mut graph, store.label());
        Ok(write(&graph, self.dialect))
    }

    fn stamp(&self, graph: &mut Graph, title: &str) {
        if self.dialect != Dialect::Block || graph.pack.is_some() {
            return;
        }
        graph.pack = Some(Pack {
            name: self.options.pack_name.clone(),
            title: Some(format!("Converted from {title}")),
            version: Some(self.options.pack_version.clone()),
        });
    }
}

/// Terse-dialect shorthand for [`Converter::from_nfl`].
pub fn convert_from_nfl<'a>(
    source: impl Into<NflSource<'a>>,
    format: &str,
) -> Result<Payload, FormatError> {
    Converter::new(Dialect::Terse).from_nfl(source, format)
}

/// Terse-dialect shorthand for [`Converter::to_nfl`].
pub fn convert_to_nfl(payload: &Payload, format: &str) -> Result<String, FormatError> {
    Converter::new(Dialect::Terse).to_nfl(payload, format)
}
