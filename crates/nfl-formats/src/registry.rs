// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Static format registry: name -> (serialize, reconstruct) pair.
//!
//! One registry per dialect, each built once on first use and looked up by
//! exact-match name. Lookup misses are explicit (`None` / `UnsupportedFormat`).

use std::sync::OnceLock;

use indexmap::IndexMap;
use nfl_graph::Graph;
use nfl_syntax::Dialect;

use crate::{block, nfl, terse, FormatError, Payload};

/// Graph -> target content.
pub type SerializeFn = fn(&Graph) -> Result<Payload, FormatError>;
/// Target content -> graph (the NFL writer turns it into text).
pub type ReconstructFn = fn(&Payload) -> Result<Graph, FormatError>;

/// Descriptor for one registered format.
#[derive(Debug, Clone, Copy)]
pub struct Adapter {
    /// Registry key.
    pub name: &'static str,
    /// Display name used in converted pack titles.
    pub title: &'static str,
    /// Serialize half.
    pub serialize: SerializeFn,
    /// Deserialize half, when the format has one.
    pub reconstruct: Option<ReconstructFn>,
}

impl Adapter {
    /// Serialize `graph`.
    pub fn serialize(&self, graph: &Graph) -> Result<Payload, FormatError> {
        (self.serialize)(graph)
    }

    /// Rebuild a graph from `payload`.
    pub fn reconstruct(&self, payload: &Payload) -> Result<Graph, FormatError> {
        let reconstruct = self
            .reconstruct
            .ok_or_else(|| FormatError::NoReverse(self.name.to_owned()))?;
        reconstruct(payload)
    }
}

/// Adapters available for one dialect.
#[derive(Debug)]
pub struct Registry {
    dialect: Dialect,
    adapters: IndexMap<&'static str, Adapter>,
}

static TERSE: OnceLock<Registry> = OnceLock::new();
static BLOCK: OnceLock<Registry> = OnceLock::new();

impl Registry {
    /// Registry for `dialect`.
    pub fn for_dialect(dialect: Dialect) -> &'static Registry {
        match dialect {
            Dialect::Terse => TERSE.get_or_init(|| Self::build(dialect, &terse::ADAPTERS)),
            Dialect::Block => BLOCK.get_or_init(|| Self::build(dialect, &block::ADAPTERS)),
        }
    }

    fn build(dialect: Dialect, formats: &[Adapter]) -> Self {
        let adapters = std::iter::once(nfl::adapter(dialect))
            .chain(formats.iter().copied())
            .map(|adapter| (adapter.name, adapter))
            .collect();
        Self { dialect, adapters }
    }

    /// Dialect this registry emits and parses.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Exact-match lookup.
    pub fn get(&self, name: &str) -> Option<&Adapter> {
        self.adapters.get(name)
    }

    /// Lookup that fails with [`FormatError::UnsupportedFormat`].
    pub fn resolve(&self, name: &str) -> Result<&Adapter, FormatError> {
        let adapter = self
            .get(name)
            .ok_or_else(|| FormatError::UnsupportedFormat(name.to_owned()))?;
        tracing::debug!(format = name, dialect = %self.dialect, "resolved adapter");
        Ok(adapter)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.adapters.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn unknown_names_are_explicit_errors() {
        for dialect in Dialect::ALL {
            let registry = Registry::for_dialect(dialect);
            assert!(registry.get("foo").is_none());
            let err = registry.resolve("foo").unwrap_err();
            assert!(matches!(&err, FormatError::UnsupportedFormat(name) if name == "foo"));
            assert!(err.to_string().contains("foo"));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(Registry::for_dialect(Dialect::Terse).get("JSONLD").is_none());
    }

    #[test]
    fn registered_names() {
        let terse: Vec<_> = Registry::for_dialect(Dialect::Terse).names().collect();
        assert_eq!(terse, ["nfl", "jsonld", "csv", "yaml", "geojson", "xml", "rdf"]);
        let block: Vec<_> = Registry::for_dialect(Dialect::Block).names().collect();
        assert_eq!(
            block,
            [
                "nfl", "jsonld", "csv", "yaml", "turtle", "rdf", "graphql", "pack", "owl", "sql"
            ]
        );
    }

    #[test]
    fn serialize_only_formats_have_no_reverse() {
        let registry = Registry::for_dialect(Dialect::Block);
        for name in ["owl", "sql"] {
            let adapter = registry.get(name).unwrap();
            assert!(adapter.reconstruct.is_none());
            let err = adapter.reconstruct(&Payload::from("")).unwrap_err();
            assert!(matches!(&err, FormatError::NoReverse(format) if format == name));
        }
    }

    #[test]
    fn registry_is_built_once() {
        let a = Registry::for_dialect(Dialect::Block);
        let b = Registry::for_dialect(Dialect::Block);
        assert!(std::ptr::eq(a, b));
    }
}
