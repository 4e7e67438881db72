// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persistence port for graph databases and document stores.
//!
//! Real backends live outside this workspace; they only need to upsert a
//! graph and hand one back. `MemoryGraphStore` tracks state in memory for
//! headless tests.

use indexmap::IndexMap;
use thiserror::Error;

use crate::{Edge, Graph, Node, Pack};

/// Error type for store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Backend rejected the data.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Given a graph model, upsert it; given nothing, return the stored graph.
pub trait GraphStore {
    /// Short label used when stamping converted output (e.g. "Neo4j").
    fn label(&self) -> &str;
    /// Upsert every node (by id) and append every edge.
    fn ingest(&mut self, graph: &Graph) -> Result<(), StoreError>;
    /// Read back the whole stored graph.
    fn extract(&self) -> Result<Graph, StoreError>;
}

/// In-memory store used in tests.
#[derive(Debug, Default)]
pub struct MemoryGraphStore {
    pack: Option<Pack>,
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    /// Number of `ingest` calls.
    pub ingest_count: u32,
    /// Whether `dispose` has been called.
    pub disposed: bool,
}

impl MemoryGraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of stored edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Drop the stored graph; later calls fail with `Unavailable`.
    pub fn dispose(&mut self) {
        self.pack = None;
        self.nodes.clear();
        self.edges.clear();
        self.disposed = true;
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.disposed {
            return Err(StoreError::Unavailable("memory store disposed".into()));
        }
        Ok(())
    }
}

impl GraphStore for MemoryGraphStore {
    fn label(&self) -> &str {
        "Memory"
    }

    fn ingest(&mut self, graph: &Graph) -> Result<(), StoreError> {
        self.ensure_open()?;
        if graph.nodes().any(|node| node.id.is_empty()) {
            return Err(StoreError::Backend("node without id".into()));
        }
        if graph.pack.is_some() {
            self.pack.clone_from(&graph.pack);
        }
        for node in graph.nodes() {
            self.nodes.insert(node.id.clone(), node.clone());
        }
        self.edges.extend(graph.edges().iter().cloned());
        self.ingest_count += 1;
        Ok(())
    }

    fn extract(&self) -> Result<Graph, StoreError> {
        self.ensure_open()?;
        let mut graph = Graph::new();
        graph.pack.clone_from(&self.pack);
        for node in self.nodes.values() {
            graph.upsert_node(node.clone());
        }
        for edge in &self.edges {
            graph.push_edge(edge.clone());
        }
        Ok(graph)
    }
}
