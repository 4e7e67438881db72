// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical graph representation shared by the NFL parser and format adapters.
//! Pure data (pack metadata, nodes, edges, ordered string bags) with no I/O.
//!
//! Ordering is part of the contract: nodes, edges, properties and trait entries
//! iterate in insertion order so that every adapter emits them the same way.

mod example_pack;
mod store;

pub use example_pack::{
    json_scalar, validate_example_pack, ExamplePack, PackEdge, PackNode, PackSchemaError,
};
pub use store::{GraphStore, MemoryGraphStore, StoreError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered string-to-string bag used for node, edge and trait properties.
pub type PropertyMap = IndexMap<String, String>;

/// Relationship assigned by the block dialect when an edge line omits one.
pub const DEFAULT_RELATIONSHIP: &str = "relatedTo";

/// Type assigned to nodes that carry no `isa` property.
pub const DEFAULT_NODE_TYPE: &str = "Thing";

/// Optional pack metadata preceding graph content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Pack {
    /// Pack identifier.
    pub name: String,
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-form version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Pack {
    /// Pack with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            version: None,
        }
    }
}

/// Trait storage for a node.
///
/// `loose` pairs come from the terse dialect, which merges trait clauses
/// straight into the node. `groups` are the named `trait.<name>` bags of the
/// block dialect. Both keep insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TraitSet {
    /// Un-namespaced trait pairs.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub loose: PropertyMap,
    /// Named trait groups.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub groups: IndexMap<String, PropertyMap>,
}

impl TraitSet {
    /// True when neither loose pairs nor groups are present.
    pub fn is_empty(&self) -> bool {
        self.loose.is_empty() && self.groups.is_empty()
    }

    /// Insert (or overwrite) a loose trait pair.
    pub fn insert_loose(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.loose.insert(key.into(), value.into());
    }

    /// Open a named group, creating it empty when absent.
    pub fn group_mut(&mut self, name: &str) -> &mut PropertyMap {
        self.groups.entry(name.to_owned()).or_default()
    }

    /// Look up a named group.
    pub fn group(&self, name: &str) -> Option<&PropertyMap> {
        self.groups.get(name)
    }

    /// Loose pairs followed by `<group>_<key>` pairs for every named group.
    pub fn flattened(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .loose
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (group, props) in &self.groups {
            for (k, v) in props {
                out.push((format!("{group}_{k}"), v.clone()));
            }
        }
        out
    }
}

/// Graph node. `id` is the join key across every format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    /// Unique, case-sensitive identifier.
    pub id: String,
    /// Display label (defaults to `id`).
    pub label: String,
    /// Flat attributes such as `isa`, `name`, `description`.
    #[serde(default)]
    pub properties: PropertyMap,
    /// Trait pairs and named trait groups.
    #[serde(default)]
    pub traits: TraitSet,
    /// Opaque state string carried through the simple adapters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Node {
    /// Node whose label defaults to its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            properties: PropertyMap::new(),
            traits: TraitSet::default(),
            state: None,
        }
    }

    /// Builder-style label override.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder-style flat property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Value of the `isa` property, or [`DEFAULT_NODE_TYPE`].
    pub fn node_type(&self) -> &str {
        self.properties
            .get("isa")
            .map_or(DEFAULT_NODE_TYPE, String::as_str)
    }
}

/// Directed edge. Endpoints are referential ids and are never validated
/// against the node set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Relationship name (may be empty in the terse dialect).
    pub relationship: String,
    /// Edge attributes.
    #[serde(default)]
    pub properties: PropertyMap,
}

impl Edge {
    /// Edge without properties.
    pub fn new(
        source: impl Into<String>,
        relationship: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Builder-style edge property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// `<source>_<relationship>_<target>`; the identity used by the RDF and
    /// JSON-LD adapters for edge resources.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.source, self.relationship, self.target)
    }
}

/// Graph: optional pack, ordered unique nodes, ordered edge list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Graph {
    /// Pack metadata, present only when declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<Pack>,
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the graph holds no pack, nodes or edges.
    pub fn is_empty(&self) -> bool {
        self.pack.is_none() && self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Insert a node; a re-declared id replaces the earlier node but keeps
    /// its original position.
    pub fn upsert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Existing node for `id`, or a fresh one appended with label = id.
    pub fn node_or_insert(&mut self, id: &str) -> &mut Node {
        self.nodes
            .entry(id.to_owned())
            .or_insert_with(|| Node::new(id))
    }

    /// Look up a node.
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable node lookup.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Append an edge (duplicates allowed).
    pub fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Most recently appended edge.
    pub fn last_edge_mut(&mut self) -> Option<&mut Edge> {
        self.edges.last_mut()
    }

    /// Edges whose source or target is not a declared node.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| {
            !self.nodes.contains_key(&e.source) || !self.nodes.contains_key(&e.target)
        })
    }
}
