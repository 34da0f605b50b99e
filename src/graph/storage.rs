//! storage.rs
//! In-memory property graph backed by a petgraph `StableDiGraph`.

use super::access::GraphAccess;
use super::edge::{Direction, RelId, Relationship};
use super::node::{NodeData, NodeId, Value};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};

/// A labelled property graph held entirely in memory.
///
/// Nodes carry labels and properties, edges carry their relationship type.
/// Node and relationship ids are never reused, so iteration by id is
/// insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyGraph {
    graph: StableDiGraph<NodeData, String>,

    // Ephemeral lookup state (Not serialized, rebuilt on load)
    #[serde(skip)]
    label_index: HashMap<String, Vec<NodeId>>,
}

impl PropertyGraph {
    pub fn new() -> Self { Self::default() }
    pub fn node_count(&self) -> usize { self.graph.node_count() }
    pub fn relationship_count(&self) -> usize { self.graph.edge_count() }

    pub fn add_node(&mut self, data: NodeData) -> NodeId {
        let labels = data.labels.clone();
        let id = self.graph.add_node(data);
        for label in labels {
            self.label_index.entry(label).or_default().push(id);
        }
        id
    }

    pub fn add_relationship(&mut self, from: NodeId, to: NodeId, rel_type: &str) -> RelId {
        self.graph.add_edge(from, to, rel_type.to_string())
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.graph.node_weight(id)
    }

    /// Rebuilds the `label_index` after deserialization.
    pub fn rebuild_label_index(&mut self) {
        self.label_index.clear();
        let mut ids: Vec<NodeId> = self.graph.node_indices().collect();
        ids.sort();
        for id in ids {
            for label in &self.graph[id].labels {
                self.label_index.entry(label.clone()).or_default().push(id);
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut graph: Self = serde_json::from_str(json)?;
        graph.rebuild_label_index();
        Ok(graph)
    }

    pub fn write_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, self)
    }

    pub fn read_json<R: Read>(reader: R) -> serde_json::Result<Self> {
        let mut graph: Self = serde_json::from_reader(reader)?;
        graph.rebuild_label_index();
        Ok(graph)
    }
}

impl GraphAccess for PropertyGraph {
    fn find_node(&self, label: &str, key: &str, value: &Value) -> Option<NodeId> {
        self.label_index
            .get(label)?
            .iter()
            .copied()
            .find(|&id| self.graph[id].properties.get(key) == Some(value))
    }

    fn relationships(&self, node: NodeId, rel_type: Option<&str>, direction: Direction) -> Vec<Relationship> {
        if !self.graph.contains_node(node) {
            return Vec::new();
        }

        let mut edges = Vec::new();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            edges.extend(self.graph.edges_directed(node, petgraph::Direction::Outgoing));
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            edges.extend(self.graph.edges_directed(node, petgraph::Direction::Incoming));
        }

        let mut rels: Vec<Relationship> = edges
            .into_iter()
            .filter(|e| rel_type.map_or(true, |t| e.weight() == t))
            .map(|e| Relationship {
                id: e.id(),
                start: e.source(),
                end: e.target(),
                rel_type: e.weight().clone(),
            })
            .collect();

        // petgraph walks adjacency newest-first; hand out insertion order instead.
        rels.sort_by_key(|r| r.id);
        rels.dedup_by_key(|r| r.id);
        rels
    }

    fn property(&self, node: NodeId, key: &str) -> Option<Value> {
        self.graph.node_weight(node)?.properties.get(key).cloned()
    }

    fn has_label(&self, node: NodeId, label: &str) -> bool {
        self.graph.node_weight(node).is_some_and(|n| n.has_label(label))
    }
}
