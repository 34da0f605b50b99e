//! Defines the `Relationship` type, representing a typed, directed link between two nodes.

use super::node::NodeId;
use petgraph::graph::EdgeIndex;

/// A unique identifier for a relationship within the graph.
pub type RelId = EdgeIndex;

/// Which end of a relationship a lookup is anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Relationships that start at the node.
    Outgoing,
    /// Relationships that end at the node.
    Incoming,
    /// Relationships on either end of the node.
    Both,
}

/// A resolved relationship handed out by a graph store.
///
/// Example: `(:Revision)-[:CAPTURE]->(:Capture)` has the revision as `start`
/// and the capture as `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: RelId,
    pub start: NodeId,
    pub end: NodeId,
    pub rel_type: String,
}

impl Relationship {
    /// The node at the far side of this relationship when viewed from `node`.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.start == node { self.end } else { self.start }
    }
}
