//! The read-only capability a graph store must offer to the resolution engine.

use super::edge::{Direction, Relationship};
use super::node::{NodeId, Value};
use super::traversal::{Evaluation, Path, Traverser};

/// Minimal graph access used by the resolver.
///
/// Production stores implement this over their own transaction handle; the
/// crate ships [`PropertyGraph`](super::PropertyGraph) as an in-memory
/// implementation. All methods are reads against one consistent snapshot.
pub trait GraphAccess {
    /// Locates a node carrying `label` whose property `key` equals `value`.
    /// Returns the first match when several exist.
    fn find_node(&self, label: &str, key: &str, value: &Value) -> Option<NodeId>;

    /// Relationships anchored on `node` in `direction`, optionally restricted to one type.
    /// Order must be stable for an unchanged graph.
    fn relationships(&self, node: NodeId, rel_type: Option<&str>, direction: Direction) -> Vec<Relationship>;

    fn property(&self, node: NodeId, key: &str) -> Option<Value>;

    fn has_label(&self, node: NodeId, label: &str) -> bool;

    /// Depth-first traversal from `start` following `rel_type` relationships in `direction`.
    ///
    /// The evaluator sees every reached path, the zero-length start path
    /// included, and decides inclusion and descent for it.
    fn traverse<'a, F>(&'a self, start: NodeId, rel_type: &'a str, direction: Direction, evaluator: F) -> Traverser<'a, Self, F>
    where
        F: FnMut(&Path) -> Evaluation,
    {
        Traverser::new(self, start, rel_type, direction, evaluator)
    }
}
