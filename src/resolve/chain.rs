//! chain.rs
//! Walks the singly-linked `NEXT` chain hanging off a TimeSeries node.

use super::error::{Malformation, ResolveError};
use crate::graph::{Direction, GraphAccess, NodeId};
use std::collections::HashSet;

/// Lazily yields the revisions of one series in chain order.
///
/// The series node itself is never yielded. A series without an outgoing
/// `NEXT` relationship has no revisions and yields nothing. After the first
/// error the iterator is exhausted.
pub struct RevisionChain<'a, G: ?Sized> {
    graph: &'a G,
    next_rel: &'a str,
    cursor: Option<NodeId>,
    seen: HashSet<NodeId>,
}

impl<'a, G: GraphAccess + ?Sized> RevisionChain<'a, G> {
    pub fn new(graph: &'a G, next_rel: &'a str, series: NodeId) -> Self {
        let mut seen = HashSet::new();
        seen.insert(series);
        Self { graph, next_rel, cursor: Some(series), seen }
    }

    /// Walks the whole chain once, up front.
    pub fn collect_all(self) -> Result<Vec<NodeId>, ResolveError> {
        self.collect()
    }

    fn successor(&self, node: NodeId) -> Result<Option<NodeId>, ResolveError> {
        let rels = self.graph.relationships(node, Some(self.next_rel), Direction::Outgoing);
        match rels.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only.end)),
            many => Err(ResolveError::malformed(node, Malformation::BranchingChain { successors: many.len() })),
        }
    }
}

impl<'a, G: GraphAccess + ?Sized> Iterator for RevisionChain<'a, G> {
    type Item = Result<NodeId, ResolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor.take()?;
        match self.successor(current) {
            Ok(Some(next)) => {
                if !self.seen.insert(next) {
                    return Some(Err(ResolveError::malformed(next, Malformation::CyclicChain)));
                }
                self.cursor = Some(next);
                Some(Ok(next))
            }
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
