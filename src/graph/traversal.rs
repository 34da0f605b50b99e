//! traversal.rs
//! Depth-first, evaluator-driven traversal over any `GraphAccess` store.
//! Iterative (explicit stack), node-global uniqueness.

use super::access::GraphAccess;
use super::edge::Direction;
use super::node::NodeId;
use std::collections::HashSet;

/// The directive an evaluator returns for every path the traversal reaches.
///
/// It answers two independent questions: is the path's end node part of the
/// result, and should the traversal descend further from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Evaluation {
    IncludeAndContinue,
    IncludeAndPrune,
    ExcludeAndContinue,
    ExcludeAndPrune,
}

impl Evaluation {
    pub fn of(include: bool, descend: bool) -> Self {
        match (include, descend) {
            (true, true) => Evaluation::IncludeAndContinue,
            (true, false) => Evaluation::IncludeAndPrune,
            (false, true) => Evaluation::ExcludeAndContinue,
            (false, false) => Evaluation::ExcludeAndPrune,
        }
    }

    #[inline]
    pub fn includes(self) -> bool {
        matches!(self, Evaluation::IncludeAndContinue | Evaluation::IncludeAndPrune)
    }

    #[inline]
    pub fn continues(self) -> bool {
        matches!(self, Evaluation::IncludeAndContinue | Evaluation::ExcludeAndContinue)
    }
}

/// A walk from the traversal's start node to its current end node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeId>,
}

impl Path {
    pub fn single(start: NodeId) -> Self {
        Self { nodes: vec![start] }
    }

    pub fn start(&self) -> NodeId { self.nodes[0] }

    pub fn end(&self) -> NodeId { self.nodes[self.nodes.len() - 1] }

    /// Number of relationships on the path. The start position has length 0.
    pub fn len(&self) -> usize { self.nodes.len() - 1 }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn nodes(&self) -> &[NodeId] { &self.nodes }

    fn extend(&self, next: NodeId) -> Self {
        let mut nodes = Vec::with_capacity(self.nodes.len() + 1);
        nodes.extend_from_slice(&self.nodes);
        nodes.push(next);
        Self { nodes }
    }
}

/// Lazily yields every path the evaluator includes, in depth-first order.
///
/// Siblings are explored in the order the store returns them. A node is
/// reached at most once per traversal, so diamonds never produce duplicates
/// and cyclic data cannot make it loop.
pub struct Traverser<'a, G: ?Sized, F> {
    graph: &'a G,
    rel_type: &'a str,
    direction: Direction,
    evaluator: F,
    stack: Vec<Path>,
    visited: HashSet<NodeId>,
}

impl<'a, G, F> Traverser<'a, G, F>
where
    G: GraphAccess + ?Sized,
    F: FnMut(&Path) -> Evaluation,
{
    pub fn new(graph: &'a G, start: NodeId, rel_type: &'a str, direction: Direction, evaluator: F) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start);
        Self {
            graph,
            rel_type,
            direction,
            evaluator,
            stack: vec![Path::single(start)],
            visited,
        }
    }
}

impl<'a, G, F> Iterator for Traverser<'a, G, F>
where
    G: GraphAccess + ?Sized,
    F: FnMut(&Path) -> Evaluation,
{
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        while let Some(path) = self.stack.pop() {
            let evaluation = (self.evaluator)(&path);

            if evaluation.continues() {
                let end = path.end();
                let rels = self.graph.relationships(end, Some(self.rel_type), self.direction);
                // Push in reverse so the first relationship is popped first.
                for rel in rels.iter().rev() {
                    let other = rel.other(end);
                    if self.visited.insert(other) {
                        self.stack.push(path.extend(other));
                    }
                }
            }

            if evaluation.includes() {
                return Some(path);
            }
        }
        None
    }
}
