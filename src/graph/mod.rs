//! Defines the property graph the resolver reads, and the access seam to it.
pub mod access;
pub mod edge;
pub mod node;
pub mod storage;
pub mod traversal;

// Re-export key types for convenient access
pub use access::GraphAccess;
pub use edge::{Direction, RelId, Relationship};
pub use node::{Labels, NodeData, NodeId, Value};
pub use storage::PropertyGraph;
pub use traversal::{Evaluation, Path, Traverser};
