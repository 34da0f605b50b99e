//! Resolves the corrected, point-in-time view of a financial time series
//! stored as a chain of immutable revisions in a property graph.
//!
//! The graph is read through the [`GraphAccess`] trait. [`PropertyGraph`] is
//! the in-memory implementation shipped with the crate.

pub mod display;
pub mod graph;
pub mod resolve;
pub mod schema;

pub use graph::{GraphAccess, NodeData, NodeId, PropertyGraph, Value};
pub use resolve::{resolve, Resolution, ResolveError, ResolvedObservation, Resolver, RevisionReport};
pub use schema::Schema;
