//! Defines the error types for the resolution module.
use crate::graph::NodeId;
use thiserror::Error;

/// Which lookup step came up empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    #[error("instrument '{code}'")]
    Instrument { code: String },
    #[error("feed '{code}' of instrument '{instrument}'")]
    Feed { instrument: String, code: String },
    #[error("time series '{name}' of feed '{feed}'")]
    Series { feed: String, name: String },
}

/// The structural invariant a node violates.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Malformation {
    #[error("revision has {found} capture relationships, expected exactly one")]
    CaptureCount { found: usize },
    #[error("missing property '{key}'")]
    MissingProperty { key: String },
    #[error("property '{key}' is not numeric: {raw}")]
    NonNumeric { key: String, raw: String },
    #[error("property '{key}' is not a non-negative integer version: {raw}")]
    InvalidVersion { key: String, raw: String },
    #[error("property '{key}' is not a calendar date: {raw}")]
    UnparseableDate { key: String, raw: String },
    #[error("revision chain branches into {successors} successors")]
    BranchingChain { successors: usize },
    #[error("revision chain revisits an earlier node")]
    CyclicChain,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// Absence of requested data. The resolver recovers from this with an empty result.
    #[error("{0} not found")]
    NotFound(Missing),
    /// Upstream data corruption. Fatal for the query.
    #[error("malformed graph at node {}: {reason}", .node.index())]
    MalformedGraph { node: NodeId, reason: Malformation },
}

impl ResolveError {
    pub fn malformed(node: NodeId, reason: Malformation) -> Self {
        ResolveError::MalformedGraph { node, reason }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }
}
