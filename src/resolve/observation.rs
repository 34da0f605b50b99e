use crate::graph::NodeId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the corrected series: the value in force for `date`, and the
/// version of the revision that supplied it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedObservation {
    pub date: NaiveDate,
    pub value: f64,
    pub version: u64,
}

/// Everything extracted from a single revision.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionBatch {
    pub revision: NodeId,
    pub capture: NodeId,
    pub version: u64,
    pub value: f64,
    /// In traversal discovery order.
    pub observations: Vec<ResolvedObservation>,
}

/// Handed to the per-revision instrumentation hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevisionReport {
    pub revision: NodeId,
    pub version: u64,
    pub value: f64,
    pub observation_count: usize,
}

impl From<&RevisionBatch> for RevisionReport {
    fn from(batch: &RevisionBatch) -> Self {
        Self {
            revision: batch.revision,
            version: batch.version,
            value: batch.value,
            observation_count: batch.observations.len(),
        }
    }
}
