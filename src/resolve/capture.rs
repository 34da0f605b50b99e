//! capture.rs
//! Turns one revision into its observations: revision -> capture -> dates.

use super::error::{Malformation, ResolveError};
use super::observation::{ResolvedObservation, RevisionBatch};
use crate::graph::{Direction, Evaluation, GraphAccess, NodeId, Path, Value};
use crate::schema::Schema;

pub struct CaptureExtractor<'a, G: ?Sized> {
    graph: &'a G,
    schema: &'a Schema,
}

impl<'a, G: GraphAccess + ?Sized> CaptureExtractor<'a, G> {
    pub fn new(graph: &'a G, schema: &'a Schema) -> Self {
        Self { graph, schema }
    }

    /// Extracts every observation a revision contributes.
    ///
    /// The capture's scalar value is broadcast to every date node reachable
    /// from it over `ON` relationships. Descent stops at the first date node
    /// on each path; non-date nodes are skipped but still explored.
    pub fn extract(&self, revision: NodeId) -> Result<RevisionBatch, ResolveError> {
        let version = self.version(revision)?;
        let capture = self.capture(revision)?;
        let value = self.value(capture)?;

        let date_label = self.schema.date_label.as_str();
        let is_date = |path: &Path| {
            if self.graph.has_label(path.end(), date_label) {
                Evaluation::IncludeAndPrune
            } else {
                Evaluation::ExcludeAndContinue
            }
        };

        let observations = self
            .graph
            .traverse(capture, &self.schema.on_relationship, Direction::Outgoing, is_date)
            .map(|path| -> Result<ResolvedObservation, ResolveError> {
                let date = self.date(path.end())?;
                Ok(ResolvedObservation { date, value, version })
            })
            .collect::<Result<Vec<_>, ResolveError>>()?;

        Ok(RevisionBatch { revision, capture, version, value, observations })
    }

    fn capture(&self, revision: NodeId) -> Result<NodeId, ResolveError> {
        let rels = self.graph.relationships(revision, Some(&self.schema.capture_relationship), Direction::Outgoing);
        match rels.as_slice() {
            [only] => Ok(only.end),
            other => Err(ResolveError::malformed(revision, Malformation::CaptureCount { found: other.len() })),
        }
    }

    fn version(&self, revision: NodeId) -> Result<u64, ResolveError> {
        let key = &self.schema.version_key;
        let raw = self.required(revision, key)?;
        raw.as_u64().ok_or_else(|| {
            ResolveError::malformed(revision, Malformation::InvalidVersion { key: key.clone(), raw: raw.to_string() })
        })
    }

    fn value(&self, capture: NodeId) -> Result<f64, ResolveError> {
        let key = &self.schema.value_key;
        let raw = self.required(capture, key)?;
        raw.as_f64().ok_or_else(|| {
            ResolveError::malformed(capture, Malformation::NonNumeric { key: key.clone(), raw: raw.to_string() })
        })
    }

    fn date(&self, node: NodeId) -> Result<chrono::NaiveDate, ResolveError> {
        let key = &self.schema.date_key;
        let raw = self.required(node, key)?;
        raw.as_date().ok_or_else(|| {
            ResolveError::malformed(node, Malformation::UnparseableDate { key: key.clone(), raw: raw.to_string() })
        })
    }

    fn required(&self, node: NodeId, key: &str) -> Result<Value, ResolveError> {
        self.graph
            .property(node, key)
            .ok_or_else(|| ResolveError::malformed(node, Malformation::MissingProperty { key: key.to_string() }))
    }
}
