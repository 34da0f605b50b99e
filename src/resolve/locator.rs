//! Instrument -> Feed -> TimeSeries lookup.

use super::error::{Missing, ResolveError};
use crate::graph::{Direction, GraphAccess, NodeId, Value};
use crate::schema::Schema;

pub struct SeriesLocator<'a, G: ?Sized> {
    graph: &'a G,
    schema: &'a Schema,
}

impl<'a, G: GraphAccess + ?Sized> SeriesLocator<'a, G> {
    pub fn new(graph: &'a G, schema: &'a Schema) -> Self {
        Self { graph, schema }
    }

    /// Locates the TimeSeries node, failing with `NotFound` at the first step that misses.
    pub fn locate(&self, instrument: &str, feed: &str, series: &str) -> Result<NodeId, ResolveError> {
        let instrument_node = self.instrument(instrument)?;
        let feed_node = self.feed(instrument_node, instrument, feed)?;
        self.series(feed_node, feed, series)
    }

    pub fn instrument(&self, code: &str) -> Result<NodeId, ResolveError> {
        let key = Value::from(code);
        self.graph
            .find_node(&self.schema.instrument_label, &self.schema.code_key, &key)
            .ok_or_else(|| miss(Missing::Instrument { code: code.to_string() }))
    }

    pub fn feed(&self, instrument_node: NodeId, instrument: &str, code: &str) -> Result<NodeId, ResolveError> {
        self.graph
            .relationships(instrument_node, Some(&self.schema.feed_relationship), Direction::Outgoing)
            .into_iter()
            .map(|r| r.end)
            .filter(|&n| self.graph.has_label(n, &self.schema.feed_label))
            .find(|&n| self.property_equals(n, &self.schema.code_key, code))
            .ok_or_else(|| miss(Missing::Feed { instrument: instrument.to_string(), code: code.to_string() }))
    }

    pub fn series(&self, feed_node: NodeId, feed: &str, name: &str) -> Result<NodeId, ResolveError> {
        let rel_type = self.schema.series_relationship.as_deref();
        self.graph
            .relationships(feed_node, rel_type, Direction::Outgoing)
            .into_iter()
            .map(|r| r.end)
            .filter(|&n| self.graph.has_label(n, &self.schema.series_label))
            .find(|&n| self.property_equals(n, &self.schema.name_key, name))
            .ok_or_else(|| miss(Missing::Series { feed: feed.to_string(), name: name.to_string() }))
    }

    fn property_equals(&self, node: NodeId, key: &str, expected: &str) -> bool {
        matches!(self.graph.property(node, key), Some(Value::String(s)) if s == expected)
    }
}

fn miss(missing: Missing) -> ResolveError {
    #[cfg(feature = "tracing")]
    tracing::debug!(missing = %missing, "series lookup missed");
    ResolveError::NotFound(missing)
}
