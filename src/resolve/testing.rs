//! Graph fixtures shared by the resolver test suites.

use crate::graph::{NodeData, NodeId, PropertyGraph};
use chrono::NaiveDate;
use std::collections::HashMap;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
}

/// An instrument/feed/series triple with a revision chain that grows on demand.
///
/// Date nodes are shared between revisions, as ingestion links captures to
/// one node per calendar day.
pub struct SeriesFixture {
    pub graph: PropertyGraph,
    pub instrument: NodeId,
    pub feed: NodeId,
    pub series: NodeId,
    pub revisions: Vec<NodeId>,
    pub captures: Vec<NodeId>,
    dates: HashMap<u32, NodeId>,
}

impl SeriesFixture {
    pub fn new(instrument: &str, feed: &str, series: &str) -> Self {
        let mut graph = PropertyGraph::new();
        let i = graph.add_node(NodeData::new(["Instrument"]).with("code", instrument));
        let f = graph.add_node(NodeData::new(["Feed"]).with("code", feed));
        let s = graph.add_node(NodeData::new(["TimeSeries"]).with("name", series));
        graph.add_relationship(i, f, "FEED");
        graph.add_relationship(f, s, "HAS_SERIES");
        Self {
            graph,
            instrument: i,
            feed: f,
            series: s,
            revisions: Vec::new(),
            captures: Vec::new(),
            dates: HashMap::new(),
        }
    }

    /// `RUSS` / `Bloomberg` / `EOD`: v0 captures 23.444 on day 3, v1 captures 4.494 on day 4.
    pub fn russ_bloomberg_eod() -> Self {
        let mut fx = Self::new("RUSS", "Bloomberg", "EOD");
        fx.push_revision(23.444, &[3]);
        fx.push_revision(4.494, &[4]);
        fx
    }

    /// Appends a revision whose version is its position in the chain.
    pub fn push_revision(&mut self, value: f64, days: &[u32]) -> NodeId {
        let version = self.revisions.len() as i64;
        let rev = self.graph.add_node(NodeData::new(["Revision"]).with("version", version));
        let cap = self.graph.add_node(NodeData::new(["Capture"]).with("value", value));
        let prev = self.revisions.last().copied().unwrap_or(self.series);
        self.graph.add_relationship(prev, rev, "NEXT");
        self.graph.add_relationship(rev, cap, "CAPTURE");
        for &d in days {
            let date = self.date_node(d);
            self.graph.add_relationship(cap, date, "ON");
        }
        self.revisions.push(rev);
        self.captures.push(cap);
        rev
    }

    pub fn date_node(&mut self, d: u32) -> NodeId {
        if let Some(&node) = self.dates.get(&d) {
            return node;
        }
        let node = self.graph.add_node(NodeData::new(["Date"]).with("date", day(d)));
        self.dates.insert(d, node);
        node
    }
}
