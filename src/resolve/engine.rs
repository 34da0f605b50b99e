//! A synchronous resolution engine: locate, walk, extract, merge.
use super::capture::CaptureExtractor;
use super::chain::RevisionChain;
use super::error::ResolveError;
use super::ledger::ObservationLedger;
use super::locator::SeriesLocator;
use super::observation::{ResolvedObservation, RevisionBatch, RevisionReport};
use crate::graph::{GraphAccess, NodeId};
use crate::schema::Schema;
use chrono::NaiveDate;
use rayon::prelude::*;
use std::collections::BTreeMap;

type Observer<'a> = Box<dyn FnMut(&RevisionReport) + 'a>;

/// Resolves the corrected view of one series per call.
///
/// The resolver holds no per-query state; every call builds its own ledger
/// and discards it on return.
pub struct Resolver<'a, G: ?Sized> {
    graph: &'a G,
    schema: Schema,
    observer: Option<Observer<'a>>,
}

impl<'a, G: GraphAccess + ?Sized> Resolver<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self { graph, schema: Schema::default(), observer: None }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Installs a hook called once per processed revision, in chain order.
    pub fn with_observer(mut self, observer: impl FnMut(&RevisionReport) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn schema(&self) -> &Schema { &self.schema }

    /// The corrected series, ascending by date.
    ///
    /// A missing instrument, feed or series, or a series without revisions,
    /// yields an empty vector. Only structural corruption is an error.
    pub fn resolve(&mut self, instrument: &str, feed: &str, series: &str) -> Result<Vec<ResolvedObservation>, ResolveError> {
        let ledger = self.run(instrument, feed, series, ObservationLedger::new())?;
        Ok(ledger.into_observations())
    }

    /// Like [`resolve`](Self::resolve), additionally keeping every entry a later revision overwrote.
    pub fn resolve_with_history(&mut self, instrument: &str, feed: &str, series: &str) -> Result<Resolution, ResolveError> {
        let ledger = self.run(instrument, feed, series, ObservationLedger::with_history())?;
        let (observations, superseded) = ledger.into_parts();
        Ok(Resolution {
            instrument: instrument.to_string(),
            feed: feed.to_string(),
            series: series.to_string(),
            observations,
            superseded,
        })
    }

    fn run(&mut self, instrument: &str, feed: &str, series: &str, mut ledger: ObservationLedger) -> Result<ObservationLedger, ResolveError> {
        let revisions = self.revisions(instrument, feed, series)?;
        let extractor = CaptureExtractor::new(self.graph, &self.schema);

        for revision in revisions {
            let batch = extractor.extract(revision).map_err(log_failure)?;
            notify(&mut self.observer, &batch);
            ledger.apply(&batch.observations);
        }
        Ok(ledger)
    }

    /// Locates the series and walks its chain once, up front.
    fn revisions(&self, instrument: &str, feed: &str, series: &str) -> Result<Vec<NodeId>, ResolveError> {
        let series_node = match SeriesLocator::new(self.graph, &self.schema).locate(instrument, feed, series) {
            Ok(node) => node,
            Err(e) if e.is_not_found() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let revisions = RevisionChain::new(self.graph, &self.schema.next_relationship, series_node)
            .collect_all()
            .map_err(log_failure)?;

        #[cfg(feature = "tracing")]
        {
            if revisions.is_empty() {
                tracing::debug!(instrument, feed, series, "series has no revisions");
            }
        }
        Ok(revisions)
    }
}

impl<'a, G: GraphAccess + Sync + ?Sized> Resolver<'a, G> {
    /// Extracts revisions on the rayon pool, then merges them in chain order.
    ///
    /// Produces exactly what [`resolve`](Self::resolve) produces; the observer
    /// still sees revisions one at a time, in chain order.
    pub fn resolve_parallel(&mut self, instrument: &str, feed: &str, series: &str) -> Result<Vec<ResolvedObservation>, ResolveError> {
        let revisions = self.revisions(instrument, feed, series)?;
        let extractor = CaptureExtractor::new(self.graph, &self.schema);

        // Collected in chain order; the earliest failing revision wins, as in `resolve`.
        let results: Vec<Result<RevisionBatch, ResolveError>> =
            revisions.par_iter().map(|&revision| extractor.extract(revision)).collect();
        let batches = results.into_iter().collect::<Result<Vec<_>, _>>().map_err(log_failure)?;

        let mut ledger = ObservationLedger::new();
        for batch in &batches {
            notify(&mut self.observer, batch);
            ledger.apply(&batch.observations);
        }
        Ok(ledger.into_observations())
    }
}

fn notify(observer: &mut Option<Observer<'_>>, batch: &RevisionBatch) {
    let report = RevisionReport::from(batch);
    #[cfg(feature = "tracing")]
    tracing::info!(
        version = report.version,
        value = report.value,
        observations = report.observation_count,
        "resolved revision"
    );
    if let Some(observer) = observer.as_mut() {
        observer(&report);
    }
}

fn log_failure(e: ResolveError) -> ResolveError {
    #[cfg(feature = "tracing")]
    {
        if !e.is_not_found() {
            tracing::warn!(error = %e, "revision graph is malformed");
        }
    }
    e
}

/// The merged series together with what each date's winning entry replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub instrument: String,
    pub feed: String,
    pub series: String,
    observations: Vec<ResolvedObservation>,
    superseded: BTreeMap<NaiveDate, Vec<ResolvedObservation>>,
}

impl Resolution {
    /// Ascending by date.
    pub fn observations(&self) -> &[ResolvedObservation] { &self.observations }

    /// Entries overwritten for `date`, oldest first. Empty when no revision restated it.
    pub fn superseded(&self, date: NaiveDate) -> &[ResolvedObservation] {
        self.superseded.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn restated_dates(&self) -> usize { self.superseded.len() }

    pub fn is_empty(&self) -> bool { self.observations.is_empty() }

    pub fn into_observations(self) -> Vec<ResolvedObservation> { self.observations }
}

/// One-shot resolution with the default schema.
pub fn resolve<G: GraphAccess + ?Sized>(graph: &G, instrument: &str, feed: &str, series: &str) -> Result<Vec<ResolvedObservation>, ResolveError> {
    Resolver::new(graph).resolve(instrument, feed, series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeData;
    use crate::resolve::error::Malformation;
    use crate::resolve::testing::{day, SeriesFixture};
    use rstest::rstest;

    fn row(d: u32, value: f64, version: u64) -> ResolvedObservation {
        ResolvedObservation { date: day(d), value, version }
    }

    #[test]
    fn test_distinct_dates_keep_their_own_versions() {
        let fx = SeriesFixture::russ_bloomberg_eod();
        let rows = resolve(&fx.graph, "RUSS", "Bloomberg", "EOD").unwrap();
        assert_eq!(rows, vec![row(3, 23.444, 0), row(4, 4.494, 1)]);
    }

    #[test]
    fn test_restatement_supersedes_earlier_value() {
        let mut fx = SeriesFixture::russ_bloomberg_eod();
        fx.push_revision(10.0, &[3]);

        let rows = resolve(&fx.graph, "RUSS", "Bloomberg", "EOD").unwrap();
        assert_eq!(rows, vec![row(3, 10.0, 2), row(4, 4.494, 1)]);
    }

    #[test]
    fn test_restating_capture_covers_every_linked_day() {
        // One capture is a single scalar: restating day 3 also restates day 4.
        let mut fx = SeriesFixture::new("RUSS", "Bloomberg", "EOD");
        fx.push_revision(23.444, &[3]);
        fx.push_revision(10.0, &[3, 4]);

        let rows = resolve(&fx.graph, "RUSS", "Bloomberg", "EOD").unwrap();
        assert_eq!(rows, vec![row(3, 10.0, 1), row(4, 10.0, 1)]);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    #[case(12)]
    fn test_last_writer_wins_for_chains_of_any_length(#[case] n: usize) {
        let mut fx = SeriesFixture::new("RUSS", "Bloomberg", "EOD");
        for i in 0..n {
            fx.push_revision(100.0 + i as f64, &[3]);
        }

        let rows = resolve(&fx.graph, "RUSS", "Bloomberg", "EOD").unwrap();
        assert_eq!(rows, vec![row(3, 100.0 + (n - 1) as f64, (n - 1) as u64)]);
    }

    #[rstest]
    #[case("RUSS", "Reuters", "EOD")]
    #[case("SPX", "Bloomberg", "EOD")]
    #[case("RUSS", "Bloomberg", "INTRADAY")]
    #[case("", "", "")]
    fn test_absent_data_is_an_empty_result(#[case] instrument: &str, #[case] feed: &str, #[case] series: &str) {
        let fx = SeriesFixture::russ_bloomberg_eod();
        assert!(resolve(&fx.graph, instrument, feed, series).unwrap().is_empty());
    }

    #[test]
    fn test_series_without_revisions_is_empty() {
        let fx = SeriesFixture::new("RUSS", "Bloomberg", "EOD");
        assert!(resolve(&fx.graph, "RUSS", "Bloomberg", "EOD").unwrap().is_empty());
    }

    #[test]
    fn test_output_strictly_ascending_and_unique() {
        let mut fx = SeriesFixture::new("RUSS", "Bloomberg", "EOD");
        fx.push_revision(1.0, &[9, 2, 7]);
        fx.push_revision(2.0, &[5, 9]);
        fx.push_revision(3.0, &[1, 2]);

        let rows = resolve(&fx.graph, "RUSS", "Bloomberg", "EOD").unwrap();
        assert!(rows.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(
            rows,
            vec![row(1, 3.0, 2), row(2, 3.0, 2), row(5, 2.0, 1), row(7, 1.0, 0), row(9, 2.0, 1)]
        );
    }

    #[test]
    fn test_resolving_twice_is_identical() {
        let fx = SeriesFixture::russ_bloomberg_eod();
        let mut resolver = Resolver::new(&fx.graph);
        let first = resolver.resolve("RUSS", "Bloomberg", "EOD").unwrap();
        let second = resolver.resolve("RUSS", "Bloomberg", "EOD").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut fx = SeriesFixture::new("RUSS", "Bloomberg", "EOD");
        for i in 0..40u32 {
            fx.push_revision(i as f64, &[1 + i % 7, 10 + i % 3]);
        }

        let sequential = Resolver::new(&fx.graph).resolve("RUSS", "Bloomberg", "EOD").unwrap();
        let parallel = Resolver::new(&fx.graph).resolve_parallel("RUSS", "Bloomberg", "EOD").unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential.iter().map(|r| r.version).max(), Some(39));
    }

    #[test]
    fn test_observer_sees_each_revision_in_chain_order() {
        let mut fx = SeriesFixture::russ_bloomberg_eod();
        fx.push_revision(7.0, &[]);

        let mut seen = Vec::new();
        Resolver::new(&fx.graph)
            .with_observer(|r: &RevisionReport| seen.push((r.version, r.observation_count)))
            .resolve("RUSS", "Bloomberg", "EOD")
            .unwrap();
        assert_eq!(seen, vec![(0, 1), (1, 1), (2, 0)]);
    }

    #[test]
    fn test_observer_order_is_kept_in_parallel_mode() {
        let mut fx = SeriesFixture::new("RUSS", "Bloomberg", "EOD");
        for i in 0..16 {
            fx.push_revision(i as f64, &[3]);
        }

        let mut versions = Vec::new();
        Resolver::new(&fx.graph)
            .with_observer(|r: &RevisionReport| versions.push(r.version))
            .resolve_parallel("RUSS", "Bloomberg", "EOD")
            .unwrap();
        assert_eq!(versions, (0..16).collect::<Vec<u64>>());
    }

    #[test]
    fn test_corrupt_revision_fails_the_query() {
        let mut fx = SeriesFixture::russ_bloomberg_eod();
        let extra = fx.graph.add_node(NodeData::new(["Capture"]).with("value", 1.0));
        fx.graph.add_relationship(fx.revisions[1], extra, "CAPTURE");

        let err = resolve(&fx.graph, "RUSS", "Bloomberg", "EOD").unwrap_err();
        assert_eq!(err, ResolveError::malformed(fx.revisions[1], Malformation::CaptureCount { found: 2 }));

        let err = Resolver::new(&fx.graph).resolve_parallel("RUSS", "Bloomberg", "EOD").unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_parallel_reports_the_first_corrupt_revision_in_chain_order() {
        let mut fx = SeriesFixture::new("RUSS", "Bloomberg", "EOD");
        for i in 0..64 {
            fx.push_revision(i as f64, &[3]);
        }
        for &rev in fx.revisions.iter().skip(5).step_by(7) {
            let extra = fx.graph.add_node(NodeData::new(["Capture"]).with("value", 1.0));
            fx.graph.add_relationship(rev, extra, "CAPTURE");
        }

        let sequential = Resolver::new(&fx.graph).resolve("RUSS", "Bloomberg", "EOD").unwrap_err();
        let parallel = Resolver::new(&fx.graph).resolve_parallel("RUSS", "Bloomberg", "EOD").unwrap_err();
        assert_eq!(sequential, ResolveError::malformed(fx.revisions[5], Malformation::CaptureCount { found: 2 }));
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_custom_schema() {
        let mut g = crate::graph::PropertyGraph::new();
        let i = g.add_node(NodeData::new(["Instrument"]).with("code", "RUSS"));
        let f = g.add_node(NodeData::new(["Feed"]).with("code", "Bloomberg"));
        let s = g.add_node(NodeData::new(["TimeSeries"]).with("name", "EOD"));
        let r = g.add_node(NodeData::new(["Revision"]).with("version", 0_i64));
        let c = g.add_node(NodeData::new(["Capture"]).with("px", 5.5));
        let d = g.add_node(NodeData::new(["Day"]).with("date", day(8)));
        g.add_relationship(i, f, "FEED");
        g.add_relationship(f, s, "OWNS");
        g.add_relationship(s, r, "NEXT");
        g.add_relationship(r, c, "CAPTURE");
        g.add_relationship(c, d, "ON");

        let schema = Schema {
            series_relationship: None,
            date_label: "Day".into(),
            value_key: "px".into(),
            ..Schema::default()
        };
        let rows = Resolver::new(&g).with_schema(schema).resolve("RUSS", "Bloomberg", "EOD").unwrap();
        assert_eq!(rows, vec![row(8, 5.5, 0)]);
    }

    #[test]
    fn test_history_lists_superseded_versions() {
        let mut fx = SeriesFixture::new("RUSS", "Bloomberg", "EOD");
        fx.push_revision(23.444, &[3]);
        fx.push_revision(10.0, &[3, 4]);
        fx.push_revision(11.0, &[3]);

        let res = Resolver::new(&fx.graph).resolve_with_history("RUSS", "Bloomberg", "EOD").unwrap();
        assert_eq!(res.observations(), &[row(3, 11.0, 2), row(4, 10.0, 1)]);
        assert_eq!(res.superseded(day(3)), &[row(3, 23.444, 0), row(3, 10.0, 1)]);
        assert!(res.superseded(day(4)).is_empty());
        assert_eq!(res.restated_dates(), 1);
        assert_eq!(res.series, "EOD");
    }
}
