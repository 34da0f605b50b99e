//! ledger.rs
//! Last-writer-wins merge of revision batches, keyed by date.

use super::observation::ResolvedObservation;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Accumulates observations in chain order.
///
/// Every `apply` unconditionally overwrites the entry for each date it
/// mentions. Because batches arrive in ascending version order, the entry
/// left for a date is the one from the highest version that mentioned it.
#[derive(Debug, Clone, Default)]
pub struct ObservationLedger {
    current: BTreeMap<NaiveDate, ResolvedObservation>,
    // Overwritten entries per date, oldest first.
    superseded: BTreeMap<NaiveDate, Vec<ResolvedObservation>>,
    track_history: bool,
}

impl ObservationLedger {
    pub fn new() -> Self { Self::default() }

    /// A ledger that also remembers every entry it overwrote.
    pub fn with_history() -> Self {
        Self { track_history: true, ..Self::default() }
    }

    #[inline]
    pub fn insert(&mut self, observation: ResolvedObservation) {
        if let Some(previous) = self.current.insert(observation.date, observation) {
            if self.track_history {
                self.superseded.entry(observation.date).or_default().push(previous);
            }
        }
    }

    pub fn apply<'o>(&mut self, batch: impl IntoIterator<Item = &'o ResolvedObservation>) {
        for observation in batch {
            self.insert(*observation);
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&ResolvedObservation> {
        self.current.get(&date)
    }

    pub fn len(&self) -> usize { self.current.len() }

    pub fn is_empty(&self) -> bool { self.current.is_empty() }

    /// The merged rows, ascending by date.
    pub fn into_observations(self) -> Vec<ResolvedObservation> {
        self.current.into_values().collect()
    }

    pub fn into_parts(self) -> (Vec<ResolvedObservation>, BTreeMap<NaiveDate, Vec<ResolvedObservation>>) {
        (self.current.into_values().collect(), self.superseded)
    }
}
