//! Resolves the corrected view of a revisioned series.
pub mod capture;
pub mod chain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod locator;
pub mod observation;

#[cfg(test)]
pub(crate) mod testing;

pub use capture::CaptureExtractor;
pub use chain::RevisionChain;
pub use engine::{resolve, Resolution, Resolver};
pub use error::{Malformation, Missing, ResolveError};
pub use ledger::ObservationLedger;
pub use locator::SeriesLocator;
pub use observation::{ResolvedObservation, RevisionBatch, RevisionReport};
