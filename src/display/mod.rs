//! Human-readable renderings of resolution results.
pub mod trace;

pub use trace::format_trace;
