//! Names of the labels, relationship types and property keys the resolver reads.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid schema: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The graph vocabulary of a revision store.
///
/// `Default` matches the layout written by the ingestion pipeline. Overrides
/// loaded from JSON may be partial; absent fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub instrument_label: String,
    pub feed_label: String,
    pub series_label: String,
    pub date_label: String,

    /// Instrument -> Feed
    pub feed_relationship: String,
    /// Feed -> TimeSeries. `None` scans every outgoing relationship of the
    /// feed and keeps targets carrying `series_label` (legacy untyped data).
    pub series_relationship: Option<String>,
    /// TimeSeries -> first Revision, and Revision -> successor
    pub next_relationship: String,
    /// Revision -> Capture
    pub capture_relationship: String,
    /// Capture -> ... -> Date
    pub on_relationship: String,

    pub code_key: String,
    pub name_key: String,
    pub version_key: String,
    pub value_key: String,
    pub date_key: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            instrument_label: "Instrument".into(),
            feed_label: "Feed".into(),
            series_label: "TimeSeries".into(),
            date_label: "Date".into(),
            feed_relationship: "FEED".into(),
            series_relationship: Some("HAS_SERIES".into()),
            next_relationship: "NEXT".into(),
            capture_relationship: "CAPTURE".into(),
            on_relationship: "ON".into(),
            code_key: "code".into(),
            name_key: "name".into(),
            version_key: "version".into(),
            value_key: "value".into(),
            date_key: "date".into(),
        }
    }
}

impl Schema {
    /// Schema for stores that link feeds to series without a dedicated type.
    pub fn untyped_series() -> Self {
        Self { series_relationship: None, ..Self::default() }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
