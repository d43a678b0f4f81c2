//! Error taxonomy for the synthesis engine.

use thiserror::Error;

/// Errors raised while preparing inputs or generating series.
///
/// Per-building and per-station variants are recorded as skipped units by
/// the orchestrator; the remaining variants abort a run before any output
/// is produced.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("degenerate footprint for building {building_id}: {reason}")]
    DegeneratePolygon { building_id: String, reason: String },

    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("unsupported building type \"{0}\"")]
    UnsupportedBuildingType(String),

    #[error("{what} of {requested} exceeds the limit of {limit}")]
    RangeExceeded {
        what: &'static str,
        requested: u64,
        limit: u64,
    },

    #[error("random source unavailable: {0}")]
    RandomSource(String),

    #[error("invalid input data: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_exceeded_message_names_limit() {
        let err = EngineError::RangeExceeded {
            what: "building count",
            requested: 60_000,
            limit: 50_000,
        };
        assert_eq!(
            err.to_string(),
            "building count of 60000 exceeds the limit of 50000"
        );
    }

    #[test]
    fn degenerate_polygon_mentions_building() {
        let err = EngineError::DegeneratePolygon {
            building_id: "R0001".into(),
            reason: "fewer than 3 distinct vertices".into(),
        };
        assert!(err.to_string().contains("R0001"));
    }
}
