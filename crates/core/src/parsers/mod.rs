pub mod snapshot;

use thiserror::Error;

use crate::source::TraceSnapshot;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("snapshot: {0}")]
    Snapshot(#[from] snapshot::SnapshotParseError),
    #[error("unable to detect format")]
    UnknownFormat,
}

/// Detect the trace format and parse it.
///
/// JSON documents with an `events` array, or a top-level array of objects
/// carrying `startTime`, are trace snapshots.
pub fn parse_auto(data: &[u8]) -> Result<TraceSnapshot, ParseError> {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return Err(ParseError::UnknownFormat);
    };

    let is_snapshot = match &value {
        serde_json::Value::Object(obj) => obj.get("events").is_some_and(serde_json::Value::is_array),
        serde_json::Value::Array(arr) => {
            arr.is_empty() || arr.iter().any(|v| v.get("startTime").is_some())
        }
        _ => false,
    };

    if is_snapshot {
        Ok(snapshot::parse_snapshot(data)?)
    } else {
        Err(ParseError::UnknownFormat)
    }
}
