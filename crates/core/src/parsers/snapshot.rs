use serde::Deserialize;
use thiserror::Error;
use tracelane_protocol::{RawEvent, TraceTime};

use crate::source::TraceSnapshot;

#[derive(Debug, Error)]
pub enum SnapshotParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event {index} ({name}) has negative duration {duration}")]
    NegativeDuration {
        index: usize,
        name: String,
        duration: i64,
    },
    #[error("event {index} ({name}) ends past the representable time range")]
    EndTimeOverflow { index: usize, name: String },
}

/// Top-level snapshot JSON: either an object with an optional trace time
/// or a bare array of events.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Object {
        #[serde(rename = "traceTime", default)]
        trace_time: Option<TraceTime>,
        events: Vec<RawEvent>,
    },
    Array(Vec<RawEvent>),
}

/// Parse a JSON trace snapshot.
///
/// Without an explicit `traceTime` the trace spans its events.
pub fn parse_snapshot(data: &[u8]) -> Result<TraceSnapshot, SnapshotParseError> {
    let file: SnapshotFile = serde_json::from_slice(data)?;
    let (trace_time, events) = match file {
        SnapshotFile::Object { trace_time, events } => (trace_time, events),
        SnapshotFile::Array(events) => (None, events),
    };

    if let Some((index, event)) = events.iter().enumerate().find(|(_, e)| e.duration < 0) {
        return Err(SnapshotParseError::NegativeDuration {
            index,
            name: event.display_name.clone(),
            duration: event.duration,
        });
    }

    if let Some((index, event)) = events
        .iter()
        .enumerate()
        .find(|(_, e)| e.checked_end_time().is_none())
    {
        return Err(SnapshotParseError::EndTimeOverflow {
            index,
            name: event.display_name.clone(),
        });
    }

    let trace_time = trace_time.unwrap_or_else(|| TraceSnapshot::covering(&events));
    Ok(TraceSnapshot::new(trace_time, events))
}
