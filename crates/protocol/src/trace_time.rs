use serde::{Deserialize, Serialize};

/// Overall time span covered by a trace, in nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceTime {
    pub start_time: i64,
    pub end_time: i64,
}

impl TraceTime {
    pub fn new(start_time: i64, end_time: i64) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> i64 {
        self.end_time - self.start_time
    }
}
