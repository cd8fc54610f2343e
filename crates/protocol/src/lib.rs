pub mod event;
pub mod trace_time;

pub use event::{EventCategory, EventLocation, IdentityKey, RawEvent, UnknownCategory};
pub use trace_time::TraceTime;
