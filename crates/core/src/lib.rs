pub mod config;
pub mod format;
pub mod index;
pub mod layout;
pub mod model;
pub mod parsers;
pub mod source;
pub mod timeline;

pub use config::TimelineConfig;
pub use index::TimelineIndex;
pub use source::{TraceSnapshot, TraceSource};
pub use timeline::{ModelEvent, TimelineModel};
