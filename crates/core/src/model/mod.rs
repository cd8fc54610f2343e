pub mod category_span;
pub mod identity;
pub mod occurrence;

pub use category_span::{CategorySpan, CategorySpans};
pub use identity::{EventDictionary, EventIdentity};
pub use occurrence::{EndIndexEntry, EventOccurrence};
