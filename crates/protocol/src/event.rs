use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event category: {0}")]
pub struct UnknownCategory(pub String);

/// Kind of work a profiled range event represents.
///
/// The order is fixed: it is the order categories are laid out in the
/// timeline and the order of [`EventCategory::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventCategory {
    Painting,
    Compiling,
    Creating,
    Binding,
    HandlingSignal,
}

impl EventCategory {
    /// Number of categories shown in the timeline.
    pub const COUNT: usize = 5;

    pub const ALL: [EventCategory; Self::COUNT] = [
        Self::Painting,
        Self::Compiling,
        Self::Creating,
        Self::Binding,
        Self::HandlingSignal,
    ];

    /// Position of this category in [`EventCategory::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Painting => 0,
            Self::Compiling => 1,
            Self::Creating => 2,
            Self::Binding => 3,
            Self::HandlingSignal => 4,
        }
    }

    /// Human-readable label used as the row header.
    pub fn label(self) -> &'static str {
        match self {
            Self::Painting => "Painting",
            Self::Compiling => "Compiling",
            Self::Creating => "Creating",
            Self::Binding => "Binding",
            Self::HandlingSignal => "Handling Signal",
        }
    }

    /// Categories whose events can causally nest inside each other and
    /// therefore take part in binding-loop detection.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::Compiling | Self::Creating | Self::Binding | Self::HandlingSignal
        )
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for EventCategory {
    type Err = UnknownCategory;

    /// Accepts the label or the variant name, ignoring case and spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL
            .into_iter()
            .find(|c| c.label().replace(' ', "").eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Source position an event was recorded at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventLocation {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub line: i32,
    #[serde(default)]
    pub column: i32,
}

impl EventLocation {
    pub fn new(filename: impl Into<String>, line: i32, column: i32) -> Self {
        Self {
            filename: filename.into(),
            line,
            column,
        }
    }
}

impl std::fmt::Display for EventLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.column > 0 {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.filename, self.line)
        }
    }
}

/// One event as delivered by the trace supplier, in arrival order.
///
/// Times are nanoseconds on the supplier's clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    pub display_name: String,
    /// Free-form data fields; joined with a single space for display.
    #[serde(default)]
    pub data: Vec<String>,
    #[serde(default)]
    pub location: EventLocation,
    pub category: EventCategory,
    pub start_time: i64,
    pub duration: i64,
}

impl RawEvent {
    /// `None` when the end does not fit in an `i64`.
    pub fn checked_end_time(&self) -> Option<i64> {
        self.start_time.checked_add(self.duration)
    }

    pub fn end_time(&self) -> i64 {
        self.start_time.saturating_add(self.duration)
    }

    /// Data fields joined the way they are shown to the user.
    pub fn details(&self) -> String {
        self.data.join(" ")
    }

    /// Content key identifying the event kind: every field except timing.
    ///
    /// Two events with equal keys are occurrences of the same identity.
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            display_name: self.display_name.clone(),
            details: self.details(),
            location: self.location.clone(),
            category: self.category,
        }
    }
}

/// Descriptive content of an event, compared field by field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub display_name: String,
    pub details: String,
    pub location: EventLocation,
    pub category: EventCategory,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(name: &str, data: &[&str]) -> RawEvent {
        RawEvent {
            display_name: name.into(),
            data: data.iter().map(|s| (*s).to_string()).collect(),
            location: EventLocation::new("main.qml", 12, 5),
            category: EventCategory::Binding,
            start_time: 0,
            duration: 10,
        }
    }

    #[test]
    fn category_order_and_labels() {
        for (i, category) in EventCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert_eq!(EventCategory::HandlingSignal.label(), "Handling Signal");
    }

    #[test]
    fn painting_is_not_structural() {
        assert!(!EventCategory::Painting.is_structural());
        assert!(EventCategory::ALL[1..].iter().all(|c| c.is_structural()));
    }

    #[test]
    fn parses_category_names() {
        assert_eq!("binding".parse(), Ok(EventCategory::Binding));
        assert_eq!("Handling Signal".parse(), Ok(EventCategory::HandlingSignal));
        assert_eq!("handlingsignal".parse(), Ok(EventCategory::HandlingSignal));
        assert_eq!(
            "javascript".parse::<EventCategory>(),
            Err(UnknownCategory("javascript".into()))
        );
    }

    #[test]
    fn identity_key_ignores_timing() {
        let a = binding("width", &["a", "b"]);
        let mut b = a.clone();
        b.start_time = 500;
        b.duration = 3;
        assert_eq!(a.identity_key(), b.identity_key());
        assert_ne!(a.identity_key(), binding("height", &["a", "b"]).identity_key());
        assert_ne!(a.identity_key(), binding("width", &["a b c"]).identity_key());
    }

    #[test]
    fn identity_key_keeps_fields_apart() {
        let mut a = binding("Main.qml:12", &["x"]);
        a.location = EventLocation::new("Main.qml", 12, 5);
        let mut b = binding("12", &["x:Main.qml"]);
        b.location = a.location.clone();
        assert_ne!(a.identity_key(), b.identity_key());

        let mut c = binding("n", &["4:"]);
        c.location = EventLocation::new("x", 1, 2);
        let mut d = binding("n", &[""]);
        d.location = EventLocation::new("x:1", 2, 3);
        d.category = EventCategory::HandlingSignal;
        assert_ne!(c.identity_key(), d.identity_key());
    }

    #[test]
    fn end_time_overflow() {
        let mut event = binding("w", &[]);
        event.start_time = i64::MAX - 5;
        assert_eq!(event.checked_end_time(), None);
        assert_eq!(event.end_time(), i64::MAX);
        event.duration = 5;
        assert_eq!(event.checked_end_time(), Some(i64::MAX));
    }

    #[test]
    fn deserializes_camel_case() {
        let json = r#"{
            "displayName": "onClicked",
            "category": "HandlingSignal",
            "startTime": 100,
            "duration": 25
        }"#;
        let event: RawEvent = serde_json::from_str(json).expect("valid event");
        assert_eq!(event.category, EventCategory::HandlingSignal);
        assert_eq!(event.end_time(), 125);
        assert!(event.data.is_empty());
        assert_eq!(event.location, EventLocation::default());
    }

    #[test]
    fn location_display() {
        assert_eq!(EventLocation::new("a.qml", 3, 7).to_string(), "a.qml:3:7");
        assert_eq!(EventLocation::new("a.qml", 3, 0).to_string(), "a.qml:3");
    }
}
