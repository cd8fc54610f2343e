use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deepest floor accepted for `min_level`.
pub const MAX_MIN_LEVEL: u32 = 64;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Layout settings for a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Lowest row an event is ever placed on. The default of 1 leaves an
    /// empty row above each category.
    pub min_level: u32,
    /// Details longer than this many characters are cut and get `...`.
    pub details_max_chars: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_level: 1,
            details_max_chars: 40,
        }
    }
}

impl TimelineConfig {
    /// Parse a JSON config. Missing fields keep their defaults.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_level > MAX_MIN_LEVEL {
            return Err(ConfigError::InvalidValue {
                field: "minLevel",
                reason: format!("{} exceeds {MAX_MIN_LEVEL}", self.min_level),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let config = TimelineConfig::from_json_slice(br#"{"minLevel": 0}"#).expect("valid config");
        assert_eq!(config.min_level, 0);
        assert_eq!(config.details_max_chars, 40);
    }

    #[test]
    fn rejects_huge_floor() {
        let err = TimelineConfig::from_json_slice(br#"{"minLevel": 1000}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "minLevel", .. }));
    }

    #[test]
    fn rejects_bad_json() {
        assert!(matches!(
            TimelineConfig::from_json_slice(b"{minLevel"),
            Err(ConfigError::Json(_))
        ));
    }
}
