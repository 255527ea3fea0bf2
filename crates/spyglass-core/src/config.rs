//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default quiet interval before a regeneration runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ControllerConfig {
    /// Time edits must settle before the engine is invoked.
    #[serde(with = "millis", rename = "debounce-ms")]
    pub debounce: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl ControllerConfig {
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_debounce() {
        assert_eq!(ControllerConfig::default().debounce, Duration::from_millis(100));
    }

    #[test]
    fn test_json_uses_millis() {
        let config = ControllerConfig::default().with_debounce(Duration::from_millis(250));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"debounce-ms":250}"#);

        let parsed: ControllerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ControllerConfig::default());
    }
}
