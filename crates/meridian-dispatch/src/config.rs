//! Configuration types for the dispatch engine.

use serde::Deserialize;
use std::time::Duration;

/// Dispatch engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Delay before a failed executor assignment is retried.
    #[serde(with = "serde_duration_secs")]
    pub retry_delay: Duration,
    /// Maximum number of assignment attempts per request. `None` retries
    /// forever; the job-management plane is then the only place a stuck
    /// request can be abandoned.
    pub max_attempts: Option<u32>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(60),
            max_attempts: None,
        }
    }
}

/// Serde helper for Duration as seconds.
mod serde_duration_secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DispatchConfig::default();
        assert_eq!(config.retry_delay, Duration::from_secs(60));
        assert!(config.max_attempts.is_none());
    }

    #[test]
    fn deserialises_seconds_and_cap() {
        let config: DispatchConfig =
            serde_json::from_str(r#"{"retry_delay": 5, "max_attempts": 3}"#).unwrap();
        assert_eq!(config.retry_delay, Duration::from_secs(5));
        assert_eq!(config.max_attempts, Some(3));
    }
}
